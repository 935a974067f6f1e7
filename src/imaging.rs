//! Image asset probing for `featuredImage` references.
//!
//! A featured image is only accepted when the file exists, carries a
//! supported extension, and its dimensions can actually be read. Probing
//! never decodes pixel data:
//!
//! | Format | How dimensions are read |
//! |---|---|
//! | JPEG, PNG, TIFF, WebP, GIF | `image::ImageReader::into_dimensions` |
//! | AVIF | `avif-parse` container metadata |
//! | SVG | `usvg` document size (`width`/`height`, else `viewBox`), rounded up |

use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "unsupported image type {0:?} (expected jpg, jpeg, png, tif, tiff, webp, gif, svg or avif)"
    )]
    Unsupported(String),
    #[error("unreadable image: {0}")]
    Decode(String),
}

/// Image formats a featured image may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Png,
    Tiff,
    Webp,
    Gif,
    Svg,
    Avif,
}

impl ImageFormat {
    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Svg => "svg",
            Self::Avif => "avif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of probing an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Read format and pixel dimensions of an image on disk.
pub fn probe(path: &Path) -> Result<ImageInfo, ImageError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let format = ImageFormat::from_extension(&ext).ok_or(ImageError::Unsupported(ext))?;

    let (width, height) = match format {
        ImageFormat::Avif => avif_dimensions(path)?,
        ImageFormat::Svg => svg_dimensions(path)?,
        _ => ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("{}: {e}", path.display())))?,
    };

    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Dimensions from an AVIF file's container metadata (no AV1 decode).
fn avif_dimensions(path: &Path) -> Result<(u32, u32), ImageError> {
    let file_data = std::fs::read(path)?;
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&file_data))
        .map_err(|e| ImageError::Decode(format!("{}: {e:?}", path.display())))?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| ImageError::Decode(format!("{}: {e:?}", path.display())))?;
    Ok((meta.max_frame_width.get(), meta.max_frame_height.get()))
}

/// Dimensions of an SVG document as rendered at its intrinsic size.
fn svg_dimensions(path: &Path) -> Result<(u32, u32), ImageError> {
    let content = std::fs::read(path)?;
    let tree = usvg::Tree::from_data(&content, &usvg::Options::default())
        .map_err(|e| ImageError::Decode(format!("{}: {e}", path.display())))?;
    let size = tree.size();
    Ok((size.width().ceil() as u32, size.height().ceil() as u32))
}
