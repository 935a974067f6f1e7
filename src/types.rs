//! Shared types handed to the rendering layer.
//!
//! These types are serialized into the scan manifest (`manifest.json`) and
//! read back by whatever renders the site, so field names follow the
//! front-matter spelling (`featuredImage`, `featuredImageAlt`).

use crate::imaging::ImageFormat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two content collections of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    News,
    Stories,
}

impl CollectionName {
    pub const ALL: [CollectionName; 2] = [CollectionName::News, CollectionName::Stories];

    /// Collection name, also the directory name under the content dir.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Stories => "stories",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated news post or story.
///
/// `pinned` and `draft` are always present (defaulted to `false`), and
/// `date` is always a real calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_alt: Option<String>,
    pub pinned: bool,
    pub draft: bool,
}

/// A featured image resolved against the document's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Path relative to the project root, `/`-separated.
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// One loaded document of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier, unique within the collection.
    pub id: String,
    pub collection: CollectionName,
    /// Source path relative to the project root, `/`-separated.
    pub file_path: String,
    pub data: ContentDocument,
    /// Document text after the front-matter block.
    pub body: String,
    /// SHA-256 of the raw file bytes, hex encoded.
    pub digest: String,
}
