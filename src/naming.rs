//! Entry identifiers derived from document paths.
//!
//! Every entry in a collection is addressable by a stable id. The id comes
//! from the document's path relative to the collection base directory:
//!
//! - the file extension is dropped (`harvest-fest.mdx` → `harvest-fest`)
//! - every path segment is slugged independently (lowercased, punctuation
//!   removed, each space turned into a dash)
//! - a trailing `/index` segment is removed, so `2024/index.mdx` and a
//!   hypothetical `2024.mdx` both address `2024`
//!
//! ```text
//! news/Harvest Fest.mdx           → "harvest-fest"
//! news/2024/Spring Release!.mdx   → "2024/spring-release"
//! stories/founders/index.mdx      → "founders"
//! ```
//!
//! A front-matter `slug` string replaces the derived id verbatim; see
//! [`entry_id`].

use std::path::{Component, Path};

/// Slug a single path segment.
///
/// Lowercases, keeps letters, digits, `-` and `_`, maps each space to `-`
/// and drops everything else. Runs of spaces are not collapsed, matching the
/// slugger most static-site tooling uses for heading anchors.
pub fn slug_segment(segment: &str) -> String {
    segment
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Derive an entry id from a path relative to the collection base.
pub fn id_from_path(rel_path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut components = rel_path.components().peekable();
    while let Some(component) = components.next() {
        let Component::Normal(part) = component else {
            continue;
        };
        let raw = if components.peek().is_none() {
            Path::new(part)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            part.to_string_lossy().into_owned()
        };
        segments.push(slug_segment(&raw));
    }

    let joined = segments.join("/");
    match joined.strip_suffix("/index") {
        Some(parent) => parent.to_string(),
        None => joined,
    }
}

/// Resolve the id for an entry: an explicit front-matter slug wins over the
/// path-derived id.
pub fn entry_id(rel_path: &Path, slug: Option<&str>) -> String {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None => id_from_path(rel_path),
    }
}
