//! Shared test utilities for the cellar test suite.
//!
//! Fixture setup, document writers and lookup helpers over scan-stage data
//! (`Manifest`, `Collection`, `Entry`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let entry = find_entry(&manifest.news, "harvest-fest");
//! assert_eq!(entry.data.title, "Harvest Fest");
//! assert_eq!(entry_ids(&manifest.stories), vec!["founders", "the-first-vintage"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::collection::Collection;
use crate::types::Entry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Document writers
// =========================================================================

/// Write a document with the given front-matter YAML and body, creating
/// parent directories. `rel` is relative to `root`.
pub fn write_doc(root: &Path, rel: &str, front_matter: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("---\n{front_matter}---\n{body}")).unwrap();
}

/// Write a minimal valid news post under `src/content/news/`.
pub fn news_doc(root: &Path, rel: &str, title: &str, date: &str) {
    write_doc(
        root,
        &format!("src/content/news/{rel}"),
        &format!("title: {title:?}\ndescription: Test post\ndate: {date}\n"),
        "",
    );
}

/// Write a solid-colour PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

// =========================================================================
// Collection lookups (panic with the available ids on a miss)
// =========================================================================

/// Find an entry by id. Panics if not found.
pub fn find_entry<'a>(collection: &'a Collection, id: &str) -> &'a Entry {
    collection.get(id).unwrap_or_else(|| {
        let ids = entry_ids(collection);
        panic!(
            "entry '{id}' not found in {}. Available: {ids:?}",
            collection.name
        )
    })
}

/// All entry ids in collection order.
pub fn entry_ids(collection: &Collection) -> Vec<&str> {
    collection.iter().map(|e| e.id.as_str()).collect()
}

/// All entry titles in collection order.
pub fn entry_titles(collection: &Collection) -> Vec<&str> {
    collection.iter().map(|e| e.data.title.as_str()).collect()
}
