//! Collection loading: discovery, parsing and validation.
//!
//! A [`CollectionDefinition`] names a collection, points at its base
//! directory and carries the file pattern. [`load_collection`] turns it into
//! a [`Collection`] of validated entries:
//!
//! 1. **Discover**: walk the base directory in sorted order, skipping hidden
//!    files and directories, keeping files whose base-relative path matches
//!    the pattern.
//! 2. **Parse**: split front-matter from body and read the YAML record.
//! 3. **Validate**: apply the document schema (coercions, defaults, image
//!    resolution) and derive the entry id.
//!
//! Steps 2 and 3 run in parallel with rayon; documents do not depend on
//! each other.
//!
//! ## Failure policy
//!
//! Loading is strict. One invalid document fails the whole collection, and
//! the reported failure is the first invalid document in discovery order, so
//! repeated builds report the same error. A missing base directory, or one
//! with no matching files, is an empty collection rather than an error.
//!
//! Two documents resolving to the same id are also an error, naming both
//! files. Astro's glob loader instead warns and lets the later file replace
//! the earlier one; here neither entry is silently dropped.

use crate::frontmatter::{self, FrontMatterError};
use crate::naming;
use crate::pattern::{Pattern, to_slash};
use crate::schema::{self, DocumentContext, FieldIssue};
use crate::types::{CollectionName, Entry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("project root {path} is not accessible: {source}")]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot walk {collection} directory: {source}")]
    Walk {
        collection: CollectionName,
        source: walkdir::Error,
    },
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
    #[error("invalid {collection} entry {path}: {source}")]
    FrontMatter {
        collection: CollectionName,
        path: PathBuf,
        source: FrontMatterError,
    },
    #[error("invalid {collection} entry {path}: {}", join_issues(issues))]
    Invalid {
        collection: CollectionName,
        path: PathBuf,
        issues: Vec<FieldIssue>,
    },
    #[error("duplicate {collection} id {id:?}: {first} and {second}")]
    DuplicateId {
        collection: CollectionName,
        id: String,
        first: String,
        second: String,
    },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where a collection's documents come from.
#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    pub name: CollectionName,
    pub base: PathBuf,
    pub pattern: Pattern,
}

impl CollectionDefinition {
    pub fn new(name: CollectionName, base: impl Into<PathBuf>, pattern: Pattern) -> Self {
        Self {
            name,
            base: base.into(),
            pattern,
        }
    }
}

/// A loaded collection. Entries keep discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: CollectionName,
    pub entries: Vec<Entry>,
}

impl Collection {
    pub fn empty(name: CollectionName) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Look an entry up by id.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries that are not drafts, in discovery order.
    pub fn published(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.data.draft)
    }

    /// Published entries for listing pages: pinned first, then newest first,
    /// ties broken by id.
    pub fn feed(&self) -> Vec<&Entry> {
        let mut feed: Vec<&Entry> = self.published().collect();
        feed.sort_by(|a, b| {
            b.data
                .pinned
                .cmp(&a.data.pinned)
                .then_with(|| b.data.date.cmp(&a.data.date))
                .then_with(|| a.id.cmp(&b.id))
        });
        feed
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Load and validate every document of a collection.
///
/// `root` is the project root; image references must resolve inside it and
/// entry paths are reported relative to it.
pub fn load_collection(
    def: &CollectionDefinition,
    root: &Path,
) -> Result<Collection, CollectionError> {
    let root = root.canonicalize().map_err(|source| CollectionError::Root {
        path: root.to_path_buf(),
        source,
    })?;

    if !def.base.is_dir() {
        debug!(
            collection = %def.name,
            base = %def.base.display(),
            "collection directory missing, treating as empty"
        );
        return Ok(Collection::empty(def.name));
    }

    let files = discover(def)?;
    debug!(collection = %def.name, files = files.len(), "discovered documents");

    let results: Vec<Result<Entry, CollectionError>> = files
        .par_iter()
        .map(|path| load_entry(def, &root, path))
        .collect();
    let entries = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    check_unique_ids(def.name, &entries)?;

    info!(collection = %def.name, entries = entries.len(), "loaded collection");
    Ok(Collection {
        name: def.name,
        entries,
    })
}

/// Files under the base directory matching the pattern, in sorted order.
fn discover(def: &CollectionDefinition) -> Result<Vec<PathBuf>, CollectionError> {
    let walker = WalkDir::new(&def.base)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CollectionError::Walk {
            collection: def.name,
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(&def.base).unwrap_or(entry.path());
        if def.pattern.matches(rel) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn load_entry(
    def: &CollectionDefinition,
    root: &Path,
    path: &Path,
) -> Result<Entry, CollectionError> {
    let bytes = fs::read(path).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = format!("{:x}", Sha256::digest(&bytes));
    let content = std::str::from_utf8(&bytes).map_err(|_| CollectionError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    let (record, body) =
        frontmatter::read(content).map_err(|source| CollectionError::FrontMatter {
            collection: def.name,
            path: path.to_path_buf(),
            source,
        })?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let ctx = DocumentContext { root, dir };
    let validated = schema::validate(&record, &ctx);
    let slug = schema::slug(&record);

    let (data, slug) = match (validated, slug) {
        (Ok(data), Ok(slug)) => (data, slug),
        (validated, slug) => {
            let mut issues = validated.err().unwrap_or_default();
            issues.extend(slug.err());
            return Err(CollectionError::Invalid {
                collection: def.name,
                path: path.to_path_buf(),
                issues,
            });
        }
    };

    let rel_to_base = path.strip_prefix(&def.base).unwrap_or(path);
    let id = naming::entry_id(rel_to_base, slug);
    let file_path = path
        .canonicalize()
        .ok()
        .and_then(|p| p.strip_prefix(root).ok().map(to_slash))
        .unwrap_or_else(|| to_slash(path));

    debug!(collection = %def.name, id = %id, path = %file_path, "validated entry");
    Ok(Entry {
        id,
        collection: def.name,
        file_path,
        data,
        body: body.to_string(),
        digest,
    })
}

fn check_unique_ids(collection: CollectionName, entries: &[Entry]) -> Result<(), CollectionError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        if let Some(first) = seen.insert(entry.id.as_str(), entry.file_path.as_str()) {
            return Err(CollectionError::DuplicateId {
                collection,
                id: entry.id.clone(),
                first: first.to_string(),
                second: entry.file_path.clone(),
            });
        }
    }
    Ok(())
}
