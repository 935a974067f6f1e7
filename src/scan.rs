//! Project scanning and manifest generation.
//!
//! Loads `config.toml`, then both content collections, producing the
//! [`Manifest`] the rendering layer consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! site/                                # Project root
//! ├── config.toml                      # Site configuration (optional)
//! └── src/
//!     ├── assets/                      # Shared images (reachable via ../)
//!     └── content/                     # [content] dir
//!         ├── news/                    # news collection
//!         │   ├── harvest-fest.mdx     # id: harvest-fest
//!         │   └── 2024/
//!         │       └── spring-release.mdx   # id: 2024/spring-release
//!         └── stories/                 # stories collection
//!             └── founders/
//!                 └── index.mdx        # id: founders
//! ```
//!
//! The two collections never share documents: each only sees files under
//! its own directory.

use crate::collection::{Collection, CollectionDefinition, CollectionError, load_collection};
use crate::config::{self, ConfigError, SiteConfig, SiteInfo};
use crate::pattern::{Pattern, PatternError};
use crate::types::CollectionName;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("Content error: {0}")]
    Collection(#[from] CollectionError),
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub site: SiteInfo,
    pub news: Collection,
    pub stories: Collection,
}

impl Manifest {
    pub fn collection(&self, name: CollectionName) -> &Collection {
        match name {
            CollectionName::News => &self.news,
            CollectionName::Stories => &self.stories,
        }
    }

    /// Both collections, news first.
    pub fn collections(&self) -> [&Collection; 2] {
        [&self.news, &self.stories]
    }
}

/// Scan a project: load its config and both collections.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, &config)
}

/// Scan with an already-loaded config.
pub fn scan_with_config(root: &Path, config: &SiteConfig) -> Result<Manifest, ScanError> {
    let pattern = Pattern::new(&config.content.pattern)?;
    let content_dir = root.join(&config.content.dir);

    let load = |name: CollectionName| {
        let def = collection_definition(name, &content_dir, &pattern);
        load_collection(&def, root)
    };

    Ok(Manifest {
        site: config.site.clone(),
        news: load(CollectionName::News)?,
        stories: load(CollectionName::Stories)?,
    })
}

/// The definition of a named collection under a content directory.
pub fn collection_definition(
    name: CollectionName,
    content_dir: &Path,
    pattern: &Pattern,
) -> CollectionDefinition {
    CollectionDefinition::new(name, content_dir.join(name.as_str()), pattern.clone())
}
