//! # Cellar
//!
//! Content-collection loader for a winery website. Markdown/MDX documents
//! with YAML front matter live in two collections, `news` and `stories`;
//! this crate discovers them, validates every document against a fixed
//! schema, and hands the rendering layer typed, validated records.
//!
//! # Pipeline
//!
//! ```text
//! config.toml ─┐
//!              ├─ scan ──→ manifest.json   (Manifest: site info + collections)
//! content/   ──┘
//! ```
//!
//! Each document goes through:
//!
//! 1. **Discovery**: files under `<content dir>/<collection>/` matching the
//!    configured glob, walked in sorted order.
//! 2. **Front matter**: the leading `---` YAML block is split off the body.
//! 3. **Validation**: required fields, date coercion, image resolution and
//!    defaults for the boolean flags.
//! 4. **Identity**: a stable id derived from the path (or a `slug` override).
//!
//! Validation is fail-fast: the first invalid document in discovery order
//! aborts the scan with an error naming the file and every offending field.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Entry point: loads config and both collections into a [`scan::Manifest`] |
//! | [`collection`] | Collection definitions, discovery, parallel loading, queries |
//! | [`frontmatter`] | Splits a document into YAML front matter and body |
//! | [`schema`] | Field validation, date coercion, featured image resolution |
//! | [`imaging`] | Reads image headers for format and dimensions |
//! | [`pattern`] | Glob patterns selecting documents inside a collection |
//! | [`naming`] | Entry ids derived from document paths |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Shared types serialized into the manifest |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | Tracing subscriber setup for the binary |
//!
//! # Schema
//!
//! | Field | Type | Required | Notes |
//! |-------|------|----------|-------|
//! | `title` | string | yes | must not be blank |
//! | `description` | string | yes | may be empty |
//! | `date` | date | yes | ISO dates, datetimes, `September 20, 2024`, epoch millis |
//! | `featuredImage` | image | no | path relative to the document |
//! | `featuredImageAlt` | string | no | |
//! | `pinned` | boolean | no | defaults to `false` |
//! | `draft` | boolean | no | defaults to `false` |
//! | `slug` | string | no | replaces the path-derived id |
//!
//! Unknown keys are accepted and dropped.

pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pattern;
pub mod scan;
pub mod schema;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
