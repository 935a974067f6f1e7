//! CLI output formatting for scan results.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entry is its semantic identity (title and positional index),
//! with filesystem paths shown as secondary context via indented `Source:`
//! lines. This makes the output readable as a content inventory while still
//! letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ```text
//! News (3 entries)
//! 001 Spring Release [pinned]
//!     Source: src/content/news/2024/spring-release.mdx
//!     Date: 2024-04-12
//!     Description: New whites on the tasting menu
//!     Image: src/assets/spring-release.png (4x3 png)
//! 002 Harvest Fest
//!     Source: src/content/news/harvest-fest.mdx
//!     Date: 2024-09-20
//!     Description: Annual fall celebration
//!
//! Stories (empty)
//! ```
//!
//! Entries are listed in discovery order. Each function here returns
//! `Vec<String>` and does no I/O; `print_*` wrappers write to stdout.

use crate::collection::Collection;
use crate::scan::Manifest;
use crate::types::{CollectionName, Entry};

const DESCRIPTION_WIDTH: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn heading(name: CollectionName) -> &'static str {
    match name {
        CollectionName::News => "News",
        CollectionName::Stories => "Stories",
    }
}

fn count_label(n: usize) -> String {
    match n {
        0 => "empty".to_string(),
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    }
}

/// Header line for an entry: index, title and any set flags.
///
/// ```text
/// 001 Spring Release [pinned]
/// 003 Wine Club Pickup [draft]
/// ```
fn entry_header(index: usize, entry: &Entry) -> String {
    let mut flags = Vec::new();
    if entry.data.pinned {
        flags.push("pinned");
    }
    if entry.data.draft {
        flags.push("draft");
    }
    let mut line = format!("{} {}", format_index(index), entry.data.title);
    if !flags.is_empty() {
        line.push_str(&format!(" [{}]", flags.join(", ")));
    }
    line
}

fn entry_lines(index: usize, entry: &Entry) -> Vec<String> {
    let pad = indent(1);
    let data = &entry.data;
    let mut lines = vec![
        entry_header(index, entry),
        format!("{pad}Source: {}", entry.file_path),
        format!("{pad}Date: {}", data.date.format("%Y-%m-%d")),
    ];
    if !data.description.is_empty() {
        lines.push(format!(
            "{pad}Description: {}",
            truncate_desc(&data.description, DESCRIPTION_WIDTH)
        ));
    }
    if let Some(image) = &data.featured_image {
        lines.push(format!(
            "{pad}Image: {} ({}x{} {})",
            image.src, image.width, image.height, image.format
        ));
    }
    lines
}

/// Format one collection as a titled block.
pub fn format_collection(collection: &Collection) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        heading(collection.name),
        count_label(collection.len())
    )];
    for (i, entry) in collection.iter().enumerate() {
        lines.extend(entry_lines(i + 1, entry));
    }
    lines
}

/// Format the whole scan result: every collection, separated by blank lines.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, collection) in manifest.collections().into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(format_collection(collection));
    }
    lines
}

/// One-line totals used after a successful check.
///
/// ```text
/// 3 news, 2 stories (1 draft)
/// ```
pub fn format_check_summary(manifest: &Manifest) -> String {
    let drafts = manifest
        .collections()
        .iter()
        .flat_map(|c| c.iter())
        .filter(|e| e.data.draft)
        .count();
    let base = format!(
        "{} news, {} stories",
        manifest.news.len(),
        manifest.stories.len()
    );
    match drafts {
        0 => base,
        1 => format!("{base} (1 draft)"),
        n => format!("{base} ({n} drafts)"),
    }
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}
