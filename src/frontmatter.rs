//! Front-matter extraction.
//!
//! Content documents start with a YAML block fenced by `---` lines, followed
//! by the document body:
//!
//! ```text
//! ---
//! title: Harvest Fest
//! description: Annual fall celebration
//! date: 2024-09-20
//! ---
//!
//! Join us in the vineyard...
//! ```
//!
//! [`split`] separates the two parts without interpreting either one;
//! [`parse`] turns the YAML text into a raw record (a YAML mapping) for the
//! schema to validate. A document without a leading fence has no
//! front-matter at all: its whole text is body and its record is empty.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter opened with '---' but never closed")]
    Unterminated,
    #[error("front-matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front-matter must be a mapping of fields, found {0}")]
    NotAMapping(&'static str),
}

/// A document split into its front-matter text and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// YAML between the fences, `None` when the document has no fence.
    pub front_matter: Option<&'a str>,
    /// Everything after the closing fence line.
    pub body: &'a str,
}

const FENCE: &str = "---";

/// Split a document into front-matter and body.
///
/// The opening fence must be the very first line (after an optional UTF-8
/// BOM). The closing fence is the next line consisting solely of `---`.
/// Trailing whitespace on fence lines and `\r\n` line endings are tolerated.
pub fn split(content: &str) -> Result<Split<'_>, FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some((first, rest)) = next_line(content) else {
        return Ok(Split {
            front_matter: None,
            body: content,
        });
    };
    if first.trim_end() != FENCE {
        return Ok(Split {
            front_matter: None,
            body: content,
        });
    }

    let mut cursor = rest;
    let mut consumed = 0;
    while let Some((line, after)) = next_line(cursor) {
        if line.trim_end() == FENCE {
            return Ok(Split {
                front_matter: Some(&rest[..consumed]),
                body: after,
            });
        }
        consumed += cursor.len() - after.len();
        cursor = after;
    }
    Err(FrontMatterError::Unterminated)
}

/// Split off the first line, returning it without its terminator.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(pos) => Some((&text[..pos], &text[pos + 1..])),
        None => Some((text, "")),
    }
}

/// Parse front-matter YAML into a raw record.
///
/// An empty block (or one holding only comments / `null`) is an empty record.
pub fn parse(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(FrontMatterError::NotAMapping(kind_name(&other))),
    }
}

/// Human-readable name of a YAML value's type, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Split a document and parse its front-matter in one step.
pub fn read(content: &str) -> Result<(Mapping, &str), FrontMatterError> {
    let split = split(content)?;
    let record = match split.front_matter {
        Some(yaml) => parse(yaml)?,
        None => Mapping::new(),
    };
    Ok((record, split.body))
}
