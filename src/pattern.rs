//! Glob-style file patterns for collection discovery.
//!
//! A collection restricts which files under its base directory count as
//! documents with a pattern such as `**/*.mdx`. Patterns are matched against
//! the path relative to the base directory, using `/` as the separator on
//! every platform.
//!
//! | Syntax   | Matches |
//! |----------|---------|
//! | `*`      | any run of characters within one path segment |
//! | `?`      | exactly one character other than `/` |
//! | `**/`    | zero or more whole directories |
//! | `**`     | anything, including `/` (at the end of a pattern) |
//! | `[abc]`, `[a-z]` | one character from the class |
//! | `[!_]`, `[^_]`   | one character not in the class (never `/`) |
//! | `{a,b}`  | either alternative (no nesting) |
//!
//! `**/[^_]*.mdx` therefore selects every document except those whose name
//! starts with an underscore. A `]` directly after the opening bracket (or
//! its negation) is a literal member of the class. Everything else matches
//! literally. Patterns compile to a single anchored [`regex::Regex`].

use regex::Regex;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unclosed '{{' in pattern {0:?}")]
    UnclosedBrace(String),
    #[error("nested '{{' in pattern {0:?}")]
    NestedBrace(String),
    #[error("unclosed '[' in pattern {0:?}")]
    UnclosedBracket(String),
    #[error("'/' inside a '[...]' class in pattern {0:?}")]
    SeparatorInClass(String),
    #[error("invalid pattern {pattern:?}: {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let translated = translate(pattern)?;
        let regex = Regex::new(&translated).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a path relative to the collection base.
    pub fn matches(&self, rel_path: &Path) -> bool {
        self.regex.is_match(&to_slash(rel_path))
    }
}

/// Join the normal components of a relative path with `/`.
pub fn to_slash(rel_path: &Path) -> String {
    rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn translate(pattern: &str) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut in_brace = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                if at_segment_start && chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:[^/]*/)*");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let (class, next) = translate_class(&chars, i, pattern)?;
                out.push_str(&class);
                i = next;
                continue;
            }
            '{' => {
                if in_brace {
                    return Err(PatternError::NestedBrace(pattern.to_string()));
                }
                in_brace = true;
                out.push_str("(?:");
            }
            ',' if in_brace => out.push('|'),
            '}' if in_brace => {
                in_brace = false;
                out.push(')');
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }

    if in_brace {
        return Err(PatternError::UnclosedBrace(pattern.to_string()));
    }
    out.push('$');
    Ok(out)
}

/// Translate the bracket class opening at `chars[start]`.
///
/// Returns the regex class and the index just past the closing `]`.
fn translate_class(
    chars: &[char],
    start: usize,
    pattern: &str,
) -> Result<(String, usize), PatternError> {
    let mut j = start + 1;
    let negated = matches!(chars.get(j), Some('!' | '^'));
    if negated {
        j += 1;
    }

    let mut body = String::new();
    let first = j;
    loop {
        let Some(&c) = chars.get(j) else {
            return Err(PatternError::UnclosedBracket(pattern.to_string()));
        };
        match c {
            ']' if j > first => break,
            '/' => return Err(PatternError::SeparatorInClass(pattern.to_string())),
            // A dash at either end is a member, not a range.
            '-' if j == first || chars.get(j + 1) == Some(&']') => body.push_str("\\-"),
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                body.push('\\');
                body.push(c);
            }
            _ => body.push(c),
        }
        j += 1;
    }

    let class = if negated {
        format!("[^/{body}]")
    } else {
        format!("[{body}]")
    };
    Ok((class, j + 1))
}
