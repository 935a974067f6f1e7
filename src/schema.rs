//! Document schema: field rules, coercions and defaults.
//!
//! Both collections share one schema:
//!
//! | Field | Type | Presence |
//! |---|---|---|
//! | `title` | text, non-empty | required |
//! | `description` | text | required |
//! | `date` | date, coerced from text or epoch millis | required |
//! | `featuredImage` | image path, relative to the document | optional |
//! | `featuredImageAlt` | text | optional |
//! | `pinned` | boolean | optional, default `false` |
//! | `draft` | boolean | optional, default `false` |
//!
//! Unknown keys are ignored. `slug` is not part of the document; the loader
//! reads it separately to override the entry id.
//!
//! Validation never stops at the first bad field: every field is checked and
//! all issues are returned together, so one build failure shows everything
//! wrong with a document.
//!
//! ## Date coercion
//!
//! Accepted textual forms, tried in order:
//!
//! ```text
//! 2024-09-20                     ISO calendar date
//! 2024-09-20T18:30:00-05:00      RFC 3339 (calendar date as written)
//! 2024-09-20T18:30Z              offset date-time without seconds
//! 2024-09-20T18:30:00            date-time without offset
//! 2024-09-20 18:30[:00]          space-separated date-time
//! 2024-09 / 2024                 ISO partial date (first of month / year)
//! Fri, 20 Sep 2024 18:30:00 GMT  RFC 2822
//! 2024/09/20
//! September 20, 2024 / Sep 20 2024
//! 20 September 2024 / 20 Sep 2024
//! ```
//!
//! Numbers are read as Unix epoch milliseconds (UTC).

use crate::frontmatter::kind_name;
use crate::imaging;
use crate::pattern::to_slash;
use crate::types::{ContentDocument, ImageAsset};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DATE: &str = "date";
pub const FEATURED_IMAGE: &str = "featuredImage";
pub const FEATURED_IMAGE_ALT: &str = "featuredImageAlt";
pub const PINNED: &str = "pinned";
pub const DRAFT: &str = "draft";
pub const SLUG: &str = "slug";

/// What is wrong with one field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("required field is missing")]
    Missing,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("must not be empty")]
    Empty,
    #[error("{0:?} is not a recognizable date")]
    BadDate(String),
    #[error("image {path:?} {reason}")]
    Image { path: String, reason: String },
}

/// A [`Problem`] attached to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Where the document being validated lives.
///
/// `root` must be canonical; image references are resolved against `dir`
/// and must stay inside `root`.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub root: &'a Path,
    pub dir: &'a Path,
}

/// Validate a raw front-matter record into a [`ContentDocument`].
pub fn validate(
    record: &Mapping,
    ctx: &DocumentContext<'_>,
) -> Result<ContentDocument, Vec<FieldIssue>> {
    let mut v = Validator {
        record,
        issues: Vec::new(),
    };

    let title = v.required_text(TITLE, true);
    let description = v.required_text(DESCRIPTION, false);
    let date = v.required_date(DATE);
    let featured_image = v.optional_image(FEATURED_IMAGE, ctx);
    let featured_image_alt = v.optional_text(FEATURED_IMAGE_ALT);
    let pinned = v.flag(PINNED, false);
    let draft = v.flag(DRAFT, false);

    match (title, description, date) {
        (Some(title), Some(description), Some(date)) if v.issues.is_empty() => {
            Ok(ContentDocument {
                title,
                description,
                date,
                featured_image,
                featured_image_alt,
                pinned,
                draft,
            })
        }
        _ => Err(v.issues),
    }
}

/// Optional `slug` override from a raw record.
pub fn slug(record: &Mapping) -> Result<Option<&str>, FieldIssue> {
    match record.get(SLUG) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(FieldIssue {
            field: SLUG,
            problem: Problem::WrongType {
                expected: "a string",
                found: kind_name(other),
            },
        }),
    }
}

struct Validator<'a> {
    record: &'a Mapping,
    issues: Vec<FieldIssue>,
}

impl Validator<'_> {
    fn fail(&mut self, field: &'static str, problem: Problem) {
        self.issues.push(FieldIssue { field, problem });
    }

    fn string(&mut self, field: &'static str) -> Option<Option<String>> {
        match self.record.get(field) {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(other) => {
                let found = kind_name(other);
                self.fail(
                    field,
                    Problem::WrongType {
                        expected: "a string",
                        found,
                    },
                );
                None
            }
        }
    }

    fn required_text(&mut self, field: &'static str, non_empty: bool) -> Option<String> {
        match self.string(field)? {
            None => {
                self.fail(field, Problem::Missing);
                None
            }
            Some(s) if non_empty && s.trim().is_empty() => {
                self.fail(field, Problem::Empty);
                None
            }
            Some(s) => Some(s),
        }
    }

    fn optional_text(&mut self, field: &'static str) -> Option<String> {
        self.string(field).flatten()
    }

    fn required_date(&mut self, field: &'static str) -> Option<NaiveDate> {
        let Some(value) = self.record.get(field) else {
            self.fail(field, Problem::Missing);
            return None;
        };
        match coerce_date(value) {
            Ok(date) => Some(date),
            Err(problem) => {
                self.fail(field, problem);
                None
            }
        }
    }

    fn optional_image(
        &mut self,
        field: &'static str,
        ctx: &DocumentContext<'_>,
    ) -> Option<ImageAsset> {
        let raw = self.string(field).flatten()?;
        match resolve_image(&raw, ctx) {
            Ok(asset) => Some(asset),
            Err(problem) => {
                self.fail(field, problem);
                None
            }
        }
    }

    fn flag(&mut self, field: &'static str, default: bool) -> bool {
        match self.record.get(field) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                let found = kind_name(other);
                self.fail(
                    field,
                    Problem::WrongType {
                        expected: "a boolean",
                        found,
                    },
                );
                default
            }
        }
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

// Offset-bearing forms RFC 3339 rejects. A trailing `Z` is rewritten to
// `+00:00` before these are tried.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Coerce a raw front-matter value into a calendar date.
pub fn coerce_date(value: &Value) -> Result<NaiveDate, Problem> {
    match value {
        Value::String(s) => parse_date_text(s).ok_or_else(|| Problem::BadDate(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| Problem::BadDate(n.to_string())),
        other => Err(Problem::WrongType {
            expected: "a date",
            found: kind_name(other),
        }),
    }
}

/// Parse the textual date forms listed in the module docs.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Some(date) = parse_offset_datetime(text) {
        return Some(date);
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Some(date) = parse_partial_iso(text) {
        return Some(date);
    }
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_offset_datetime(text: &str) -> Option<NaiveDate> {
    let zoned = match text.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{local}+00:00"),
        None => text.to_string(),
    };
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&zoned, fmt).ok())
        .map(|dt| dt.date_naive())
}

/// `YYYY-MM` and `YYYY`, anchored to the first day of the period.
fn parse_partial_iso(text: &str) -> Option<NaiveDate> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('-') {
        Some((year, month)) if year.len() == 4 && month.len() == 2 => {
            if !all_digits(year) || !all_digits(month) {
                return None;
            }
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        None if text.len() == 4 && all_digits(text) => {
            NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
        }
        _ => None,
    }
}

/// Resolve a `featuredImage` path against the document's directory.
pub fn resolve_image(raw: &str, ctx: &DocumentContext<'_>) -> Result<ImageAsset, Problem> {
    let fail = |reason: String| Problem::Image {
        path: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Problem::Empty);
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(fail("is remote; only local files are supported".into()));
    }

    let resolved = ctx
        .dir
        .join(trimmed)
        .canonicalize()
        .map_err(|_| fail("does not exist".into()))?;
    let rel = resolved
        .strip_prefix(ctx.root)
        .map_err(|_| fail("resolves outside the project root".into()))?;

    let info = imaging::probe(&resolved).map_err(|e| fail(format!("is not usable: {e}")))?;

    Ok(ImageAsset {
        src: to_slash(rel),
        width: info.width,
        height: info.height,
        format: info.format,
    })
}
