//! Site configuration module.
//!
//! Handles loading, validating, and merging the project's `config.toml`.
//! Stock defaults are overridden key-by-key by the user's file, so a config
//! only needs the values it changes.
//!
//! ## Config File Location
//!
//! `config.toml` sits in the project root, next to the content directory:
//!
//! ```text
//! site/
//! ├── config.toml
//! └── src/
//!     └── content/
//!         ├── news/
//!         │   └── harvest-fest.mdx
//!         └── stories/
//!             └── our-founders.mdx
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! dir = "src/content"       # Collections live in <dir>/news and <dir>/stories
//! pattern = "**/*.mdx"      # Which files under a collection are documents
//!
//! [processing]
//! max_processes = 4         # Max parallel validators (omit for auto = CPU cores)
//!
//! [site.contact]
//! phone = "(605) 624-4500"
//! email = "info@valiantvineyards.com"
//!
//! [site.address]
//! street = "1500 W. Main St"
//! city = "Vermillion"
//! state = "SD"
//! zip = "57069"
//! full = ""                 # empty: derived as "street, city, state zip"
//! google_maps_url = "https://maps.google.com/?q=Valiant+Vineyards+Vermillion+SD"
//!
//! [site.social]
//! facebook = "https://www.facebook.com/ValiantVineyards"
//! instagram = "https://www.instagram.com/valiantvineyards"
//!
//! [site.hours]
//! note = ""                 # e.g. "Closed Thanksgiving & Christmas"
//! tasting_room = [
//!     { days = "Monday – Thursday", hours = "11am – 6pm" },
//!     { days = "Friday – Saturday", hours = "11am – 7pm" },
//!     { days = "Sunday", hours = "12pm – 5pm" },
//! ]
//! ```
//!
//! Unknown keys are rejected to catch typos early. Arrays (such as
//! `tasting_room`) replace the default list wholesale.

use crate::pattern::{Pattern, PatternError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

impl From<PatternError> for ConfigError {
    fn from(err: PatternError) -> Self {
        ConfigError::Validation(format!("content.pattern: {err}"))
    }
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where collections live and which files they contain.
    pub content: ContentConfig,
    /// Parallel validation settings.
    pub processing: ProcessingConfig,
    /// Hours, contact, address and social links shown across the site.
    pub site: SiteInfo,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dir = self.content.dir.trim();
        if dir.is_empty() {
            return Err(ConfigError::Validation(
                "content.dir must not be empty".into(),
            ));
        }
        if Path::new(dir).is_absolute() {
            return Err(ConfigError::Validation(
                "content.dir must be relative to the project root".into(),
            ));
        }
        Pattern::new(&self.content.pattern)?;
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        let email = &self.site.contact.email;
        if !email.is_empty() && !email.contains('@') {
            return Err(ConfigError::Validation(format!(
                "site.contact.email is not an email address: {email:?}"
            )));
        }
        if let Some(slot) = self
            .site
            .hours
            .tasting_room
            .iter()
            .find(|s| s.days.trim().is_empty() || s.hours.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "site.hours.tasting_room entries need both days and hours: {slot:?}"
            )));
        }
        Ok(())
    }
}

/// Content directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory holding one subdirectory per collection, relative to the
    /// project root.
    pub dir: String,
    /// Glob pattern, relative to a collection directory, selecting documents.
    pub pattern: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "src/content".to_string(),
            pattern: "**/*.mdx".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel document validators.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Static business information consumed by page templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub hours: Hours,
    pub contact: Contact,
    pub address: Address,
    pub social: Social,
}

/// Opening hours of the tasting room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hours {
    pub tasting_room: Vec<HoursSlot>,
    /// Seasonal note or closures; empty when there is nothing to announce.
    pub note: String,
}

impl Default for Hours {
    fn default() -> Self {
        Self {
            tasting_room: vec![
                HoursSlot::new("Monday – Thursday", "11am – 6pm"),
                HoursSlot::new("Friday – Saturday", "11am – 7pm"),
                HoursSlot::new("Sunday", "12pm – 5pm"),
            ],
            note: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoursSlot {
    pub days: String,
    pub hours: String,
}

impl HoursSlot {
    pub fn new(days: &str, hours: &str) -> Self {
        Self {
            days: days.to_string(),
            hours: hours.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Contact {
    pub phone: String,
    pub email: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            phone: "(605) 624-4500".to_string(),
            email: "info@valiantvineyards.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Single-line postal address. Empty means derive it from the parts.
    pub full: String,
    pub google_maps_url: String,
}

impl Address {
    /// `street, city, state zip`, built from the individual parts.
    pub fn derived_full(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }

    /// Fill `full` from the parts unless it was set explicitly.
    pub fn complete(&mut self) {
        if self.full.trim().is_empty() {
            self.full = self.derived_full();
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: "1500 W. Main St".to_string(),
            city: "Vermillion".to_string(),
            state: "SD".to_string(),
            zip: "57069".to_string(),
            full: String::new(),
            google_maps_url: "https://maps.google.com/?q=Valiant+Vineyards+Vermillion+SD"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Social {
    pub facebook: String,
    pub instagram: String,
}

impl Default for Social {
    fn default() -> Self {
        Self {
            facebook: "https://www.facebook.com/ValiantVineyards".to_string(),
            instagram: "https://www.instagram.com/valiantvineyards".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    config.validate()?;
    config.site.address.complete();
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Cellar Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Only keys you want to override are needed. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Content collections
# ---------------------------------------------------------------------------
[content]
# Directory holding the collections, relative to this file.
# News posts live in <dir>/news, stories in <dir>/stories.
dir = "src/content"

# Glob selecting document files inside each collection directory.
# `**/` matches any depth of subdirectories.
pattern = "**/*.mdx"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel document validators.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Site information (hours, contact, address, social links)
# ---------------------------------------------------------------------------
[site.hours]
# Seasonal note or closures, e.g. "Closed Thanksgiving & Christmas".
note = ""

# Tasting room hours, in display order. Replaces the whole list.
tasting_room = [
    { days = "Monday – Thursday", hours = "11am – 6pm" },
    { days = "Friday – Saturday", hours = "11am – 7pm" },
    { days = "Sunday", hours = "12pm – 5pm" },
]

[site.contact]
phone = "(605) 624-4500"
email = "info@valiantvineyards.com"

[site.address]
street = "1500 W. Main St"
city = "Vermillion"
state = "SD"
zip = "57069"
# Single-line address shown in page footers.
# Leave empty to derive it as "street, city, state zip".
full = ""
google_maps_url = "https://maps.google.com/?q=Valiant+Vineyards+Vermillion+SD"

[site.social]
facebook = "https://www.facebook.com/ValiantVineyards"
instagram = "https://www.instagram.com/valiantvineyards"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_content_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.content.dir, "src/content");
        assert_eq!(config.content.pattern, "**/*.mdx");
    }

    #[test]
    fn default_config_has_site_info() {
        let config = SiteConfig::default();
        assert_eq!(config.site.contact.phone, "(605) 624-4500");
        assert_eq!(config.site.hours.tasting_room.len(), 3);
        assert_eq!(config.site.hours.tasting_room[2].days, "Sunday");
        assert!(config.site.hours.note.is_empty());
    }

    #[test]
    fn address_full_line() {
        let address = Address::default();
        assert_eq!(address.derived_full(), "1500 W. Main St, Vermillion, SD 57069");
    }

    #[test]
    fn address_full_derived_on_load() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(
            config.site.address.full,
            "1500 W. Main St, Vermillion, SD 57069"
        );
    }

    #[test]
    fn address_full_follows_overridden_parts() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site.address]\nstreet = \"12 Vine Rd\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.address.full, "12 Vine Rd, Vermillion, SD 57069");
    }

    #[test]
    fn address_full_explicit_value_kept() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site.address]\nfull = \"Off Highway 50, Vermillion\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.address.full, "Off Highway 50, Vermillion");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site.contact]
phone = "555-0100"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.site.contact.phone, "555-0100");
        // Default values preserved
        assert_eq!(config.site.contact.email, "info@valiantvineyards.com");
        assert_eq!(config.content.dir, "src/content");
    }

    #[test]
    fn parse_content_settings() {
        let toml = r#"
[content]
dir = "content"
pattern = "**/*.{md,mdx}"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.content.dir, "content");
        assert_eq!(config.content.pattern, "**/*.{md,mdx}");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        let mut expected = SiteConfig::default();
        expected.site.address.complete();
        assert_eq!(config, expected);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site.hours]
note = "Closed Thanksgiving & Christmas"
tasting_room = [{ days = "Daily", hours = "Noon – 5pm" }]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.hours.note, "Closed Thanksgiving & Christmas");
        // Arrays replace the default list
        assert_eq!(
            config.site.hours.tasting_room,
            vec![HoursSlot::new("Daily", "Noon – 5pm")]
        );
        // Unspecified values should be defaults
        assert_eq!(config.site.address.city, "Vermillion");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn default_processing_config() {
        let config = ProcessingConfig::default();
        assert_eq!(config.max_processes, None);
    }

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"pattern = "**/*.mdx""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"pattern = "*.md""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("pattern").unwrap().as_str(), Some("*.md"));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[site.contact]
phone = "1"
email = "a@b"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site.contact]
phone = "2"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let contact = merged.get("site").unwrap().get("contact").unwrap();
        assert_eq!(contact.get("phone").unwrap().as_str(), Some("2"));
        assert_eq!(contact.get("email").unwrap().as_str(), Some("a@b"));
    }

    #[test]
    fn merge_toml_arrays_replaced() {
        let base: toml::Value = toml::from_str("list = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("list = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("list").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[content]
patern = "**/*.md"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site.social]\ntwitter = \"x\"\n",
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_content_dir() {
        let mut config = SiteConfig::default();
        config.content.dir = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.dir"));
    }

    #[test]
    fn validate_absolute_content_dir() {
        let mut config = SiteConfig::default();
        config.content.dir = "/srv/content".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bad_pattern() {
        let mut config = SiteConfig::default();
        config.content.pattern = "**/*.{md".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.pattern"));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bad_email() {
        let mut config = SiteConfig::default();
        config.site.contact.email = "info-at-example".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_blank_hours_slot() {
        let mut config = SiteConfig::default();
        config.site.hours.tasting_room.push(HoursSlot::new("Monday", " "));
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[content]\npattern = \"\"\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // resolve_config / stock config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[processing]\nmax_processes = 2\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.content.pattern, "**/*.mdx");
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        assert!(val.get("content").is_some());
        assert!(val.get("processing").is_some());
        assert!(val.get("site").is_some());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[content]",
            "[processing]",
            "[site.hours]",
            "[site.contact]",
            "[site.address]",
            "[site.social]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }
}
