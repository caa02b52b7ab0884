//! Slideshow configuration.
//!
//! Settings come from three layers, lowest to highest priority:
//!
//! ```text
//! stock defaults  →  slideshow.toml (optional)  →  command-line flags
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! out_file = "out.html"
//! template_file = "template.html.j2"
//! # template_dir = "templates"
//! extensions = ["png", "jpg", "gif"]
//! embed_images = false
//! # caption_file = "captions.csv"
//! caption_delimiter = ","
//! ```
//!
//! The file is sparse: override only the keys you care about. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "slideshow.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Path of the generated document.
    pub out_file: String,
    /// Template name, looked up in the template directory and the bundled set.
    pub template_file: String,
    /// Directory of user templates that overlay the bundled template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,
    /// Extensions to discover, without the leading dot.
    pub extensions: Vec<String>,
    /// Inline images as base64 data URIs instead of referencing file names.
    pub embed_images: bool,
    /// Delimited file with one caption per image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_file: Option<String>,
    /// Field separator of the caption file.
    pub caption_delimiter: String,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            out_file: "out.html".to_string(),
            template_file: "template.html.j2".to_string(),
            template_dir: None,
            extensions: vec!["png".to_string(), "jpg".to_string(), "gif".to_string()],
            embed_images: false,
            caption_file: None,
            caption_delimiter: ",".to_string(),
        }
    }
}

impl SlideshowConfig {
    /// Validate values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.out_file.is_empty() {
            return Err(ConfigError::Validation("out_file must not be empty".into()));
        }
        if self.template_file.is_empty() {
            return Err(ConfigError::Validation(
                "template_file must not be empty".into(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if self
            .extensions
            .iter()
            .any(|e| e.trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::Validation(
                "extensions must not contain empty entries".into(),
            ));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    /// The caption delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.caption_delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Validation(format!(
                "caption_delimiter must be a single ASCII character, got {:?}",
                self.caption_delimiter
            ))),
        }
    }
}

/// Returns the stock defaults as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SlideshowConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
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

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SlideshowConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SlideshowConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path` on top of the stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SlideshowConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Default config location inside `dir`.
pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}

/// A fully commented stock `slideshow.toml`, printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# make-slideshow configuration
# =============================
# All settings are optional. Values shown are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Path of the generated HTML document. Overwritten without asking.
out_file = "out.html"

# Template to render. Looked up in template_dir first, then among the
# templates bundled with the tool.
template_file = "template.html.j2"

# Directory of your own templates (Jinja-style syntax).
# template_dir = "templates"

# Image extensions to pick up from the image directory (case-sensitive).
extensions = ["png", "jpg", "gif"]

# Inline every image as a base64 data URI so the document is self-contained.
embed_images = false

# Delimited text file with one caption per image, in filename order.
# The first field of each record is used.
# caption_file = "captions.csv"

# Field separator used by caption_file.
caption_delimiter = ","
"##
}
