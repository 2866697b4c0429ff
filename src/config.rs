use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings namespace owned by this crate.
pub const SECTION: &str = "indentMask";
/// Host namespace carrying theme color overrides.
pub const THEME_SECTION: &str = "workbench.colorCustomizations";
/// Theme color token used for the marker background.
pub const MARKER_COLOR_TOKEN: &str = "indentMask.background";
/// Reserved category identifier for the fallback width.
pub const DEFAULT_KEY: &str = "default";
pub const DEFAULT_WIDTH: u32 = 4;

const CATEGORY_SEPARATOR: char = ',';

/// Errors that can occur when loading a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a candidate width was rejected.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum WidthError {
    #[error("must be greater than 0")]
    NotPositive,

    #[error("must be an integer")]
    NotInteger,

    // Only the u32 range is checked. A marker allocates `width` filler
    // characters, so a width in the billions still builds a multi-gigabyte
    // filler string.
    #[error("must be at most 4294967295")]
    TooLarge,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JsonKind {
    Null,
    Boolean,
    String,
    Array,
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::String => "string",
            JsonKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem found while resolving `indentMask.indentSize`.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigWarning {
    #[error("indentMask.indentSize {reason}")]
    InvalidDefault { reason: WidthError },

    #[error("indentMask.indentSize[\"{key}\"] {reason}")]
    InvalidCategory { key: String, reason: WidthError },

    #[error("indentMask.indentSize value must be a number or an object (found {kind})")]
    UnsupportedValue { kind: JsonKind },
}

/// The `indentMask.indentSize` setting, classified once at the boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum IndentSize {
    Width(f64),
    PerCategory(Map<String, Value>),
    Unsupported(JsonKind),
}

impl IndentSize {
    pub fn from_value(value: &Value) -> IndentSize {
        match value {
            Value::Number(n) => IndentSize::Width(n.as_f64().unwrap_or(f64::NAN)),
            Value::Object(map) => IndentSize::PerCategory(map.clone()),
            Value::Null => IndentSize::Unsupported(JsonKind::Null),
            Value::Bool(_) => IndentSize::Unsupported(JsonKind::Boolean),
            Value::String(_) => IndentSize::Unsupported(JsonKind::String),
            Value::Array(_) => IndentSize::Unsupported(JsonKind::Array),
        }
    }
}

/// Everything this crate reads from the host configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub enabled: bool,
    pub indent_size: Option<IndentSize>,
    pub colors: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            enabled: true,
            indent_size: None,
            colors: HashMap::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(rename = "indentMask.enabled", default = "enabled_by_default")]
    enabled: bool,
    #[serde(rename = "indentMask.indentSize", default)]
    indent_size: Option<Value>,
    #[serde(rename = "workbench.colorCustomizations", default)]
    color_customizations: Map<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

impl Settings {
    /// Parses a flat, VS Code style settings object. Unknown keys are ignored.
    pub fn from_json_str(json: &str) -> Result<Settings> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Ok(Settings::from_raw(raw))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Settings::from_json_str(&contents)
    }

    pub fn color(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(String::as_str)
    }

    fn from_raw(raw: RawSettings) -> Settings {
        // null reads the same as an unset key
        let indent_size = raw
            .indent_size
            .filter(|value| !value.is_null())
            .map(|value| IndentSize::from_value(&value));
        let colors = raw
            .color_customizations
            .into_iter()
            .filter_map(|(token, value)| match value {
                Value::String(color) => Some((token, color)),
                _ => None,
            })
            .collect();

        Settings {
            enabled: raw.enabled,
            indent_size,
            colors,
        }
    }
}

/// Category identifier to display width, with an always-present default.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WidthMapping {
    default_width: u32,
    widths: HashMap<String, u32>,
}

impl Default for WidthMapping {
    fn default() -> WidthMapping {
        WidthMapping::new(DEFAULT_WIDTH)
    }
}

impl WidthMapping {
    pub fn new(default_width: u32) -> WidthMapping {
        WidthMapping {
            default_width,
            widths: HashMap::new(),
        }
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }

    /// Sets the width for one category. The `default` key replaces the fallback.
    pub fn set(&mut self, category: &str, width: u32) {
        if category == DEFAULT_KEY {
            self.default_width = width;
        } else {
            self.widths.insert(category.to_string(), width);
        }
    }

    pub fn width_for(&self, category: &str) -> u32 {
        self.widths
            .get(category)
            .copied()
            .unwrap_or(self.default_width)
    }

    pub fn distinct_widths(&self) -> BTreeSet<u32> {
        self.widths
            .values()
            .copied()
            .chain(std::iter::once(self.default_width))
            .filter(|width| *width > 0)
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub mapping: WidthMapping,
    pub warnings: Vec<ConfigWarning>,
}

pub fn validate_width(value: f64) -> std::result::Result<u32, WidthError> {
    if value <= 0.0 {
        return Err(WidthError::NotPositive);
    }
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(WidthError::NotInteger);
    }
    if value > f64::from(u32::MAX) {
        return Err(WidthError::TooLarge);
    }

    Ok(value as u32)
}

/// Resolves the raw setting into a width mapping. Never fails: every
/// rejected value falls back and is reported as a warning instead.
pub fn resolve(indent_size: Option<&IndentSize>) -> Resolution {
    let mut resolution = Resolution::default();

    match indent_size {
        None => {}
        Some(IndentSize::Width(value)) => match validate_width(*value) {
            Ok(width) => resolution.mapping.set(DEFAULT_KEY, width),
            Err(reason) => resolution
                .warnings
                .push(ConfigWarning::InvalidDefault { reason }),
        },
        Some(IndentSize::PerCategory(entries)) => {
            for (key, value) in entries {
                // non-numeric entries are skipped silently
                let value = match value.as_f64() {
                    Some(value) => value,
                    None => continue,
                };
                match validate_width(value) {
                    Ok(width) => {
                        for category in categories(key) {
                            resolution.mapping.set(category, width);
                        }
                    }
                    Err(reason) => resolution.warnings.push(ConfigWarning::InvalidCategory {
                        key: key.clone(),
                        reason,
                    }),
                }
            }
        }
        Some(IndentSize::Unsupported(kind)) => resolution
            .warnings
            .push(ConfigWarning::UnsupportedValue { kind: *kind }),
    }

    resolution
}

fn categories(key: &str) -> impl Iterator<Item = &str> {
    key.split(CATEGORY_SEPARATOR)
        .map(str::trim)
        .filter(|category| !category.is_empty())
}
