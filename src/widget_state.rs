//! Saved widget state.
//!
//! A [`Bundle`] is the flat key/value snapshot a widget writes on save and
//! reads back on restore. [`WidgetState`] wraps a bundle with a timestamp and
//! persists it to disk as TOML between runs.

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse a color from config or a bundle ("#4291f1", "red", "42", ...)
pub fn parse_color(value: &str) -> Option<Color> {
    value.trim().parse().ok()
}

/// Inverse of [`parse_color`]
pub fn color_to_string(color: &Color) -> String {
    color.to_string()
}

/// A single bundle value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl BundleValue {
    fn kind(&self) -> &'static str {
        match self {
            BundleValue::Bool(_) => "bool",
            BundleValue::Int(_) => "int",
            BundleValue::Float(_) => "float",
            BundleValue::Str(_) => "string",
        }
    }
}

/// Flat key/value snapshot of a widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    entries: BTreeMap<String, BundleValue>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&BundleValue> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: &str, value: BundleValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn put_int(&mut self, key: &str, value: i32) {
        self.put(key, BundleValue::Int(value));
    }

    pub fn put_float(&mut self, key: &str, value: f32) {
        self.put(key, BundleValue::Float(value));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, BundleValue::Bool(value));
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.put(key, BundleValue::Str(value.into()));
    }

    pub fn get_int(&self, key: &str) -> Result<i32> {
        match self.lookup(key)? {
            BundleValue::Int(v) => Ok(*v),
            other => Err(mistyped(key, "int", other)),
        }
    }

    /// Integers are widened, since JSON and TOML writers may drop the fraction
    pub fn get_float(&self, key: &str) -> Result<f32> {
        match self.lookup(key)? {
            BundleValue::Float(v) => Ok(*v),
            BundleValue::Int(v) => Ok(*v as f32),
            other => Err(mistyped(key, "float", other)),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.lookup(key)? {
            BundleValue::Bool(v) => Ok(*v),
            other => Err(mistyped(key, "bool", other)),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<&str> {
        match self.lookup(key)? {
            BundleValue::Str(v) => Ok(v.as_str()),
            other => Err(mistyped(key, "string", other)),
        }
    }

    pub fn get_color(&self, key: &str) -> Result<Color> {
        let raw = self.get_string(key)?;
        parse_color(raw).with_context(|| format!("Bundle key '{}' is not a color: {:?}", key, raw))
    }

    /// Compact JSON form, handy for logging
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize bundle")
    }

    fn lookup(&self, key: &str) -> Result<&BundleValue> {
        self.entries
            .get(key)
            .with_context(|| format!("Bundle is missing key '{}'", key))
    }
}

fn mistyped(key: &str, wanted: &str, found: &BundleValue) -> anyhow::Error {
    anyhow::anyhow!(
        "Bundle key '{}' should be {} but is {}",
        key,
        wanted,
        found.kind()
    )
}

/// Widget state persisted between runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetState {
    /// When the state was captured (RFC 3339)
    pub timestamp: Option<String>,

    /// Saved progress bar, if one was captured
    #[serde(default)]
    pub progress_bar: Option<Bundle>,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a freshly saved bundle, stamping it with the current time
    pub fn capture(bundle: Bundle) -> Self {
        Self {
            timestamp: Some(chrono::Local::now().to_rfc3339()),
            progress_bar: Some(bundle),
        }
    }

    /// Save widget state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory {:?}", parent))?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize widget state")?;
        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write widget state to {:?}", path))?;

        tracing::info!("Widget state saved to {:?}", path);
        Ok(())
    }

    /// Load widget state from disk; a missing file is an empty state
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No widget state file at {:?}, starting fresh", path);
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read widget state from {:?}", path))?;
        let state: WidgetState = toml::from_str(&content)
            .with_context(|| format!("Failed to parse widget state {:?}", path))?;

        tracing::info!("Widget state loaded from {:?}", path);
        Ok(state)
    }
}
