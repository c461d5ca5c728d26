//! Keys, layers and raw values shared by every pipeline stage.

use std::collections::BTreeMap;
use std::fmt;

/// Dotted `section.field` path identifying one leaf setting.
///
/// Both halves are stored lower-cased, so `IMAP.Host` and `imap.host` name the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey(String);

impl ConfigKey {
    pub fn new(section: &str, field: &str) -> Self {
        Self(format!("{}.{}", section.to_ascii_lowercase(), field.to_ascii_lowercase()))
    }

    /// Parse a dotted path. Returns `None` unless it has exactly one `.` with
    /// non-empty parts on both sides.
    pub fn parse(dotted: &str) -> Option<Self> {
        let (section, field) = dotted.split_once('.')?;
        if section.is_empty() || field.is_empty() || field.contains('.') {
            return None;
        }
        Some(Self::new(section, field))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn section(&self) -> &str {
        self.0.split_once('.').map(|(s, _)| s).unwrap_or(&self.0)
    }

    pub fn field(&self) -> &str {
        self.0.split_once('.').map(|(_, f)| f).unwrap_or("")
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration source, ordered by priority (later wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Default,
    File,
    Env,
    Cli,
}

impl Layer {
    /// Get the precedence level (higher = takes priority).
    pub fn precedence(&self) -> u8 {
        match self {
            Layer::Default => 0,
            Layer::File => 1,
            Layer::Env => 2,
            Layer::Cli => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Layer::Default => "default",
            Layer::File => "file",
            Layer::Env => "env",
            Layer::Cli => "cli",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An uncoerced leaf value as captured from one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl RawValue {
    /// Textual form used for string fields and error messages.
    pub fn render(&self) -> String {
        match self {
            RawValue::Str(s) => s.clone(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Str(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// Winning value for one key, tagged with the layer that set it last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredValue {
    pub value: RawValue,
    pub layer: Layer,
}

impl LayeredValue {
    pub fn new(value: RawValue, layer: Layer) -> Self {
        Self { value, layer }
    }

    /// Keep whichever of the two values comes from the higher-priority layer.
    pub fn overlay(self, other: Self) -> Self {
        if other.layer.precedence() >= self.layer.precedence() {
            other
        } else {
            self
        }
    }
}

/// Entries one layer actually specifies. Keys absent here are absent from the
/// layer, not zero-valued.
pub type LayerMap = BTreeMap<ConfigKey, RawValue>;

/// Output of the merge engine.
pub type MergedMap = BTreeMap<ConfigKey, LayeredValue>;
