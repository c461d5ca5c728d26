//! Config file loading
//!
//! The YAML document is parsed into an untyped tree and flattened into one
//! entry per leaf that the document actually sets. Sections that are present
//! but empty contribute nothing, so defaults underneath stay visible.
//!
//! A known key holding a list or mapping, or a known section holding a
//! scalar, is a type error. The same shapes under unknown names are skipped.

use super::defaults::Registry;
use super::error::ConfigError;
use super::key::{ConfigKey, LayerMap, RawValue};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Load a config file the user asked for.
///
/// An empty path is a no-op. A non-empty path that cannot be read or parsed
/// is fatal.
pub fn load_file(path: &Path, registry: &Registry) -> Result<LayerMap, ConfigError> {
    if path.as_os_str().is_empty() {
        return Ok(LayerMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let layer = parse_yaml_layer(&content, path, registry)?;
    tracing::debug!("Loaded {} key(s) from {}", layer.len(), path.display());
    Ok(layer)
}

/// Load a config file found at a default location.
///
/// A missing file is tolerated and yields an empty layer; a file that exists
/// but fails to parse is still fatal.
pub fn load_default_file(path: &Path, registry: &Registry) -> Result<LayerMap, ConfigError> {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(LayerMap::new())
        }
        _ => load_file(path, registry),
    }
}

/// Flatten a YAML document into `section.field` entries.
pub fn parse_yaml_layer(
    content: &str,
    path: &Path,
    registry: &Registry,
) -> Result<LayerMap, ConfigError> {
    let parse_err = |source: serde_yaml::Error| ConfigError::Parse { path: path.to_path_buf(), source };

    // Parse to generic value first
    let raw: Value = serde_yaml::from_str(content).map_err(parse_err)?;
    if raw.is_null() {
        return Ok(LayerMap::new());
    }
    let root: Mapping = serde_yaml::from_value(raw).map_err(parse_err)?;

    let mut layer = LayerMap::new();
    for (section_name, section) in &root {
        let Some(section_name) = section_name.as_str() else {
            tracing::warn!("Ignoring non-string section name in {}", path.display());
            continue;
        };
        match section {
            Value::Null => {}
            Value::Mapping(fields) => collect_fields(section_name, fields, registry, &mut layer)?,
            other if registry.has_section(section_name) => {
                return Err(ConfigError::Type {
                    key: section_name.to_ascii_lowercase(),
                    raw: render_yaml(other),
                    expected: "section",
                });
            }
            _ => tracing::warn!("Ignoring '{}': expected a section of key/value pairs", section_name),
        }
    }
    Ok(layer)
}

fn collect_fields(
    section: &str,
    fields: &Mapping,
    registry: &Registry,
    layer: &mut LayerMap,
) -> Result<(), ConfigError> {
    for (field, value) in fields {
        let Some(field) = field.as_str() else {
            tracing::warn!("Ignoring non-string key under '{}'", section);
            continue;
        };
        let key = ConfigKey::new(section, field);
        match scalar(value) {
            Some(raw) => {
                layer.insert(key, raw);
            }
            None if value.is_null() => {}
            None => match registry.get(&key) {
                Some(spec) => {
                    return Err(ConfigError::Type {
                        key: key.to_string(),
                        raw: render_yaml(value),
                        expected: spec.kind.expected(),
                    });
                }
                None => tracing::warn!("Ignoring '{}': expected a scalar value", key),
            },
        }
    }
    Ok(())
}

/// Compact YAML text of a value, for error messages.
fn render_yaml(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|text| text.trim_end().replace('\n', " "))
        .unwrap_or_default()
}

fn scalar(value: &Value) -> Option<RawValue> {
    match value {
        Value::Bool(b) => Some(RawValue::Bool(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => RawValue::Int(i),
            None => RawValue::Str(n.to_string()),
        }),
        Value::String(s) => Some(RawValue::Str(s.clone())),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
