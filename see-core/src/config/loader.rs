use std::collections::HashMap;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

/// Read `path` if it exists and merge its flattened keys into `values`.
///
/// A missing file is not an error: every layer is optional.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    load_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
}

pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten("", &yaml, values);
    Ok(())
}

/// Flatten a YAML tree into dot-separated keys (`database.url`).
///
/// Sequences are stored whole under their key and also element-wise as
/// `key.0`, `key.1`, ... so env vars like `APP_ORIGINS_0` can override them.
fn flatten(prefix: &str, value: &serde_yaml::Value, out: &mut HashMap<String, ConfigValue>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let full_key = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full_key, v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) if !prefix.is_empty() => {
            out.insert(
                prefix.to_string(),
                ConfigValue::List(seq.iter().map(ConfigValue::from_yaml).collect()),
            );
            for (i, item) in seq.iter().enumerate() {
                flatten(&format!("{prefix}.{i}"), item, out);
            }
        }
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}
