use std::collections::HashMap;
use std::path::Path;

use super::value::{yaml_key, ConfigValue};
use super::ConfigError;

pub(crate) type Values = HashMap<String, ConfigValue>;

/// Merge a YAML file into `values`. A missing file is not an error.
pub(crate) fn merge_yaml_file(path: &Path, values: &mut Values) -> Result<bool, ConfigError> {
    if !path.is_file() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    merge_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    Ok(true)
}

pub(crate) fn merge_yaml_str(content: &str, values: &mut Values) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten(None, &yaml, values);
    Ok(())
}

/// Store every node under its dot-separated path. Mappings and sequences
/// are kept whole at their own key as well, so a section can be read at once.
fn flatten(prefix: Option<&str>, node: &serde_yaml::Value, out: &mut Values) {
    if let Some(prefix) = prefix {
        out.insert(prefix.to_string(), ConfigValue::from_yaml(node));
    }
    let join = |key: String| match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key,
    };
    match node {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                flatten(Some(&join(yaml_key(k))), v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                flatten(Some(&join(i.to_string())), item, out);
            }
        }
        _ => {}
    }
}

/// `APP_SERVER_PORT` becomes `app.server.port`.
pub(crate) fn env_key(var: &str) -> String {
    var.to_ascii_lowercase().replace("__", "-").replace('_', ".")
}

pub(crate) fn overlay_env<I>(vars: I, values: &mut Values)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (var, value) in vars {
        values.insert(env_key(&var), ConfigValue::String(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_sections_are_flattened_and_kept_whole() {
        let mut values = Values::new();
        merge_yaml_str("openapi:\n  title: Items\n  servers:\n    - http://a\n    - http://b\n", &mut values).unwrap();
        assert_eq!(values.get("openapi.title"), Some(&ConfigValue::from("Items")));
        assert_eq!(values.get("openapi.servers.1"), Some(&ConfigValue::from("http://b")));
        assert!(matches!(values.get("openapi.servers"), Some(ConfigValue::List(l)) if l.len() == 2));
        assert!(matches!(values.get("openapi"), Some(ConfigValue::Map(_))));
    }

    #[test]
    fn env_names_map_to_dotted_keys() {
        assert_eq!(env_key("OPENAPI_TITLE"), "openapi.title");
        assert_eq!(env_key("SERVER__BIND_ADDR"), "server-bind.addr");
        let mut values = Values::new();
        overlay_env([("APP_PORT".to_string(), "8080".to_string())], &mut values);
        assert_eq!(values.get("app.port"), Some(&ConfigValue::from("8080")));
    }
}
