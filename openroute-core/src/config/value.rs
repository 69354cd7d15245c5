use std::collections::HashMap;

use super::ConfigError;

/// A configuration leaf or subtree, as read from YAML or the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<ConfigValue>),
    Map(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    pub(crate) fn from_yaml(value: &serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => ConfigValue::Null,
            Yaml::Bool(b) => ConfigValue::Bool(*b),
            Yaml::Number(n) => n
                .as_i64()
                .map(ConfigValue::Integer)
                .or_else(|| n.as_f64().map(ConfigValue::Float))
                .unwrap_or_else(|| ConfigValue::String(n.to_string())),
            Yaml::String(s) => ConfigValue::String(s.clone()),
            Yaml::Sequence(seq) => ConfigValue::List(seq.iter().map(ConfigValue::from_yaml).collect()),
            Yaml::Mapping(map) => ConfigValue::Map(
                map.iter()
                    .map(|(k, v)| (yaml_key(k), ConfigValue::from_yaml(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => ConfigValue::from_yaml(&tagged.value),
        }
    }

}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

pub(crate) fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

/// Conversion from a [`ConfigValue`] into a concrete type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be read from the configuration",
    note = "built-in types: String, integers, floats, bool, Option<T>, Vec<T>, HashMap<String, T>"
)]
pub trait FromConfigValue: Sized {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError>;
}

impl FromConfigValue for ConfigValue {
    fn from_config_value(value: &ConfigValue, _key: &str) -> Result<Self, ConfigError> {
        Ok(value.clone())
    }
}

impl FromConfigValue for String {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            ConfigValue::Integer(i) => Ok(i.to_string()),
            ConfigValue::Float(f) => Ok(f.to_string()),
            ConfigValue::Bool(b) => Ok(b.to_string()),
            _ => Err(mismatch(key, "string")),
        }
    }
}

impl FromConfigValue for i64 {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Integer(i) => Ok(*i),
            ConfigValue::String(s) => s.trim().parse().map_err(|_| mismatch(key, "i64")),
            _ => Err(mismatch(key, "i64")),
        }
    }
}

impl FromConfigValue for f64 {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            ConfigValue::String(s) => s.trim().parse().map_err(|_| mismatch(key, "f64")),
            _ => Err(mismatch(key, "f64")),
        }
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::String(s) if s.eq_ignore_ascii_case("true") || s == "1" => Ok(true),
            ConfigValue::String(s) if s.eq_ignore_ascii_case("false") || s == "0" => Ok(false),
            _ => Err(mismatch(key, "bool")),
        }
    }
}

impl<T: FromConfigValue> FromConfigValue for Option<T> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::Null => Ok(None),
            other => T::from_config_value(other, key).map(Some),
        }
    }
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        match value {
            ConfigValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::from_config_value(item, &format!("{key}.{i}")))
                .collect(),
            // Environment overrides are flat strings: `a,b,c`.
            ConfigValue::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .enumerate()
                .map(|(i, part)| T::from_config_value(&ConfigValue::from(part), &format!("{key}.{i}")))
                .collect(),
            other => Ok(vec![T::from_config_value(other, key)?]),
        }
    }
}

impl<T: FromConfigValue> FromConfigValue for HashMap<String, T> {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        let ConfigValue::Map(map) = value else {
            return Err(mismatch(key, "map"));
        };
        map.iter()
            .map(|(k, v)| Ok((k.clone(), T::from_config_value(v, &format!("{key}.{k}"))?)))
            .collect()
    }
}

macro_rules! from_config_int {
    ($($ty:ty),+) => {$(
        impl FromConfigValue for $ty {
            fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
                let wide = i64::from_config_value(value, key)?;
                <$ty>::try_from(wide).map_err(|_| mismatch(key, stringify!($ty)))
            }
        }
    )+};
}

from_config_int!(i8, i16, i32, u8, u16, u32, u64, usize);

impl FromConfigValue for f32 {
    fn from_config_value(value: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        f64::from_config_value(value, key).map(|f| f as f32)
    }
}
