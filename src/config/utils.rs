use std::env;
use std::str::FromStr;

/// Reads an environment variable, treating blank values as unset.
pub(crate) fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses common boolean spellings (`true/false`, `1/0`, `yes/no`, `on/off`).
pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid boolean for {key}: '{other}'")),
    }
}

pub(crate) fn env_bool(key: &str, default: bool) -> Result<bool, String> {
    match env_var(key) {
        Some(value) => parse_bool(key, &value),
        None => Ok(default),
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {key}: '{value}' ({e})")),
        None => Ok(default),
    }
}
