//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LoggingConfig;
use super::store::{ConfigStore, MemoryConfigStore};
use crate::domain::errors::DbNormError;
use crate::domain::result::Result;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override configuration keys
pub const ENV_PREFIX: &str = "DBNORM__";

/// Loads configuration from a TOML file into a [`MemoryConfigStore`]
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into a JSON tree
/// 4. Applies `DBNORM__SECTION__KEY` environment overrides
///
/// The `database` section is not validated here; that is the facade's job.
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
///
/// # Examples
///
/// ```no_run
/// use dbnorm::config::{load_config, ConfigStore};
///
/// let store = load_config("dbnorm.toml").expect("Failed to load config");
/// assert!(store.has("database"));
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MemoryConfigStore> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DbNormError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DbNormError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let store = load_config_str(&contents)?;
    apply_env_overrides(&store, std::env::vars())?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(store)
}

/// Parses TOML text (after `${VAR}` substitution) into a store
///
/// # Errors
///
/// Returns an error on unset variables or invalid TOML.
pub fn load_config_str(contents: &str) -> Result<MemoryConfigStore> {
    let contents = substitute_env_vars(contents)?;
    let document: toml::Value = toml::from_str(&contents)?;
    let tree = serde_json::to_value(document)?;
    Ok(MemoryConfigStore::new(tree))
}

/// Adds a top-level table to the configuration file at `path`
///
/// The file is re-read as written, without `${VAR}` substitution or
/// environment overrides, so placeholders and every other section are kept
/// as they are on disk. Nothing is written when the file already has `key`.
/// Returns whether the section was written.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed as TOML (a
/// placeholder used as a bare value is not valid TOML), or if `value` has
/// no TOML form.
pub fn save_section(path: impl AsRef<Path>, key: &str, value: &Value) -> Result<bool> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut document: toml::Table = toml::from_str(&contents)?;

    if document.contains_key(key) {
        tracing::debug!(path = %path.display(), key = %key, "Section already present, not written");
        return Ok(false);
    }

    document.insert(key.to_string(), toml::Value::try_from(value)?);
    fs::write(path, toml::to_string_pretty(&document)?)?;

    tracing::debug!(path = %path.display(), key = %key, "Section written");
    Ok(true)
}

/// Reads and validates the `[logging]` section, defaulting when absent
///
/// # Errors
///
/// Returns an error if the section does not match [`LoggingConfig`].
pub fn logging_config(store: &dyn ConfigStore) -> Result<LoggingConfig> {
    let config = match store.get("logging") {
        Some(value) => serde_json::from_value::<LoggingConfig>(value).map_err(|e| {
            DbNormError::Configuration(format!("Invalid [logging] section: {e}"))
        })?,
        None => LoggingConfig::default(),
    };

    config
        .validate()
        .map_err(|e| DbNormError::Configuration(format!("Configuration validation failed: {e}")))?;
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DbNormError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DbNormError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `DBNORM__A__B__C=value` overrides as dotted keys `a.b.c`
///
/// `true`/`false` become booleans; every other value is stored as a string
/// (the validator accepts numeric strings for `port`).
fn apply_env_overrides(
    store: &dyn ConfigStore,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<()> {
    for (name, raw) in vars {
        let Some(path) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        let key = path
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        if key.is_empty() {
            continue;
        }

        let value = match raw.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw),
        };

        tracing::debug!(key = %key, "Applying environment override");
        store.set(&key, value)?;
    }

    Ok(())
}
