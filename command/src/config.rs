//! Runtime configuration for command dispatch.
//!
//! The configuration only tunes how the runtime behaves. It does not
//! describe commands or schemas.
//!
//! # Example YAML
//!
//! ```yaml
//! prefix: "!"
//! return_policy: observe
//! log_level: debug
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use chat_schema_core::ReturnPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, Result};
use crate::set::DEFAULT_PREFIX;

/// Runtime settings for dispatch and function contracts.
///
/// # Examples
///
/// ```
/// use chat_schema_command::RuntimeConfig;
/// use chat_schema_core::ReturnPolicy;
///
/// let config = RuntimeConfig::from_yaml_str("return_policy: observe").unwrap();
/// assert_eq!(config.prefix, "/");
/// assert_eq!(config.return_policy, ReturnPolicy::Observe);
/// assert_eq!(config.log_level, "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Text that marks a chat message as a command.
    pub prefix: String,
    /// What implemented functions do with a result that fails the return
    /// descriptor.
    pub return_policy: ReturnPolicy,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            return_policy: ReturnPolicy::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](CommandError::IoError) if the file cannot be
    /// read, [`YamlError`](CommandError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](CommandError::InvalidConfig) if a value is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus I/O.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](CommandError::IoError) if the file cannot be
    /// written, or [`YamlError`](CommandError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](CommandError::InvalidConfig) if the prefix
    /// is empty or contains whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(CommandError::InvalidConfig("prefix must not be empty".into()));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(CommandError::InvalidConfig(format!(
                "prefix `{}` must not contain whitespace",
                self.prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
prefix: "!"
return_policy: observe
log_level: debug
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config = RuntimeConfig::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.return_policy, ReturnPolicy::Observe);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = RuntimeConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.prefix, "/");
        assert_eq!(config.return_policy, ReturnPolicy::Enforce);
    }

    #[test]
    fn test_rejects_unusable_prefix() {
        for yaml in [r#"prefix: """#, r#"prefix: "  ""#, r#"prefix: "! ""#] {
            assert!(
                matches!(
                    RuntimeConfig::from_yaml_str(yaml),
                    Err(CommandError::InvalidConfig(_))
                ),
                "yaml {yaml:?}"
            );
        }
    }

    #[test]
    fn test_rejects_unknown_keys_and_policies() {
        assert!(matches!(
            RuntimeConfig::from_yaml_str("prefx: \"!\""),
            Err(CommandError::YamlError(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml_str("return_policy: ignore"),
            Err(CommandError::YamlError(_))
        ));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat-schema.yml");

        let original = RuntimeConfig::from_yaml_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RuntimeConfig::load(dir.path().join("absent.yml")),
            Err(CommandError::IoError(_))
        ));
    }
}
