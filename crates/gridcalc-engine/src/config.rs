//! Engine limits.

use serde::Deserialize;

use crate::error::{FormulaError, Result};

/// Tunable limits for formula evaluation and change propagation.
///
/// Loaded from TOML; every key is optional and unknown keys are rejected:
///
/// ```toml
/// max_propagation_depth = 64
/// max_operations = 100000
/// max_expr_depth = 64
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Nested change-handler invocations allowed before a write is reported
    /// as a circular reference.
    pub max_propagation_depth: usize,
    /// Rhai operation budget per expression (0 = unlimited).
    pub max_operations: u64,
    /// Maximum nesting depth of a single expression.
    pub max_expr_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_propagation_depth: 64,
            max_operations: 100_000,
            max_expr_depth: 64,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| FormulaError::Config(e.to_string()))?;
        if config.max_propagation_depth == 0 {
            return Err(FormulaError::Config(
                "max_propagation_depth must be >= 1".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_toml_str("max_propagation_depth = 8").unwrap();
        assert_eq!(config.max_propagation_depth, 8);
        assert_eq!(config.max_operations, EngineConfig::default().max_operations);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EngineConfig::from_toml_str("max_depth = 3").unwrap_err();
        assert!(matches!(err, FormulaError::Config(_)));
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(EngineConfig::from_toml_str("max_propagation_depth = 0").is_err());
    }
}
