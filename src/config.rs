use crate::error::ConfigError;
use crate::model::{NodeKind, Position};
use crate::registry::NodeTypeRegistry;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

pub const DEFAULT_MAX_PROPAGATION_STEPS: usize = 1024;

/// Deployment-level engine settings, usually loaded from a JSON file.
///
/// ```json
/// {
///   "maxPropagationSteps": 256,
///   "duplicateOffset": { "x": 40, "y": 40 },
///   "defaultOverrides": { "webhook": { "method": "PUT" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Upper bound on deliveries in one propagation pass.
    pub max_propagation_steps: usize,
    /// How far a duplicated node is placed from its original.
    pub duplicate_offset: Position,
    /// Per-kind fields merged over the built-in default data.
    pub default_overrides: AHashMap<NodeKind, Map<String, Value>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_propagation_steps: DEFAULT_MAX_PROPAGATION_STEPS,
            duplicate_offset: Position::new(50.0, 50.0),
            default_overrides: AHashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_propagation_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxPropagationSteps".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn registry(&self) -> NodeTypeRegistry {
        NodeTypeRegistry::with_overrides(self.default_overrides.clone())
    }
}
