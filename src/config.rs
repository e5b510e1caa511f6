use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::EngineError;

/// Default file name looked up by [`EngineConfig::load`]
pub const CONFIG_FILE: &str = "babapath.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub passability: PassabilityConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Layout of the exporter's text snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    #[serde(default = "default_column_delimiter")]
    pub column_delimiter: char,
    #[serde(default = "default_stack_delimiter")]
    pub stack_delimiter: char,
    #[serde(default = "default_text_prefix")]
    pub text_prefix: String,
    #[serde(default = "default_connective")]
    pub connective: String,
}

/// A rule-derived reason for a cell to be blocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockingPolicy {
    /// Any entity holding `state` blocks every controlled entity
    Unconditional { state: String },
    /// An entity holding `state` blocks only controlled entities holding `requires`
    Conditional { requires: String, state: String },
}

/// How the goal cell itself is validated when it carries a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPolicy {
    /// Goal may be a text block (it is typically the block to push)
    #[default]
    AllowTextGoal,
    /// Goal is validated under text avoidance like every other cell
    AvoidTextGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassabilityConfig {
    #[serde(default = "default_blocking")]
    pub blocking: Vec<BlockingPolicy>,
    #[serde(default)]
    pub goal_policy: GoalPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_relevant_entities")]
    pub relevant_entities: Vec<String>,
}

// Default values
fn default_header_lines() -> usize { 2 }
fn default_column_delimiter() -> char { '|' }
fn default_stack_delimiter() -> char { '<' }
fn default_text_prefix() -> String { "text_".to_string() }
fn default_connective() -> String { "is".to_string() }
fn default_blocking() -> Vec<BlockingPolicy> {
    vec![
        BlockingPolicy::Unconditional { state: "stop".to_string() },
        BlockingPolicy::Unconditional { state: "defeat".to_string() },
        BlockingPolicy::Conditional { requires: "melt".to_string(), state: "hot".to_string() },
    ]
}
fn default_relevant_entities() -> Vec<String> {
    ["baba", "rock", "flag", "wall", "water"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            header_lines: default_header_lines(),
            column_delimiter: default_column_delimiter(),
            stack_delimiter: default_stack_delimiter(),
            text_prefix: default_text_prefix(),
            connective: default_connective(),
        }
    }
}

impl Default for PassabilityConfig {
    fn default() -> Self {
        Self {
            blocking: default_blocking(),
            goal_policy: GoalPolicy::default(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            relevant_entities: default_relevant_entities(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `babapath.toml`, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        Self::load_or_default(CONFIG_FILE)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) if is_missing(&e) => {
                log::info!("No {} found, using default configuration", path.display());
                EngineConfig::default()
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}; using default configuration", path.display(), e);
                EngineConfig::default()
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))
    }
}

fn is_missing(err: &EngineError) -> bool {
    matches!(err, EngineError::Io(e) if e.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.passability.blocking.len(), 3);
        assert_eq!(config.snapshot.text_prefix, "text_");
    }

    #[test]
    fn blocking_policies_are_tagged() {
        let config = EngineConfig::from_toml_str(
            r#"
            [passability]
            goal_policy = "avoid_text_goal"
            blocking = [
                { kind = "unconditional", state = "stop" },
                { kind = "conditional", requires = "float", state = "sink" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.passability.goal_policy, GoalPolicy::AvoidTextGoal);
        assert_eq!(
            config.passability.blocking[1],
            BlockingPolicy::Conditional { requires: "float".into(), state: "sink".into() }
        );
        assert_eq!(config.snapshot, SnapshotConfig::default());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("[snapshot]\nheader_lines = \"two\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = "definitely/not/here/babapath.toml";
        assert!(is_missing(&EngineConfig::from_file(path).unwrap_err()));
        assert_eq!(EngineConfig::load_or_default(path), EngineConfig::default());
    }

    #[test]
    fn unreadable_file_is_not_reported_as_missing() {
        // A directory exists but cannot be read as a file
        let dir = std::env::temp_dir();
        let err = EngineConfig::from_file(&dir).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
        assert!(!is_missing(&err));
        assert!(!is_missing(&EngineError::Config("bad".into())));
        assert_eq!(EngineConfig::load_or_default(&dir), EngineConfig::default());
    }
}
