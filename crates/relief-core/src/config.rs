//! Configuration loading and typed config structures for the Relief simulation.
//!
//! The configuration lives in `relief-config.yaml`. Every key is optional;
//! omitted keys take the defaults below.
//!
//! ```yaml
//! agent:
//!   agent_id: ResponseAgent-1
//!   cycles: 15
//!   timeout_ms: 350
//!   assessment_delay_ms: 100
//!   response_delay_ms: 100
//!   recovery_delay_ms: 50
//! environment:
//!   seed: 42
//!   base_probability: 0.5
//!   interval_ms: 300
//!   duration_ms: 3000
//! logging:
//!   level: info
//!   log_file: response_events.log
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::agent::PassTiming;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Agent identity, loop bounds and simulated delays.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Hazard generator settings.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Log level and optional log file.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Label used as the prefix of every log line the agent emits.
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Maximum number of wait-and-process cycles.
    #[serde(default = "default_cycles")]
    pub cycles: u64,

    /// Milliseconds to wait for an event each cycle.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Simulated assessment time in milliseconds.
    #[serde(default = "default_assessment_delay_ms")]
    pub assessment_delay_ms: u64,

    /// Simulated response time in milliseconds.
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,

    /// Simulated recovery time in milliseconds.
    #[serde(default = "default_recovery_delay_ms")]
    pub recovery_delay_ms: u64,
}

impl AgentConfig {
    /// Per-cycle queue wait as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Simulated delays applied during an event-processing pass.
    pub const fn timing(&self) -> PassTiming {
        PassTiming {
            assessment: Duration::from_millis(self.assessment_delay_ms),
            response: Duration::from_millis(self.response_delay_ms),
            recovery: Duration::from_millis(self.recovery_delay_ms),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            cycles: default_cycles(),
            timeout_ms: default_timeout_ms(),
            assessment_delay_ms: default_assessment_delay_ms(),
            response_delay_ms: default_response_delay_ms(),
            recovery_delay_ms: default_recovery_delay_ms(),
        }
    }
}

/// Hazard generator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    /// Random seed for reproducible hazard sequences; `null` for OS entropy.
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,

    /// Probability that a single tick yields an event.
    #[serde(default = "default_base_probability")]
    pub base_probability: f64,

    /// Milliseconds between rolls.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// How long the generator runs; `null` runs until the agent stops.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: Option<u64>,
}

impl EnvironmentConfig {
    /// Interval between rolls as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Total generator run time, if bounded.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            base_probability: default_base_probability(),
            interval_ms: default_interval_ms(),
            duration_ms: default_duration_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File that receives a copy of every log line, if set.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_agent_id() -> String {
    "ResponseAgent-1".to_owned()
}

const fn default_cycles() -> u64 {
    15
}

const fn default_timeout_ms() -> u64 {
    350
}

const fn default_assessment_delay_ms() -> u64 {
    100
}

const fn default_response_delay_ms() -> u64 {
    100
}

const fn default_recovery_delay_ms() -> u64 {
    50
}

#[allow(clippy::unnecessary_wraps)]
const fn default_seed() -> Option<u64> {
    Some(42)
}

const fn default_base_probability() -> f64 {
    0.5
}

const fn default_interval_ms() -> u64 {
    300
}

#[allow(clippy::unnecessary_wraps)]
const fn default_duration_ms() -> Option<u64> {
    Some(3000)
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.agent.agent_id, "ResponseAgent-1");
        assert_eq!(config.agent.cycles, 15);
        assert_eq!(config.environment.seed, Some(42));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_file.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r"
agent:
  agent_id: Agent-7
  timeout_ms: 100
environment:
  seed: null
  duration_ms: null
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.agent.agent_id, "Agent-7");
        assert_eq!(config.agent.timeout(), Duration::from_millis(100));
        assert_eq!(config.agent.recovery_delay_ms, 50);
        assert_eq!(config.environment.seed, None);
        assert_eq!(config.environment.duration(), None);
        assert_eq!(config.environment.interval(), Duration::from_millis(300));
    }

    #[test]
    fn timing_maps_delays() {
        let config = AgentConfig {
            assessment_delay_ms: 1,
            response_delay_ms: 2,
            recovery_delay_ms: 3,
            ..AgentConfig::default()
        };
        let timing = config.timing();
        assert_eq!(timing.assessment, Duration::from_millis(1));
        assert_eq!(timing.response, Duration::from_millis(2));
        assert_eq!(timing.recovery, Duration::from_millis(3));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = SimulationConfig::parse("agent: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/relief-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
