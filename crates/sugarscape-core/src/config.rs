//! Configuration loading and typed config structures for the Sugarscape
//! simulation.
//!
//! The configuration lives in `sugarscape-config.yaml` at the project root.
//! Every section and field has a default, so an empty document (or no file
//! at all) yields the classic 50x50, 200-trader setup with trade enabled.
//! [`SimulationConfig::validate`] rejects values the model cannot run with.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sugarscape_types::Neighborhood;

/// Errors that can occur when loading or validating configuration.
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

    /// An inclusive range has its bounds the wrong way round.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        /// The offending config key.
        field: &'static str,
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// A value is outside what the model accepts.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// The offending config key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
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
    /// Landscape and random seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Initial population and attribute ranges.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Trade toggle and tolerance.
    #[serde(default)]
    pub trade: TradeConfig,

    /// Run length and reporting.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
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
    /// An empty or whitespace-only document gives the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check that the configuration describes a runnable model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero dimensions, zero
    /// metabolism or vision, or a non-positive tolerance, and
    /// [`ConfigError::InvalidRange`] for inverted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "world.width/height",
                reason: format!(
                    "grid must be non-empty, got {}x{}",
                    self.world.width, self.world.height
                ),
            });
        }

        let population = &self.population;
        population.endowment.check("population.endowment")?;
        population.metabolism.check("population.metabolism")?;
        population.vision.check("population.vision")?;
        if population.metabolism.min == 0 {
            return Err(ConfigError::InvalidValue {
                field: "population.metabolism",
                reason: String::from("metabolism must be at least 1"),
            });
        }
        if population.vision.min == 0 {
            return Err(ConfigError::InvalidValue {
                field: "population.vision",
                reason: String::from("vision must be at least 1"),
            });
        }

        let tolerance = self.trade.mrs_tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "trade.mrs_tolerance",
                reason: format!("must be a positive number, got {tolerance}"),
            });
        }
        Ok(())
    }
}

/// An inclusive `[min, max]` range of whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RangeConfig {
    /// Smallest value drawn.
    pub min: u32,
    /// Largest value drawn.
    pub max: u32,
}

impl RangeConfig {
    /// Build a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Landscape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Neighborhood shape for vision queries.
    #[serde(default)]
    pub neighborhood: Neighborhood,

    /// Sugar capacity map file. When absent the two-peak landscape is
    /// generated at the configured size.
    #[serde(default)]
    pub sugar_map: Option<PathBuf>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            neighborhood: Neighborhood::default(),
            sugar_map: None,
        }
    }
}

/// Population configuration. All ranges are inclusive and drawn uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of traders placed at start.
    #[serde(default = "default_initial_population")]
    pub initial_population: u32,

    /// Initial sugar and spice endowment (drawn separately).
    #[serde(default = "default_endowment")]
    pub endowment: RangeConfig,

    /// Sugar and spice metabolism (drawn separately).
    #[serde(default = "default_metabolism")]
    pub metabolism: RangeConfig,

    /// Vision radius.
    #[serde(default = "default_vision")]
    pub vision: RangeConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_population: default_initial_population(),
            endowment: default_endowment(),
            metabolism: default_metabolism(),
            vision: default_vision(),
        }
    }
}

/// Trade configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeConfig {
    /// Whether the trade phase runs.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Relative tolerance for MRS, welfare, and distance comparisons.
    #[serde(default = "default_mrs_tolerance")]
    pub mrs_tolerance: f64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mrs_tolerance: default_mrs_tolerance(),
        }
    }
}

/// Run-length configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks to run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Whether per-trader trade records are reported alongside model records.
    #[serde(default)]
    pub report_agents: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            report_agents: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_width() -> u32 {
    50
}

const fn default_height() -> u32 {
    50
}

const fn default_seed() -> u64 {
    42
}

const fn default_initial_population() -> u32 {
    200
}

const fn default_endowment() -> RangeConfig {
    RangeConfig::new(25, 50)
}

const fn default_metabolism() -> RangeConfig {
    RangeConfig::new(1, 5)
}

const fn default_vision() -> RangeConfig {
    RangeConfig::new(1, 5)
}

const fn default_true() -> bool {
    true
}

const fn default_mrs_tolerance() -> f64 {
    sugarscape_agents::DEFAULT_MRS_TOLERANCE
}

const fn default_max_ticks() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.width, 50);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.population.initial_population, 200);
        assert_eq!(config.population.endowment, RangeConfig::new(25, 50));
        assert!(config.trade.enabled);
        assert_eq!(config.simulation.max_ticks, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(SimulationConfig::parse("").ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  width: 20
  height: 10
  seed: 7
  neighborhood: moore
  sugar_map: data/sugar-map.txt

population:
  initial_population: 30
  endowment: { min: 5, max: 25 }
  metabolism: { min: 1, max: 4 }
  vision: { min: 1, max: 6 }

trade:
  enabled: false
  mrs_tolerance: 0.000001

simulation:
  max_ticks: 250
  report_agents: true

logging:
  level: debug
";
        let config = SimulationConfig::parse(yaml).ok();
        assert!(config.is_some());
        let Some(config) = config else { return };
        assert_eq!(config.world.width, 20);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.neighborhood, Neighborhood::Moore);
        assert_eq!(
            config.world.sugar_map,
            Some(PathBuf::from("data/sugar-map.txt"))
        );
        assert_eq!(config.population.initial_population, 30);
        assert_eq!(config.population.vision, RangeConfig::new(1, 6));
        assert!(!config.trade.enabled);
        assert!((config.trade.mrs_tolerance - 1e-6).abs() < 1e-18);
        assert_eq!(config.simulation.max_ticks, 250);
        assert!(config.simulation.report_agents);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = SimulationConfig::parse("world:\n  width: 8\n").ok();
        assert_eq!(config.as_ref().map(|c| c.world.width), Some(8));
        assert_eq!(config.as_ref().map(|c| c.world.height), Some(50));
        assert_eq!(
            config.map(|c| c.population.initial_population),
            Some(200)
        );
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn inverted_range_fails_validation() {
        let mut config = SimulationConfig::default();
        config.population.endowment = RangeConfig::new(50, 25);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange {
                field: "population.endowment",
                ..
            })
        ));
    }

    #[test]
    fn zero_metabolism_fails_validation() {
        let mut config = SimulationConfig::default();
        config.population.metabolism = RangeConfig::new(0, 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_width_fails_validation() {
        let mut config = SimulationConfig::default();
        config.world.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_tolerance_fails_validation() {
        let mut config = SimulationConfig::default();
        config.trade.mrs_tolerance = 0.0;
        assert!(config.validate().is_err());
        config.trade.mrs_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::from_file(Path::new("/nonexistent/sugarscape.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
