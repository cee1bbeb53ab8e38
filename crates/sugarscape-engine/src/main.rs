//! Simulation engine binary for the Sugarscape trade simulation.
//!
//! This is the main entry point that wires together configuration, the
//! landscape, the seeded population, and the tick loop. It streams one JSON
//! report line per tick on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! sugarscape-engine [CONFIG]
//! ```
//!
//! `CONFIG` defaults to `sugarscape-config.yaml` in the working directory.
//! When that default file is absent the built-in defaults are used.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Load the sugar capacity map, or generate the two-peak landscape
//! 4. Build the seeded population
//! 5. Run the simulation loop, streaming reports
//! 6. Log the result

mod error;
mod report;

use std::path::{Path, PathBuf};

use sugarscape_core::config::SimulationConfig;
use sugarscape_core::runner;
use sugarscape_core::spawn::build_simulation;
use sugarscape_world::CapacityMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::JsonLinesReporter;

/// Config file used when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "sugarscape-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let explicit_path = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, config_path) = load_config(explicit_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("sugarscape-engine starting");
    info!(
        config = ?config_path,
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        initial_population = config.population.initial_population,
        trade = config.trade.enabled,
        "Configuration loaded"
    );

    // 3. Load the landscape.
    let sugar_map = load_sugar_map(&config, config_path.as_deref())?;
    info!(
        width = sugar_map.width(),
        height = sugar_map.height(),
        total_sugar = sugar_map.total(),
        "Landscape ready"
    );

    // 4. Build the population.
    let mut state = build_simulation(&config, sugar_map).map_err(EngineError::from)?;

    // 5. Run the simulation.
    let stdout = std::io::stdout().lock();
    let mut reporter = JsonLinesReporter::new(stdout, config.simulation.report_agents);
    let result = runner::run_simulation(&mut state, config.simulation.max_ticks, &mut reporter)
        .map_err(EngineError::from)?;
    reporter.finish()?;

    // 6. Log results.
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "sugarscape-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// An explicit path must exist. The default path is optional: when it is
/// missing the built-in defaults are used. Returns the config together with
/// the file it came from, if any.
fn load_config(
    explicit_path: Option<PathBuf>,
) -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    let path = match explicit_path {
        Some(path) => path,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default_path.exists() {
                return Ok((SimulationConfig::default(), None));
            }
            default_path
        }
    };
    let config = SimulationConfig::from_file(&path)?;
    config.validate()?;
    Ok((config, Some(path)))
}

/// Load the sugar capacity map named by the config, or generate the
/// two-peak landscape at the configured size.
///
/// Relative map paths are resolved against the config file's directory.
fn load_sugar_map(
    config: &SimulationConfig,
    config_path: Option<&Path>,
) -> Result<CapacityMap, EngineError> {
    let Some(map_path) = config.world.sugar_map.as_deref() else {
        info!("No capacity map configured, generating two-peak landscape");
        return Ok(CapacityMap::two_peaks(config.world.width, config.world.height)?);
    };

    let path = resolve_relative(map_path, config_path);
    let text = std::fs::read_to_string(&path).map_err(|source| EngineError::MapIo {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Capacity map loaded");
    Ok(CapacityMap::parse(&text)?)
}

fn resolve_relative(map_path: &Path, config_path: Option<&Path>) -> PathBuf {
    if map_path.is_absolute() {
        return map_path.to_path_buf();
    }
    config_path
        .and_then(Path::parent)
        .map_or_else(|| map_path.to_path_buf(), |dir| dir.join(map_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_map_path_follows_config_dir() {
        let resolved = resolve_relative(
            Path::new("maps/sugar.txt"),
            Some(Path::new("/etc/sugarscape/config.yaml")),
        );
        assert_eq!(resolved, PathBuf::from("/etc/sugarscape/maps/sugar.txt"));
    }

    #[test]
    fn absolute_map_path_is_kept() {
        let resolved = resolve_relative(
            Path::new("/data/sugar.txt"),
            Some(Path::new("/etc/sugarscape/config.yaml")),
        );
        assert_eq!(resolved, PathBuf::from("/data/sugar.txt"));
    }

    #[test]
    fn map_path_without_config_file_is_cwd_relative() {
        assert_eq!(
            resolve_relative(Path::new("sugar.txt"), None),
            PathBuf::from("sugar.txt")
        );
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(matches!(
            load_config(Some(PathBuf::from("/nonexistent/sugarscape.yaml"))),
            Err(EngineError::Config { .. })
        ));
    }

    #[test]
    fn generated_landscape_matches_config_size() {
        let mut config = SimulationConfig::default();
        config.world.width = 12;
        config.world.height = 8;
        let map = load_sugar_map(&config, None).ok();
        assert_eq!(map.map(|m| (m.width(), m.height())), Some((12, 8)));
    }
}
