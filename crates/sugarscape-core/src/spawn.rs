//! Initial population construction.
//!
//! [`build_simulation`] turns a validated [`SimulationConfig`] and a sugar
//! capacity map into a ready-to-run [`SimulationState`]. Every random draw
//! comes from one `StdRng` seeded from `world.seed`, in a fixed order:
//!
//! 1. distinct starting cells for the whole population,
//! 2. every sugar endowment, then every spice endowment,
//! 3. every sugar metabolism, then every spice metabolism,
//! 4. every vision radius.
//!
//! The same rng then lives on in the state for activation order and
//! movement tie-breaks, so a seed pins down the whole run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sugarscape_agents::NewTrader;
use sugarscape_types::{Position, ResourcePair};
use sugarscape_world::{CapacityMap, Grid, ResourceField, WorldError};
use tracing::info;

use crate::config::{ConfigError, RangeConfig, SimulationConfig};
use crate::tick::{SimulationState, TickError};

/// Errors that can occur while building the initial simulation.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Grid or resource field construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Placing a trader failed.
    #[error("placement error: {source}")]
    Placement {
        /// The underlying tick-state error.
        #[from]
        source: TickError,
    },

    /// More traders were requested than the grid has cells.
    #[error("population {population} does not fit on a grid of {cells} cells")]
    PopulationExceedsGrid {
        /// Requested population.
        population: u32,
        /// Cells available.
        cells: usize,
    },
}

/// Build the initial simulation state.
///
/// The capacity map must match the configured width and height; spice
/// capacity is its horizontal mirror.
///
/// # Errors
///
/// Returns [`SpawnError::Config`] for an invalid configuration,
/// [`SpawnError::World`] for a map of the wrong size, and
/// [`SpawnError::PopulationExceedsGrid`] when traders cannot each have
/// their own cell.
pub fn build_simulation(
    config: &SimulationConfig,
    sugar_map: CapacityMap,
) -> Result<SimulationState, SpawnError> {
    config.validate()?;

    let world = &config.world;
    if sugar_map.width() != world.width || sugar_map.height() != world.height {
        return Err(WorldError::DimensionMismatch {
            expected_width: world.width,
            expected_height: world.height,
            found_width: sugar_map.width(),
            found_height: sugar_map.height(),
        }
        .into());
    }

    let grid = Grid::new(world.width, world.height, world.neighborhood)?;
    let field = ResourceField::from_sugar_map(sugar_map);
    let mut rng = StdRng::seed_from_u64(world.seed);

    let population = config.population.initial_population;
    let count = usize::try_from(population).unwrap_or(usize::MAX);
    let cells: Vec<Position> = grid.positions().collect();
    if count > cells.len() {
        return Err(SpawnError::PopulationExceedsGrid {
            population,
            cells: cells.len(),
        });
    }

    let placements: Vec<Position> = rand::seq::index::sample(&mut rng, cells.len(), count)
        .into_iter()
        .filter_map(|i| cells.get(i).copied())
        .collect();
    let ranges = &config.population;
    let sugar = draw(&mut rng, count, ranges.endowment);
    let spice = draw(&mut rng, count, ranges.endowment);
    let metabolism_sugar = draw(&mut rng, count, ranges.metabolism);
    let metabolism_spice = draw(&mut rng, count, ranges.metabolism);
    let vision = draw(&mut rng, count, ranges.vision);

    let mut state = SimulationState::new(
        field,
        grid,
        config.trade.enabled,
        config.trade.mrs_tolerance,
        rng,
    );

    for (i, position) in placements.into_iter().enumerate() {
        let attribute = |values: &[u32]| values.get(i).copied().unwrap_or_default();
        state.insert_trader(NewTrader {
            position,
            endowment: ResourcePair {
                sugar: attribute(&sugar),
                spice: attribute(&spice),
            },
            metabolism_sugar: attribute(&metabolism_sugar),
            metabolism_spice: attribute(&metabolism_spice),
            vision: attribute(&vision),
        })?;
    }

    info!(
        width = world.width,
        height = world.height,
        traders = state.population(),
        seed = world.seed,
        trade = config.trade.enabled,
        "Simulation built"
    );
    Ok(state)
}

/// Draw `count` values uniformly from an inclusive range.
fn draw<R: Rng + ?Sized>(rng: &mut R, count: usize, range: RangeConfig) -> Vec<u32> {
    (0..count)
        .map(|_| rng.random_range(range.min..=range.max))
        .collect()
}
