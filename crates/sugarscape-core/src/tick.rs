//! Tick cycle: the per-step scheduler that drives the Sugarscape simulation.
//!
//! Each tick runs these phases in strict order:
//!
//! 1. **Regrowth** -- every cell gains one sugar and one spice, capped at
//!    its capacity.
//!
//! 2. **Forage** -- traders are visited in a fresh random order. Each one
//!    clears its trade history, moves, eats, and is removed if it starved.
//!
//! 3. **Trade** -- when trade is enabled, the survivors are visited in a
//!    second, independent random order. Each one runs the trade protocol
//!    against every trader within its vision, in grid order. A pair may
//!    meet twice in the same tick, once from each side.
//!
//! 4. **Collect** -- the data collector records model and agent reports.
//!
//! The tick cycle is deterministic given the same initial state and rng seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sugarscape_agents::{
    AgentError, DeathRecord, NewTrader, TraderRegistry, eat, move_trader, process_death,
    trade_pair,
};
use sugarscape_types::{ModelRecord, TraderId};
use sugarscape_world::{Grid, ResourceField, ResourceTotals, WorldError};
use tracing::{debug, info};

use crate::collector::DataCollector;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A trader operation failed.
    #[error("agent error for {trader_id}: {source}")]
    Agent {
        /// The trader that caused the error.
        trader_id: TraderId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A counter (tick, trade count, trader ids) overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: &'static str,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Number of living traders at end of tick.
    pub traders_alive: u64,
    /// Traders who died during this tick.
    pub deaths: Vec<DeathRecord>,
    /// Resources added by regrowth.
    pub regrowth: ResourceTotals,
    /// Accepted exchanges (each counted once, not once per side).
    pub trades: u64,
    /// The model record stored by the data collector.
    pub record: ModelRecord,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// Number of the last completed tick (0 before the first).
    pub tick: u64,
    /// Sugar and spice on every cell.
    pub field: ResourceField,
    /// Trader occupancy.
    pub grid: Grid,
    /// Live traders.
    pub traders: TraderRegistry,
    /// Whether the trade phase runs.
    pub trade_enabled: bool,
    /// Relative tolerance for MRS, welfare, and distance comparisons.
    pub tolerance: f64,
    /// The single random source for every stochastic choice.
    pub rng: StdRng,
    /// Per-tick reports.
    pub collector: DataCollector,
}

impl SimulationState {
    /// Assemble a state with no traders.
    pub fn new(
        field: ResourceField,
        grid: Grid,
        trade_enabled: bool,
        tolerance: f64,
        rng: StdRng,
    ) -> Self {
        Self {
            tick: 0,
            field,
            grid,
            traders: TraderRegistry::new(),
            trade_enabled,
            tolerance,
            rng,
            collector: DataCollector::new(),
        }
    }

    /// Create a trader and place it on its starting cell.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the cell is off the grid or taken; the
    /// registry is left unchanged in that case.
    pub fn insert_trader(&mut self, params: NewTrader) -> Result<TraderId, TickError> {
        if !self.grid.is_empty(params.position) {
            return Err(match self.grid.occupant(params.position) {
                Some(occupant) => WorldError::CellOccupied {
                    position: params.position,
                    occupant,
                },
                None => WorldError::OutOfBounds {
                    position: params.position,
                    width: self.grid.width(),
                    height: self.grid.height(),
                },
            }
            .into());
        }
        let id = self
            .traders
            .spawn(params)
            .map_err(|_exhausted| TickError::ArithmeticOverflow {
                context: "trader id allocation",
            })?;
        self.grid.place(id, params.position)?;
        Ok(id)
    }

    /// Number of living traders.
    pub fn population(&self) -> usize {
        self.traders.len()
    }

    /// Advance one tick.
    ///
    /// # Errors
    ///
    /// Propagates any [`TickError`] from [`run_tick`].
    pub fn step(&mut self) -> Result<TickSummary, TickError> {
        run_tick(self)
    }

    /// Advance `ticks` ticks, returning the last summary.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`TickError`].
    pub fn run(&mut self, ticks: u64) -> Result<Option<TickSummary>, TickError> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step()?);
        }
        Ok(last)
    }
}

/// Execute one complete tick of the simulation.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let tick = state
        .tick
        .checked_add(1)
        .ok_or(TickError::ArithmeticOverflow {
            context: "tick counter",
        })?;
    state.tick = tick;

    // --- Phase 1: Regrowth ---
    let regrowth = state.field.regrow()?;
    debug!(tick, sugar = regrowth.sugar, spice = regrowth.spice, "Resources regrown");

    // --- Phase 2: Forage ---
    let deaths = phase_forage(state)?;

    // --- Phase 3: Trade ---
    let trades = if state.trade_enabled {
        phase_trade(state)?
    } else {
        0
    };

    // --- Phase 4: Collect ---
    let record = state.collector.collect(tick, &state.traders);
    let traders_alive = record.traders;

    info!(
        tick,
        traders = traders_alive,
        deaths = deaths.len(),
        trades,
        volume = record.trade_volume,
        price = ?record.price,
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        traders_alive,
        deaths,
        regrowth,
        trades,
        record,
    })
}

/// Phase 2: shuffled move, eat, die.
fn phase_forage(state: &mut SimulationState) -> Result<Vec<DeathRecord>, TickError> {
    let mut order = state.traders.ids();
    order.shuffle(&mut state.rng);

    let mut deaths = Vec::new();
    for id in order {
        let agent_error = |source| TickError::Agent {
            trader_id: id,
            source,
        };
        let Some(trader) = state.traders.get_mut(id) else {
            continue;
        };
        trader.reset_history();
        move_trader(
            trader,
            &mut state.grid,
            &state.field,
            state.tolerance,
            &mut state.rng,
        )
        .map_err(agent_error)?;
        eat(trader, &mut state.field).map_err(agent_error)?;

        if let Some(death) =
            process_death(&mut state.traders, &mut state.grid, id).map_err(agent_error)?
        {
            deaths.push(death);
        }
    }
    Ok(deaths)
}

/// Phase 3: reshuffled bilateral trade with every neighbor in vision.
fn phase_trade(state: &mut SimulationState) -> Result<u64, TickError> {
    let mut order = state.traders.ids();
    order.shuffle(&mut state.rng);

    let tolerance = state.tolerance;
    let mut trades: u64 = 0;
    for id in order {
        let agent_error = |source| TickError::Agent {
            trader_id: id,
            source,
        };
        let Some(trader) = state.traders.get(id) else {
            continue;
        };
        let neighbors = state.grid.occupants_within(trader.position, trader.vision);
        for partner in neighbors {
            let session = state
                .traders
                .with_pair_mut(id, partner, |me, other| trade_pair(me, other, tolerance))
                .map_err(agent_error)?
                .map_err(agent_error)?;
            trades = trades
                .checked_add(u64::from(session.trades))
                .ok_or(TickError::ArithmeticOverflow {
                    context: "trade count",
                })?;
        }
    }
    Ok(trades)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sugarscape_agents::DEFAULT_MRS_TOLERANCE;
    use sugarscape_types::{Neighborhood, Position, ResourcePair};
    use sugarscape_world::CapacityMap;

    fn barren_state(width: u32, height: u32) -> SimulationState {
        let map = CapacityMap::uniform(width, height, 0).unwrap();
        let grid = Grid::new(width, height, Neighborhood::VonNeumann).unwrap();
        SimulationState::new(
            ResourceField::from_sugar_map(map),
            grid,
            true,
            DEFAULT_MRS_TOLERANCE,
            StdRng::seed_from_u64(1),
        )
    }

    fn params(x: u32, y: u32, sugar: u32, spice: u32) -> NewTrader {
        NewTrader {
            position: Position::new(x, y),
            endowment: ResourcePair { sugar, spice },
            metabolism_sugar: 1,
            metabolism_spice: 1,
            vision: 1,
        }
    }

    #[test]
    fn tick_counter_advances() {
        let mut state = barren_state(3, 3);
        assert_eq!(state.step().unwrap().tick, 1);
        assert_eq!(state.step().unwrap().tick, 2);
        assert_eq!(state.tick, 2);
    }

    #[test]
    fn run_steps_n_times() {
        let mut state = barren_state(3, 3);
        let last = state.run(5).unwrap();
        assert_eq!(last.map(|s| s.tick), Some(5));
        assert_eq!(state.collector.model_records().len(), 5);
        assert_eq!(state.run(0).unwrap(), None);
    }

    #[test]
    fn insert_rejects_occupied_cell() {
        let mut state = barren_state(3, 3);
        state.insert_trader(params(1, 1, 5, 5)).unwrap();
        assert!(state.insert_trader(params(1, 1, 5, 5)).is_err());
        assert!(state.insert_trader(params(9, 9, 5, 5)).is_err());
        assert_eq!(state.population(), 1);
    }

    #[test]
    fn starving_trader_dies_before_trade() {
        let mut state = barren_state(3, 1);
        // One unit of each: eating costs one, leaving zero.
        let doomed = state.insert_trader(params(0, 0, 1, 1)).unwrap();
        state.insert_trader(params(1, 0, 20, 10)).unwrap();
        let summary = state.step().unwrap();
        assert_eq!(summary.deaths.len(), 1);
        assert_eq!(summary.deaths.first().map(|d| d.trader_id), Some(doomed));
        assert_eq!(summary.traders_alive, 1);
        assert_eq!(summary.trades, 0);
        assert!(!state.traders.contains(doomed));
    }

    #[test]
    fn disabled_trade_skips_exchange() {
        let mut state = barren_state(2, 1);
        state.trade_enabled = false;
        state.insert_trader(params(0, 0, 11, 21)).unwrap();
        state.insert_trader(params(1, 0, 21, 11)).unwrap();
        let summary = state.step().unwrap();
        assert_eq!(summary.trades, 0);
        assert_eq!(summary.record.trade_volume, 0);
        assert_eq!(summary.record.price, None);
    }

    #[test]
    fn regrowth_is_reported() {
        let map = CapacityMap::uniform(2, 2, 3).unwrap();
        let mut field = ResourceField::from_sugar_map(map);
        field.deplete();
        let grid = Grid::new(2, 2, Neighborhood::VonNeumann).unwrap();
        let rng = StdRng::seed_from_u64(0);
        let mut state = SimulationState::new(field, grid, true, DEFAULT_MRS_TOLERANCE, rng);
        let summary = state.step().unwrap();
        assert_eq!(summary.regrowth, ResourceTotals { sugar: 4, spice: 4 });
    }
}
