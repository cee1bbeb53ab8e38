//! Foraging movement.
//!
//! Each tick a trader looks at every cell within its vision (its own cell
//! included), skips cells held by other traders, and picks the one whose
//! full harvest would leave it best off. Ties on welfare go to the nearest
//! cell; ties on distance are broken uniformly at random.

use rand::Rng;
use rand::seq::IndexedRandom;
use sugarscape_types::{Position, ResourcePair};
use sugarscape_world::{Grid, ResourceField, WorldError, distance};
use tracing::debug;

use crate::error::AgentError;
use crate::trader::Trader;
use crate::welfare::approx_eq;

/// Pick the cell `trader` should move to.
///
/// # Errors
///
/// Returns [`AgentError::NoCandidateCells`] if no cell qualifies, or a
/// wrapped [`WorldError`] if the grid and resource field disagree.
pub fn choose_destination<R: Rng + ?Sized>(
    trader: &Trader,
    grid: &Grid,
    field: &ResourceField,
    tolerance: f64,
    rng: &mut R,
) -> Result<Position, AgentError> {
    let mut scored = Vec::new();
    for cell in grid.cells_within(trader.position, trader.vision, true) {
        if grid.occupant(cell).is_some_and(|other| other != trader.id) {
            continue;
        }
        let amount = field.amount(cell).ok_or(WorldError::OutOfBounds {
            position: cell,
            width: field.width(),
            height: field.height(),
        })?;
        scored.push((cell, harvest_welfare(trader, amount)?));
    }

    let best = scored
        .iter()
        .map(|&(_, welfare)| welfare)
        .fold(f64::NEG_INFINITY, f64::max);
    let richest: Vec<Position> = scored
        .iter()
        .filter(|&&(_, welfare)| approx_eq(welfare, best, tolerance))
        .map(|&(cell, _)| cell)
        .collect();

    let nearest_distance = richest
        .iter()
        .map(|&cell| distance(trader.position, cell))
        .fold(f64::INFINITY, f64::min);
    let nearest: Vec<Position> = richest
        .into_iter()
        .filter(|&cell| approx_eq(distance(trader.position, cell), nearest_distance, tolerance))
        .collect();

    nearest
        .choose(rng)
        .copied()
        .ok_or(AgentError::NoCandidateCells {
            trader: trader.id,
            position: trader.position,
        })
}

/// Move `trader` to its chosen destination, updating grid occupancy.
///
/// Returns the new position.
///
/// # Errors
///
/// Propagates errors from [`choose_destination`] and grid relocation.
pub fn move_trader<R: Rng + ?Sized>(
    trader: &mut Trader,
    grid: &mut Grid,
    field: &ResourceField,
    tolerance: f64,
    rng: &mut R,
) -> Result<Position, AgentError> {
    let destination = choose_destination(trader, grid, field, tolerance, rng)?;
    if destination != trader.position {
        grid.relocate(trader.id, trader.position, destination)?;
        debug!(
            trader = %trader.id,
            from = %trader.position,
            to = %destination,
            "trader moved"
        );
        trader.position = destination;
    }
    Ok(destination)
}

/// Welfare the trader would have after harvesting `amount` in full.
fn harvest_welfare(trader: &Trader, amount: ResourcePair) -> Result<f64, AgentError> {
    let sugar = trader
        .sugar
        .checked_add(i64::from(amount.sugar))
        .ok_or_else(|| AgentError::overflow("prospective sugar"))?;
    let spice = trader
        .spice
        .checked_add(i64::from(amount.spice))
        .ok_or_else(|| AgentError::overflow("prospective spice"))?;
    Ok(trader.welfare_with(sugar, spice))
}
