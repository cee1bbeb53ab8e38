//! Eating: harvest the current cell, then pay metabolism.
//!
//! All arithmetic uses checked operations. Holdings may legitimately go to
//! zero or below here; [`crate::death::check_death`] decides what that means.

use sugarscape_types::ResourcePair;
use sugarscape_world::ResourceField;

use crate::error::AgentError;
use crate::trader::Trader;

/// Harvest everything on the trader's cell, zero the cell, then subtract
/// one tick of metabolism from both holdings.
///
/// Returns the amount harvested.
///
/// # Errors
///
/// Returns a wrapped [`sugarscape_world::WorldError`] if the trader stands
/// off the field, or [`AgentError::ArithmeticOverflow`] on holdings overflow.
pub fn eat(trader: &mut Trader, field: &mut ResourceField) -> Result<ResourcePair, AgentError> {
    let harvested = field.harvest(trader.position)?;

    let sugar = trader
        .sugar
        .checked_add(i64::from(harvested.sugar))
        .and_then(|s| s.checked_sub(i64::from(trader.metabolism_sugar)))
        .ok_or_else(|| AgentError::overflow("sugar after eating"))?;
    let spice = trader
        .spice
        .checked_add(i64::from(harvested.spice))
        .and_then(|s| s.checked_sub(i64::from(trader.metabolism_spice)))
        .ok_or_else(|| AgentError::overflow("spice after eating"))?;

    trader.sugar = sugar;
    trader.spice = spice;
    Ok(harvested)
}
