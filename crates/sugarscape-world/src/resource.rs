//! Regrowth and harvesting of sugar and spice.
//!
//! Each cell has a current amount of both resources and a capacity taken
//! from the field's [`CapacityMap`]s. Regrowth runs once at the start of
//! every tick and adds one unit of each resource, capped so that the current
//! amount never exceeds capacity. A trader standing on a cell harvests all
//! of it at once, leaving zero behind.

use sugarscape_types::{Position, ResourcePair};

use crate::capacity::CapacityMap;
use crate::error::WorldError;

/// Units added per cell and resource on each regrowth.
pub const REGROWTH_PER_TICK: u32 = 1;

/// Field-wide sugar and spice sums: units added by a regrowth pass, or
/// units currently standing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceTotals {
    /// Sugar units.
    pub sugar: u64,
    /// Spice units.
    pub spice: u64,
}

/// Current and maximum sugar and spice for every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceField {
    sugar_capacity: CapacityMap,
    spice_capacity: CapacityMap,
    sugar: Vec<u32>,
    spice: Vec<u32>,
}

impl ResourceField {
    /// Build a field from explicit capacity maps. Every cell starts full.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DimensionMismatch`] if the two maps differ in
    /// size.
    pub fn new(
        sugar_capacity: CapacityMap,
        spice_capacity: CapacityMap,
    ) -> Result<Self, WorldError> {
        if sugar_capacity.width() != spice_capacity.width()
            || sugar_capacity.height() != spice_capacity.height()
        {
            return Err(WorldError::DimensionMismatch {
                expected_width: sugar_capacity.width(),
                expected_height: sugar_capacity.height(),
                found_width: spice_capacity.width(),
                found_height: spice_capacity.height(),
            });
        }
        let sugar = sugar_capacity.cells().to_vec();
        let spice = spice_capacity.cells().to_vec();
        Ok(Self {
            sugar_capacity,
            spice_capacity,
            sugar,
            spice,
        })
    }

    /// Build a field whose spice capacity is the horizontal mirror of the
    /// sugar capacity.
    pub fn from_sugar_map(sugar_capacity: CapacityMap) -> Self {
        let spice_capacity = sugar_capacity.mirrored();
        let sugar = sugar_capacity.cells().to_vec();
        let spice = spice_capacity.cells().to_vec();
        Self {
            sugar_capacity,
            spice_capacity,
            sugar,
            spice,
        }
    }

    /// Field width.
    pub const fn width(&self) -> u32 {
        self.sugar_capacity.width()
    }

    /// Field height.
    pub const fn height(&self) -> u32 {
        self.sugar_capacity.height()
    }

    /// Current sugar and spice at a cell, `None` outside the field.
    pub fn amount(&self, position: Position) -> Option<ResourcePair> {
        let index = self.index_of(position)?;
        Some(ResourcePair {
            sugar: self.sugar.get(index).copied()?,
            spice: self.spice.get(index).copied()?,
        })
    }

    /// Capacity at a cell, `None` outside the field.
    pub fn capacity(&self, position: Position) -> Option<ResourcePair> {
        Some(ResourcePair {
            sugar: self.sugar_capacity.get(position)?,
            spice: self.spice_capacity.get(position)?,
        })
    }

    /// Add one unit of each resource to every cell, capped at capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if checked arithmetic fails.
    pub fn regrow(&mut self) -> Result<ResourceTotals, WorldError> {
        let sugar = regrow_layer(&mut self.sugar, self.sugar_capacity.cells())?;
        let spice = regrow_layer(&mut self.spice, self.spice_capacity.cells())?;
        Ok(ResourceTotals { sugar, spice })
    }

    /// Take everything at a cell, leaving it empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the cell is outside the field.
    pub fn harvest(&mut self, position: Position) -> Result<ResourcePair, WorldError> {
        let out_of_bounds = WorldError::OutOfBounds {
            position,
            width: self.width(),
            height: self.height(),
        };
        let Some(index) = self.index_of(position) else {
            return Err(out_of_bounds);
        };
        let (Some(sugar), Some(spice)) = (self.sugar.get_mut(index), self.spice.get_mut(index))
        else {
            return Err(out_of_bounds);
        };
        let taken = ResourcePair {
            sugar: *sugar,
            spice: *spice,
        };
        *sugar = 0;
        *spice = 0;
        Ok(taken)
    }

    /// Set every cell's current amount to zero.
    pub fn deplete(&mut self) {
        self.sugar.fill(0);
        self.spice.fill(0);
    }

    /// Total sugar and spice currently on the field.
    pub fn totals(&self) -> ResourceTotals {
        ResourceTotals {
            sugar: self.sugar.iter().map(|&v| u64::from(v)).sum(),
            spice: self.spice.iter().map(|&v| u64::from(v)).sum(),
        }
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if position.x >= self.width() || position.y >= self.height() {
            return None;
        }
        let width = usize::try_from(self.width()).ok()?;
        usize::try_from(position.y)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(position.x).ok()?)
    }
}

/// Regrow one resource layer in place, returning the units added.
fn regrow_layer(current: &mut [u32], capacity: &[u32]) -> Result<u64, WorldError> {
    let mut added: u64 = 0;
    for (amount, &cap) in current.iter_mut().zip(capacity) {
        if *amount >= cap {
            continue;
        }
        let headroom = cap.checked_sub(*amount).ok_or(WorldError::ArithmeticOverflow)?;
        let step = REGROWTH_PER_TICK.min(headroom);
        *amount = amount.checked_add(step).ok_or(WorldError::ArithmeticOverflow)?;
        added = added
            .checked_add(u64::from(step))
            .ok_or(WorldError::ArithmeticOverflow)?;
    }
    Ok(added)
}
