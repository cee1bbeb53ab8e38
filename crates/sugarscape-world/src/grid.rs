//! Occupancy grid: which trader stands on which cell.
//!
//! The [`Grid`] is the spatial backbone of the simulation. It is a bounded
//! (non-toroidal) lattice storing at most one [`TraderId`] per cell, and it
//! answers the neighborhood queries used by movement and trading.
//!
//! Neighborhood enumeration is row-major (`y` outer, `x` inner), so query
//! results are deterministic for a given grid state.

use sugarscape_types::{Neighborhood, Position, TraderId};

use crate::error::WorldError;
use crate::geometry::within_radius;

/// The occupancy index for a `width x height` lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    neighborhood: Neighborhood,
    /// Row-major occupant per cell.
    cells: Vec<Option<TraderId>>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] if either dimension is zero.
    pub fn new(width: u32, height: u32, neighborhood: Neighborhood) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        let len = usize::try_from(u64::from(width).saturating_mul(u64::from(height)))
            .map_err(|_overflow| WorldError::ArithmeticOverflow)?;
        Ok(Self {
            width,
            height,
            neighborhood,
            cells: vec![None; len],
        })
    }

    /// Grid width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether a position lies on the grid.
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// The trader standing on a cell, if any.
    pub fn occupant(&self, position: Position) -> Option<TraderId> {
        self.index_of(position)
            .and_then(|i| self.cells.get(i).copied().flatten())
    }

    /// Whether a cell is on the grid and unoccupied.
    pub fn is_empty(&self, position: Position) -> bool {
        self.index_of(position)
            .and_then(|i| self.cells.get(i))
            .is_some_and(Option::is_none)
    }

    /// Put a trader on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] or [`WorldError::CellOccupied`].
    pub fn place(&mut self, trader: TraderId, position: Position) -> Result<(), WorldError> {
        let slot = self.slot_mut(position)?;
        if let Some(occupant) = *slot {
            return Err(WorldError::CellOccupied { position, occupant });
        }
        *slot = Some(trader);
        Ok(())
    }

    /// Move a trader from one cell to another.
    ///
    /// Moving onto the cell it already occupies is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`], [`WorldError::TraderNotAtCell`],
    /// or [`WorldError::CellOccupied`] as appropriate. The grid is left
    /// unchanged on error.
    pub fn relocate(
        &mut self,
        trader: TraderId,
        from: Position,
        to: Position,
    ) -> Result<(), WorldError> {
        if self.occupant(from) != Some(trader) {
            self.check_bounds(from)?;
            return Err(WorldError::TraderNotAtCell {
                trader,
                position: from,
            });
        }
        if from == to {
            return Ok(());
        }
        // Validate the destination before touching the source.
        {
            let dest = self.slot_mut(to)?;
            if let Some(occupant) = *dest {
                return Err(WorldError::CellOccupied {
                    position: to,
                    occupant,
                });
            }
            *dest = Some(trader);
        }
        *self.slot_mut(from)? = None;
        Ok(())
    }

    /// Take a trader off the grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] or [`WorldError::TraderNotAtCell`].
    pub fn remove(&mut self, trader: TraderId, position: Position) -> Result<(), WorldError> {
        let slot = self.slot_mut(position)?;
        if *slot != Some(trader) {
            return Err(WorldError::TraderNotAtCell { trader, position });
        }
        *slot = None;
        Ok(())
    }

    /// Cells within `radius` of `center` under the grid's neighborhood
    /// shape, clipped to the grid edges, in row-major order.
    pub fn cells_within(
        &self,
        center: Position,
        radius: u32,
        include_center: bool,
    ) -> Vec<Position> {
        if !self.contains(center) {
            return Vec::new();
        }
        let x_min = center.x.saturating_sub(radius);
        let y_min = center.y.saturating_sub(radius);
        let x_max = center.x.saturating_add(radius).min(self.width.saturating_sub(1));
        let y_max = center.y.saturating_add(radius).min(self.height.saturating_sub(1));

        let mut cells = Vec::new();
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let cell = Position::new(x, y);
                if cell == center && !include_center {
                    continue;
                }
                if within_radius(center, cell, radius, self.neighborhood) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Traders standing within `radius` of `center`, excluding whoever
    /// stands on `center` itself.
    pub fn occupants_within(&self, center: Position, radius: u32) -> Vec<TraderId> {
        self.cells_within(center, radius, false)
            .into_iter()
            .filter_map(|cell| self.occupant(cell))
            .collect()
    }

    fn check_bounds(&self, position: Position) -> Result<(), WorldError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        usize::try_from(position.y)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(position.x).ok()?)
    }

    fn slot_mut(&mut self, position: Position) -> Result<&mut Option<TraderId>, WorldError> {
        self.check_bounds(position)?;
        let index = self.index_of(position).ok_or(WorldError::ArithmeticOverflow)?;
        self.cells
            .get_mut(index)
            .ok_or(WorldError::ArithmeticOverflow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid(neighborhood: Neighborhood) -> Grid {
        Grid::new(5, 5, neighborhood).unwrap()
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(matches!(
            Grid::new(0, 3, Neighborhood::Moore),
            Err(WorldError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn place_and_lookup() {
        let mut g = grid(Neighborhood::VonNeumann);
        let id = TraderId::new(1);
        assert!(g.place(id, Position::new(2, 3)).is_ok());
        assert_eq!(g.occupant(Position::new(2, 3)), Some(id));
        assert!(!g.is_empty(Position::new(2, 3)));
        assert!(g.is_empty(Position::new(3, 2)));
        assert_eq!(g.occupied_count(), 1);
    }

    #[test]
    fn place_on_occupied_cell_fails() {
        let mut g = grid(Neighborhood::VonNeumann);
        let pos = Position::new(1, 1);
        assert!(g.place(TraderId::new(1), pos).is_ok());
        assert!(matches!(
            g.place(TraderId::new(2), pos),
            Err(WorldError::CellOccupied { .. })
        ));
    }

    #[test]
    fn out_of_bounds_cell_is_not_empty() {
        let g = grid(Neighborhood::VonNeumann);
        assert!(!g.is_empty(Position::new(5, 0)));
    }

    #[test]
    fn relocate_moves_occupancy() {
        let mut g = grid(Neighborhood::VonNeumann);
        let id = TraderId::new(1);
        g.place(id, Position::new(0, 0)).unwrap();
        assert!(g.relocate(id, Position::new(0, 0), Position::new(4, 4)).is_ok());
        assert!(g.is_empty(Position::new(0, 0)));
        assert_eq!(g.occupant(Position::new(4, 4)), Some(id));
    }

    #[test]
    fn relocate_onto_occupied_cell_leaves_grid_unchanged() {
        let mut g = grid(Neighborhood::VonNeumann);
        let a = TraderId::new(1);
        let b = TraderId::new(2);
        g.place(a, Position::new(0, 0)).unwrap();
        g.place(b, Position::new(1, 0)).unwrap();
        assert!(matches!(
            g.relocate(a, Position::new(0, 0), Position::new(1, 0)),
            Err(WorldError::CellOccupied { .. })
        ));
        assert_eq!(g.occupant(Position::new(0, 0)), Some(a));
        assert_eq!(g.occupant(Position::new(1, 0)), Some(b));
    }

    #[test]
    fn relocate_requires_trader_at_source() {
        let mut g = grid(Neighborhood::VonNeumann);
        assert!(matches!(
            g.relocate(TraderId::new(1), Position::new(0, 0), Position::new(1, 0)),
            Err(WorldError::TraderNotAtCell { .. })
        ));
    }

    #[test]
    fn relocate_in_place_is_noop() {
        let mut g = grid(Neighborhood::VonNeumann);
        let id = TraderId::new(1);
        g.place(id, Position::new(2, 2)).unwrap();
        assert!(g.relocate(id, Position::new(2, 2), Position::new(2, 2)).is_ok());
        assert_eq!(g.occupant(Position::new(2, 2)), Some(id));
    }

    #[test]
    fn remove_clears_cell() {
        let mut g = grid(Neighborhood::VonNeumann);
        let id = TraderId::new(1);
        g.place(id, Position::new(2, 2)).unwrap();
        assert!(g.remove(id, Position::new(2, 2)).is_ok());
        assert!(g.is_empty(Position::new(2, 2)));
        assert!(g.remove(id, Position::new(2, 2)).is_err());
    }

    #[test]
    fn von_neumann_radius_one_has_five_cells_with_center() {
        let g = grid(Neighborhood::VonNeumann);
        assert_eq!(g.cells_within(Position::new(2, 2), 1, true).len(), 5);
        assert_eq!(g.cells_within(Position::new(2, 2), 1, false).len(), 4);
    }

    #[test]
    fn moore_radius_one_has_nine_cells_with_center() {
        let g = grid(Neighborhood::Moore);
        assert_eq!(g.cells_within(Position::new(2, 2), 1, true).len(), 9);
    }

    #[test]
    fn neighborhood_is_clipped_at_edges() {
        let g = grid(Neighborhood::Moore);
        // Corner: 2x2 block including the center.
        assert_eq!(g.cells_within(Position::new(0, 0), 1, true).len(), 4);
    }

    #[test]
    fn neighborhood_is_row_major() {
        let g = grid(Neighborhood::VonNeumann);
        let cells = g.cells_within(Position::new(2, 2), 1, true);
        assert_eq!(
            cells,
            vec![
                Position::new(2, 1),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(2, 3),
            ]
        );
    }

    #[test]
    fn occupants_within_excludes_center() {
        let mut g = grid(Neighborhood::VonNeumann);
        let me = TraderId::new(0);
        let near = TraderId::new(1);
        let far = TraderId::new(2);
        g.place(me, Position::new(2, 2)).unwrap();
        g.place(near, Position::new(2, 3)).unwrap();
        g.place(far, Position::new(4, 4)).unwrap();
        assert_eq!(g.occupants_within(Position::new(2, 2), 1), vec![near]);
        assert_eq!(g.occupants_within(Position::new(2, 2), 4), vec![near, far]);
    }

    #[test]
    fn positions_cover_every_cell() {
        let g = grid(Neighborhood::Moore);
        assert_eq!(g.positions().count(), g.cell_count());
        assert_eq!(g.positions().next(), Some(Position::new(0, 0)));
    }
}
