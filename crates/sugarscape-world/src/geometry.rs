//! Distance and neighborhood membership on the integer lattice.

use sugarscape_types::{Neighborhood, Position};

/// Euclidean distance between two cells.
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    dx.hypot(dy)
}

/// Whether `cell` lies within `radius` of `center` under the given
/// neighborhood shape. The center itself is always within radius.
pub fn within_radius(
    center: Position,
    cell: Position,
    radius: u32,
    neighborhood: Neighborhood,
) -> bool {
    let dx = center.x.abs_diff(cell.x);
    let dy = center.y.abs_diff(cell.y);
    match neighborhood {
        // A sum that overflows u32 is certainly beyond any u32 radius.
        Neighborhood::VonNeumann => dx.checked_add(dy).is_some_and(|d| d <= radius),
        Neighborhood::Moore => dx.max(dy) <= radius,
    }
}
