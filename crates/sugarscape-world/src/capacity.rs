//! Static per-cell capacity maps.
//!
//! A [`CapacityMap`] holds the maximum amount of one resource each cell can
//! carry. Maps are parsed from plain text: one row per line, values
//! separated by whitespace, blank lines and `#` comments ignored. The first
//! line is row `y = 0` and the first column is `x = 0`.
//!
//! The spice map of a simulation is the horizontal mirror of its sugar map
//! (see [`CapacityMap::mirrored`]). When no map file is supplied,
//! [`CapacityMap::two_peaks`] generates the classic landscape of two hills
//! whose capacity falls from 4 at the summit to 0 in the lowlands.

use sugarscape_types::Position;

use crate::error::WorldError;

/// Capacity at the summit of a generated hill.
pub const PEAK_CAPACITY: u32 = 4;

/// A rectangular, row-major grid of per-cell capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityMap {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl CapacityMap {
    /// Parse a whitespace-delimited matrix.
    ///
    /// Values may be written as integers (`4`) or whole floats (`4.0`).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MalformedToken`] for non-numeric tokens,
    /// [`WorldError::InvalidCapacity`] for negative, fractional, or
    /// non-finite values, [`WorldError::RaggedRow`] when rows differ in
    /// length, and [`WorldError::EmptyMap`] when there are no values.
    pub fn parse(text: &str) -> Result<Self, WorldError> {
        let mut rows: Vec<Vec<u32>> = Vec::new();
        let mut expected: Option<usize> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index.saturating_add(1);
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = line
                .split_whitespace()
                .map(|token| parse_capacity(token, line_no))
                .collect::<Result<Vec<u32>, WorldError>>()?;

            match expected {
                None => expected = Some(row.len()),
                Some(cols) if cols != row.len() => {
                    return Err(WorldError::RaggedRow {
                        line: line_no,
                        expected: cols,
                        found: row.len(),
                    });
                }
                Some(_) => {}
            }
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Build a map from explicit rows (`rows[y][x]`).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyMap`] when there are no cells and
    /// [`WorldError::RaggedRow`] when rows differ in length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, WorldError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(WorldError::EmptyMap);
        }
        let height = rows.len();

        let mut cells = Vec::with_capacity(width.saturating_mul(height));
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(WorldError::RaggedRow {
                    line: index.saturating_add(1),
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width: u32::try_from(width).map_err(|_overflow| WorldError::ArithmeticOverflow)?,
            height: u32::try_from(height).map_err(|_overflow| WorldError::ArithmeticOverflow)?,
            cells,
        })
    }

    /// A map with the same capacity everywhere.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyMap`] if either dimension is zero.
    pub fn uniform(width: u32, height: u32, value: u32) -> Result<Self, WorldError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![value; len],
        })
    }

    /// The classic two-hill landscape.
    ///
    /// Hills sit at 30%/70% and 70%/30% of the width and height. Capacity is
    /// [`PEAK_CAPACITY`] at a summit and drops by one every `min(w, h) / 10`
    /// cells of Euclidean distance from the nearest summit.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyMap`] if either dimension is zero.
    pub fn two_peaks(width: u32, height: u32) -> Result<Self, WorldError> {
        let len = cell_count(width, height)?;
        let peaks = [
            Position::new(scale(width, 3), scale(height, 7)),
            Position::new(scale(width, 7), scale(height, 3)),
        ];
        let ring = f64::from((width.min(height) / 10).max(1));

        let mut cells = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                let here = Position::new(x, y);
                let nearest = peaks
                    .iter()
                    .map(|peak| crate::geometry::distance(here, *peak))
                    .fold(f64::INFINITY, f64::min);
                let level = (f64::from(PEAK_CAPACITY) - (nearest / ring).floor()).max(0.0);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                cells.push(level as u32);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// The horizontal mirror of this map: column `x` becomes `width - 1 - x`.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let cells = self
            .rows()
            .flat_map(|row| row.iter().rev().copied())
            .collect();
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Map width (columns).
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height (rows).
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Capacity at a cell, `None` outside the map.
    pub fn get(&self, position: Position) -> Option<u32> {
        self.index_of(position).and_then(|i| self.cells.get(i).copied())
    }

    /// All capacities in row-major order.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Sum of all capacities.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    /// Iterate over rows from `y = 0` down.
    fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // width is never zero for a constructed map
        self.cells
            .chunks(usize::try_from(self.width.max(1)).unwrap_or(usize::MAX))
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if position.x >= self.width || position.y >= self.height {
            return None;
        }
        let row = usize::try_from(position.y).ok()?;
        let col = usize::try_from(position.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }
}

/// Parse one capacity token, accepting integers and whole floats.
fn parse_capacity(token: &str, line: usize) -> Result<u32, WorldError> {
    if let Ok(value) = token.parse::<u32>() {
        return Ok(value);
    }
    let value: f64 = token.parse().map_err(|_parse| WorldError::MalformedToken {
        line,
        token: token.to_owned(),
    })?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(WorldError::InvalidCapacity { line, value });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as u32)
}

fn cell_count(width: u32, height: u32) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::EmptyMap);
    }
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(WorldError::ArithmeticOverflow)
}

/// `value * tenths / 10`, rounded down.
fn scale(value: u32, tenths: u32) -> u32 {
    let scaled = u64::from(value).saturating_mul(u64::from(tenths)) / 10;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_matrix() {
        let map = CapacityMap::parse("0 1 2\n3 4 0\n").ok();
        assert_eq!(map.as_ref().map(CapacityMap::width), Some(3));
        assert_eq!(map.as_ref().map(CapacityMap::height), Some(2));
        assert_eq!(map.as_ref().and_then(|m| m.get(Position::new(2, 0))), Some(2));
        assert_eq!(map.as_ref().and_then(|m| m.get(Position::new(1, 1))), Some(4));
    }

    #[test]
    fn parses_whole_floats_and_skips_comments() {
        let text = "# sugar\n\n1.0 2.0\n  3 4  \n";
        let map = CapacityMap::parse(text).ok();
        assert_eq!(map.map(|m| m.cells().to_vec()), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn rejects_non_numeric_token() {
        let err = CapacityMap::parse("1 x 2\n");
        assert!(matches!(err, Err(WorldError::MalformedToken { line: 1, .. })));
    }

    #[test]
    fn rejects_negative_and_fractional_values() {
        assert!(matches!(
            CapacityMap::parse("1 -2\n"),
            Err(WorldError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            CapacityMap::parse("1 2.5\n"),
            Err(WorldError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = CapacityMap::parse("1 2 3\n4 5\n");
        assert!(matches!(
            err,
            Err(WorldError::RaggedRow {
                line: 2,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn rejects_empty_text() {
        assert!(matches!(CapacityMap::parse("\n# nothing\n"), Err(WorldError::EmptyMap)));
    }

    #[test]
    fn mirror_flips_columns() {
        let map = CapacityMap::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).ok();
        let mirrored = map.map(|m| m.mirrored());
        assert_eq!(
            mirrored.map(|m| m.cells().to_vec()),
            Some(vec![3, 2, 1, 6, 5, 4])
        );
    }

    #[test]
    fn mirror_twice_is_identity() {
        let map = CapacityMap::two_peaks(20, 12).ok();
        assert!(map.is_some());
        if let Some(map) = map {
            assert_eq!(map.mirrored().mirrored(), map);
        }
    }

    #[test]
    fn two_peaks_has_summits_and_lowlands() {
        let map = CapacityMap::two_peaks(50, 50).ok();
        assert!(map.is_some());
        if let Some(map) = map {
            assert_eq!(map.get(Position::new(15, 35)), Some(PEAK_CAPACITY));
            assert_eq!(map.get(Position::new(35, 15)), Some(PEAK_CAPACITY));
            assert_eq!(map.get(Position::new(0, 0)), Some(0));
            assert!(map.cells().iter().all(|&c| c <= PEAK_CAPACITY));
        }
    }

    #[test]
    fn zero_sized_maps_are_rejected() {
        assert!(matches!(CapacityMap::uniform(0, 5, 1), Err(WorldError::EmptyMap)));
        assert!(matches!(CapacityMap::two_peaks(5, 0), Err(WorldError::EmptyMap)));
    }

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let map = CapacityMap::uniform(2, 2, 1).ok();
        assert_eq!(map.and_then(|m| m.get(Position::new(2, 0))), None);
    }
}
