//! Enumeration types for the Sugarscape trade simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trade roles
// ---------------------------------------------------------------------------

/// The side a trader took in a single exchange.
///
/// The seller is the trader with the higher marginal rate of substitution:
/// it pays spice to buy sugar. The buyer pays sugar to buy spice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeRole {
    /// Sugar seller, spice buyer.
    Buyer,
    /// Spice seller, sugar buyer.
    Seller,
}

impl TradeRole {
    /// The role the counterparty took in the same exchange.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buyer => Self::Seller,
            Self::Seller => Self::Buyer,
        }
    }
}

impl core::fmt::Display for TradeRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

// ---------------------------------------------------------------------------
// Neighborhoods
// ---------------------------------------------------------------------------

/// Shape of the neighborhood used for vision queries on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// Cells within Manhattan distance `r` (a diamond).
    #[default]
    VonNeumann,
    /// Cells within Chebyshev distance `r` (a square).
    Moore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_display_lowercase() {
        assert_eq!(TradeRole::Buyer.to_string(), "buyer");
        assert_eq!(TradeRole::Seller.to_string(), "seller");
    }

    #[test]
    fn opposite_role_flips() {
        assert_eq!(TradeRole::Buyer.opposite(), TradeRole::Seller);
        assert_eq!(TradeRole::Seller.opposite(), TradeRole::Buyer);
    }

    #[test]
    fn neighborhood_defaults_to_von_neumann() {
        assert_eq!(Neighborhood::default(), Neighborhood::VonNeumann);
    }

    #[test]
    fn neighborhood_parses_snake_case() {
        let parsed: Result<Neighborhood, _> = serde_json::from_str("\"moore\"");
        assert_eq!(parsed.ok(), Some(Neighborhood::Moore));
    }
}
