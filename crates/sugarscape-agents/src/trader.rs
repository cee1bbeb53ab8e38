//! The trader entity.

use sugarscape_types::{Position, ResourcePair, TickHistory, TraderId};

use crate::welfare::{marginal_rate_of_substitution, welfare};

/// A trader living on the landscape.
///
/// Holdings are signed: eating can drive them to zero or below, which is
/// the death condition checked right after.
#[derive(Debug, Clone, PartialEq)]
pub struct Trader {
    /// Stable identifier, never reused.
    pub id: TraderId,
    /// Current cell. Changed only by the movement rule.
    pub position: Position,
    /// Sugar holdings.
    pub sugar: i64,
    /// Spice holdings.
    pub spice: i64,
    /// Sugar consumed per tick.
    pub metabolism_sugar: u32,
    /// Spice consumed per tick.
    pub metabolism_spice: u32,
    /// Radius used for movement and trade-partner queries.
    pub vision: u32,
    /// Trades made during the current tick.
    pub history: TickHistory,
}

/// Initial attributes of a trader, before an id is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTrader {
    /// Starting cell.
    pub position: Position,
    /// Initial sugar and spice endowment.
    pub endowment: ResourcePair,
    /// Sugar metabolism.
    pub metabolism_sugar: u32,
    /// Spice metabolism.
    pub metabolism_spice: u32,
    /// Vision radius.
    pub vision: u32,
}

impl Trader {
    /// Build a trader from its initial attributes.
    pub fn new(id: TraderId, params: NewTrader) -> Self {
        Self {
            id,
            position: params.position,
            sugar: i64::from(params.endowment.sugar),
            spice: i64::from(params.endowment.spice),
            metabolism_sugar: params.metabolism_sugar,
            metabolism_spice: params.metabolism_spice,
            vision: params.vision,
            history: TickHistory::new(),
        }
    }

    /// Welfare at current holdings.
    pub fn welfare(&self) -> f64 {
        self.welfare_with(self.sugar, self.spice)
    }

    /// Welfare this trader would have at the given holdings.
    pub fn welfare_with(&self, sugar: i64, spice: i64) -> f64 {
        welfare(sugar, spice, self.metabolism_sugar, self.metabolism_spice)
    }

    /// MRS at current holdings.
    pub fn mrs(&self) -> f64 {
        self.mrs_with(self.sugar, self.spice)
    }

    /// MRS this trader would have at the given holdings.
    pub fn mrs_with(&self, sugar: i64, spice: i64) -> f64 {
        marginal_rate_of_substitution(sugar, spice, self.metabolism_sugar, self.metabolism_spice)
    }

    /// Whether both holdings are strictly positive.
    pub const fn is_solvent(&self) -> bool {
        self.sugar > 0 && self.spice > 0
    }

    /// Start a new tick with an empty trade history.
    pub fn reset_history(&mut self) {
        self.history = TickHistory::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sugarscape_types::{TradeRecord, TradeRole};

    fn trader(sugar: u32, spice: u32) -> Trader {
        Trader::new(
            TraderId::new(7),
            NewTrader {
                position: Position::new(1, 2),
                endowment: ResourcePair { sugar, spice },
                metabolism_sugar: 1,
                metabolism_spice: 1,
                vision: 2,
            },
        )
    }

    #[test]
    fn new_trader_copies_endowment() {
        let t = trader(5, 9);
        assert_eq!(t.sugar, 5);
        assert_eq!(t.spice, 9);
        assert_eq!(t.position, Position::new(1, 2));
        assert!(t.history.is_empty());
    }

    #[test]
    fn welfare_and_mrs_follow_holdings() {
        let t = trader(10, 20);
        assert!((t.mrs() - 2.0).abs() < 1e-12);
        assert!((t.welfare() - 200.0_f64.sqrt()).abs() < 1e-12);
        assert!((t.mrs_with(20, 10) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn solvency_requires_both_resources() {
        let mut t = trader(1, 1);
        assert!(t.is_solvent());
        t.spice = 0;
        assert!(!t.is_solvent());
    }

    #[test]
    fn reset_history_clears_trades() {
        let mut t = trader(1, 1);
        t.history.record(TradeRecord {
            price: 1.0,
            partner: TraderId::new(3),
            role: TradeRole::Buyer,
        });
        assert_eq!(t.history.len(), 1);
        t.reset_history();
        assert!(t.history.is_empty());
    }
}
