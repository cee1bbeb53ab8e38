//! Core data structs shared between the world, the traders, and reporting.

use serde::{Deserialize, Serialize};

use crate::enums::TradeRole;
use crate::ids::TraderId;

// ---------------------------------------------------------------------------
// Grid coordinates and resource amounts
// ---------------------------------------------------------------------------

/// A cell coordinate on the landscape. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column index, `0..width`.
    pub x: u32,
    /// Row index, `0..height`.
    pub y: u32,
}

impl Position {
    /// Create a position from a column and row.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Amounts of sugar and spice held by a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePair {
    /// Sugar units.
    pub sugar: u32,
    /// Spice units.
    pub spice: u32,
}

// ---------------------------------------------------------------------------
// Per-tick trade history
// ---------------------------------------------------------------------------

/// One accepted exchange, seen from the recording trader's side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Exchange rate in spice per sugar.
    pub price: f64,
    /// The counterparty.
    pub partner: TraderId,
    /// The side the recording trader took.
    pub role: TradeRole,
}

/// The trades a trader made during the current tick.
///
/// A fresh value replaces the old one at the start of every tick, so nothing
/// leaks from one tick into the next. Within a tick it only grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickHistory {
    trades: Vec<TradeRecord>,
}

impl TickHistory {
    /// An empty history.
    pub const fn new() -> Self {
        Self { trades: Vec::new() }
    }

    /// Append an accepted trade.
    pub fn record(&mut self, record: TradeRecord) {
        self.trades.push(record);
    }

    /// All trades in the order they were accepted.
    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Number of trades this tick.
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether the trader has not traded this tick.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Partner ids, one per trade.
    pub fn partners(&self) -> Vec<TraderId> {
        self.trades.iter().map(|t| t.partner).collect()
    }

    /// Prices, one per trade.
    pub fn prices(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.price).collect()
    }

    /// Roles ("buyer"/"seller"), one per trade.
    pub fn roles(&self) -> Vec<TradeRole> {
        self.trades.iter().map(|t| t.role).collect()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Model-level aggregates collected at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// The tick these figures belong to.
    pub tick: u64,
    /// Living traders at the end of the tick.
    pub traders: u64,
    /// Sum of trade-history lengths across all traders.
    pub trade_volume: u64,
    /// Geometric mean of every recorded price, `None` when nobody traded.
    pub price: Option<f64>,
}

/// Agent-level record for a trader that traded during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// The tick this record belongs to.
    pub tick: u64,
    /// The trader.
    pub trader_id: TraderId,
    /// Partners in trade order.
    pub trade_partners: Vec<TraderId>,
    /// Role taken in each trade.
    pub roles: Vec<TradeRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(partner: u64, role: TradeRole) -> TradeRecord {
        TradeRecord {
            price: 1.5,
            partner: TraderId::new(partner),
            role,
        }
    }

    #[test]
    fn history_projections_stay_aligned() {
        let mut history = TickHistory::new();
        history.record(record(4, TradeRole::Seller));
        history.record(record(7, TradeRole::Buyer));

        assert_eq!(history.len(), 2);
        assert_eq!(history.partners(), vec![TraderId::new(4), TraderId::new(7)]);
        assert_eq!(history.roles(), vec![TradeRole::Seller, TradeRole::Buyer]);
        assert_eq!(history.prices().len(), 2);
    }

    #[test]
    fn new_history_is_empty() {
        let history = TickHistory::default();
        assert!(history.is_empty());
        assert!(history.partners().is_empty());
    }

    #[test]
    fn model_record_serializes_missing_price_as_null() {
        let rec = ModelRecord {
            tick: 1,
            traders: 1,
            trade_volume: 0,
            price: None,
        };
        let json = serde_json::to_value(&rec).ok();
        assert_eq!(
            json.and_then(|v| v.get("price").cloned()),
            Some(serde_json::Value::Null)
        );
    }
}
