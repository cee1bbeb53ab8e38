//! Per-tick data collection.
//!
//! At the end of every tick the [`DataCollector`] snapshots two kinds of
//! record:
//!
//! - one [`ModelRecord`] with the living population, the trade volume (sum
//!   of trade-history lengths) and the geometric-mean price of every trade
//!   recorded this tick;
//! - one [`AgentRecord`] per trader that traded this tick, with its partners
//!   and roles in order. Traders that did not trade are left out.

use sugarscape_agents::TraderRegistry;
use sugarscape_types::{AgentRecord, ModelRecord};

/// Geometric mean of a list of prices, `None` for an empty list.
#[allow(clippy::cast_precision_loss)]
pub fn geometric_mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let log_sum: f64 = prices.iter().map(|p| p.ln()).sum();
    Some((log_sum / prices.len() as f64).exp())
}

/// Accumulates model- and agent-level records across ticks.
#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    model_records: Vec<ModelRecord>,
    agent_records: Vec<AgentRecord>,
}

impl DataCollector {
    /// An empty collector.
    pub const fn new() -> Self {
        Self {
            model_records: Vec::new(),
            agent_records: Vec::new(),
        }
    }

    /// Record the state of `traders` at the end of `tick`.
    ///
    /// Returns the model record that was stored.
    pub fn collect(&mut self, tick: u64, traders: &TraderRegistry) -> ModelRecord {
        let mut volume: u64 = 0;
        let mut prices = Vec::new();
        for trader in traders.iter() {
            let history = &trader.history;
            volume = volume.saturating_add(u64::try_from(history.len()).unwrap_or(u64::MAX));
            prices.extend(history.prices());
            if !history.is_empty() {
                self.agent_records.push(AgentRecord {
                    tick,
                    trader_id: trader.id,
                    trade_partners: history.partners(),
                    roles: history.roles(),
                });
            }
        }

        let record = ModelRecord {
            tick,
            traders: u64::try_from(traders.len()).unwrap_or(u64::MAX),
            trade_volume: volume,
            price: geometric_mean(&prices),
        };
        self.model_records.push(record.clone());
        record
    }

    /// All model records, one per collected tick.
    pub fn model_records(&self) -> &[ModelRecord] {
        &self.model_records
    }

    /// All agent records across ticks.
    pub fn agent_records(&self) -> &[AgentRecord] {
        &self.agent_records
    }

    /// Agent records for one tick.
    pub fn agent_records_for(&self, tick: u64) -> impl Iterator<Item = &AgentRecord> {
        self.agent_records.iter().filter(move |r| r.tick == tick)
    }

    /// The most recent model record.
    pub fn latest(&self) -> Option<&ModelRecord> {
        self.model_records.last()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sugarscape_agents::NewTrader;
    use sugarscape_types::{Position, ResourcePair, TradeRecord, TradeRole, TraderId};

    fn registry(n: u32) -> TraderRegistry {
        let mut reg = TraderRegistry::new();
        for x in 0..n {
            reg.spawn(NewTrader {
                position: Position::new(x, 0),
                endowment: ResourcePair { sugar: 5, spice: 5 },
                metabolism_sugar: 1,
                metabolism_spice: 1,
                vision: 1,
            })
            .unwrap();
        }
        reg
    }

    #[test]
    fn geometric_mean_of_empty_list_is_none() {
        assert_eq!(geometric_mean(&[]), None);
    }

    #[test]
    fn geometric_mean_of_reciprocals_is_one() {
        let mean = geometric_mean(&[2.0, 0.5]).unwrap();
        assert!((mean - 1.0).abs() < 1e-12);
        let mean = geometric_mean(&[1.0, 4.0, 16.0]).unwrap();
        assert!((mean - 4.0).abs() < 1e-12);
    }

    #[test]
    fn quiet_tick_has_no_price_and_no_agent_records() {
        let mut collector = DataCollector::new();
        let record = collector.collect(1, &registry(3));
        assert_eq!(record.traders, 3);
        assert_eq!(record.trade_volume, 0);
        assert_eq!(record.price, None);
        assert!(collector.agent_records().is_empty());
        assert_eq!(collector.latest(), Some(&record));
    }

    #[test]
    fn only_traders_that_traded_are_reported() {
        let mut reg = registry(3);
        let a = TraderId::new(0);
        let b = TraderId::new(1);
        reg.get_mut(a).unwrap().history.record(TradeRecord {
            price: 2.0,
            partner: b,
            role: TradeRole::Seller,
        });
        reg.get_mut(b).unwrap().history.record(TradeRecord {
            price: 2.0,
            partner: a,
            role: TradeRole::Buyer,
        });

        let mut collector = DataCollector::new();
        let record = collector.collect(4, &reg);
        assert_eq!(record.trade_volume, 2);
        assert!(record.price.is_some_and(|p| (p - 2.0).abs() < 1e-12));

        let agents: Vec<_> = collector.agent_records_for(4).collect();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents.first().map(|r| r.trader_id), Some(a));
        assert_eq!(agents.first().map(|r| r.roles.clone()), Some(vec![TradeRole::Seller]));
        assert_eq!(agents.get(1).map(|r| r.trade_partners.clone()), Some(vec![a]));
        assert_eq!(collector.agent_records_for(5).count(), 0);
    }
}
