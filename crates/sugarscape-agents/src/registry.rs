//! Trader creation and lookup.
//!
//! The [`TraderRegistry`] owns every live [`Trader`], keyed by a
//! sequentially allocated [`TraderId`]. Ids are never reused: removal is
//! permanent, and a `BTreeMap` keeps iteration order stable so that runs
//! with the same seed enumerate traders identically.

use std::collections::BTreeMap;

use sugarscape_types::TraderId;

use crate::error::AgentError;
use crate::trader::{NewTrader, Trader};

/// Creates and tracks live traders.
#[derive(Debug, Clone, Default)]
pub struct TraderRegistry {
    traders: BTreeMap<TraderId, Trader>,
    next_id: u64,
}

impl TraderRegistry {
    /// Create an empty registry. The first trader gets id 0.
    pub const fn new() -> Self {
        Self {
            traders: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Create a trader and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the id space is exhausted.
    pub fn spawn(&mut self, params: NewTrader) -> Result<TraderId, AgentError> {
        let id = TraderId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| AgentError::overflow("trader id allocation"))?;
        self.traders.insert(id, Trader::new(id, params));
        Ok(id)
    }

    /// Look up a live trader.
    pub fn get(&self, id: TraderId) -> Option<&Trader> {
        self.traders.get(&id)
    }

    /// Look up a live trader mutably.
    pub fn get_mut(&mut self, id: TraderId) -> Option<&mut Trader> {
        self.traders.get_mut(&id)
    }

    /// Whether a trader is alive.
    pub fn contains(&self, id: TraderId) -> bool {
        self.traders.contains_key(&id)
    }

    /// Remove a trader permanently.
    pub fn remove(&mut self, id: TraderId) -> Option<Trader> {
        self.traders.remove(&id)
    }

    /// Ids of all live traders in ascending order.
    pub fn ids(&self) -> Vec<TraderId> {
        self.traders.keys().copied().collect()
    }

    /// Iterate over live traders in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Trader> {
        self.traders.values()
    }

    /// Number of live traders.
    pub fn len(&self) -> usize {
        self.traders.len()
    }

    /// Whether every trader has died.
    pub fn is_empty(&self) -> bool {
        self.traders.is_empty()
    }

    /// Borrow two distinct traders mutably at once and run `f` on them.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SelfTrade`] if `a == b` and
    /// [`AgentError::TraderNotFound`] if either trader is missing.
    pub fn with_pair_mut<R>(
        &mut self,
        a: TraderId,
        b: TraderId,
        f: impl FnOnce(&mut Trader, &mut Trader) -> R,
    ) -> Result<R, AgentError> {
        if a == b {
            return Err(AgentError::SelfTrade(a));
        }
        let mut second = self.traders.remove(&b).ok_or(AgentError::TraderNotFound(b))?;
        let result = self.traders.get_mut(&a).map(|first| f(first, &mut second));
        self.traders.insert(b, second);
        result.ok_or(AgentError::TraderNotFound(a))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sugarscape_types::{Position, ResourcePair};

    fn params(x: u32) -> NewTrader {
        NewTrader {
            position: Position::new(x, 0),
            endowment: ResourcePair { sugar: 5, spice: 5 },
            metabolism_sugar: 1,
            metabolism_spice: 1,
            vision: 1,
        }
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut reg = TraderRegistry::new();
        assert_eq!(reg.spawn(params(0)).unwrap(), TraderId::new(0));
        assert_eq!(reg.spawn(params(1)).unwrap(), TraderId::new(1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut reg = TraderRegistry::new();
        let first = reg.spawn(params(0)).unwrap();
        assert!(reg.remove(first).is_some());
        let second = reg.spawn(params(1)).unwrap();
        assert_ne!(first, second);
        assert!(!reg.contains(first));
        assert!(reg.get(first).is_none());
    }

    #[test]
    fn pair_borrow_mutates_both() {
        let mut reg = TraderRegistry::new();
        let a = reg.spawn(params(0)).unwrap();
        let b = reg.spawn(params(1)).unwrap();
        reg.with_pair_mut(a, b, |x, y| {
            x.sugar = 1;
            y.sugar = 2;
        })
        .unwrap();
        assert_eq!(reg.get(a).unwrap().sugar, 1);
        assert_eq!(reg.get(b).unwrap().sugar, 2);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn pair_borrow_rejects_self_and_missing() {
        let mut reg = TraderRegistry::new();
        let a = reg.spawn(params(0)).unwrap();
        assert!(matches!(
            reg.with_pair_mut(a, a, |_, _| ()),
            Err(AgentError::SelfTrade(_))
        ));
        let ghost = TraderId::new(99);
        assert!(matches!(
            reg.with_pair_mut(ghost, a, |_, _| ()),
            Err(AgentError::TraderNotFound(id)) if id == ghost
        ));
        // The present trader survives a failed borrow.
        assert!(reg.contains(a));
    }
}
