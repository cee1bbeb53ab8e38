//! Bilateral trade between two neighboring traders.
//!
//! A session repeats single whole-unit exchanges until one is refused. Each
//! exchange is priced at the geometric mean of the two traders' MRS values:
//!
//! 1. If the MRS values are approximately equal the pair is at
//!    equilibrium and the session ends.
//! 2. The trader with the higher MRS is the seller: it pays spice and
//!    receives sugar. The other trader is the buyer.
//! 3. The exchange is refused if it would leave anyone without sugar or
//!    spice, if it fails to strictly raise both traders' welfare, or if it
//!    would push the seller's MRS to or below the buyer's.
//!
//! Every accepted exchange is appended to both traders' tick histories, each
//! from its own side.

use serde::{Deserialize, Serialize};
use sugarscape_types::{TradeRecord, TradeRole};
use tracing::debug;

use crate::error::AgentError;
use crate::trader::Trader;
use crate::welfare::{approx_eq, trade_price, unit_trade_quantities};

// ---------------------------------------------------------------------------
// Session outcome
// ---------------------------------------------------------------------------

/// Why a trade session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The two MRS values were approximately equal.
    Equilibrium,
    /// The next exchange would have emptied someone's sugar or spice.
    InsufficientHoldings,
    /// The next exchange would not have made both traders strictly better off.
    NotMutuallyBeneficial,
    /// The next exchange would have crossed the MRS values.
    Overshoot,
    /// The price does not support any whole-unit exchange.
    NoWholeUnitTrade,
}

/// Summary of one trade session between a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeSession {
    /// Number of accepted exchanges.
    pub trades: u32,
    /// Why the session ended.
    pub stop: StopReason,
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Trade between `initiator` and `partner` until no exchange improves both.
///
/// # Errors
///
/// Returns [`AgentError::NonPositiveBalance`] if either trader enters with a
/// non-positive holding, [`AgentError::SelfTrade`] if both are the same
/// trader, and [`AgentError::ArithmeticOverflow`] on holdings overflow.
pub fn trade_pair(
    initiator: &mut Trader,
    partner: &mut Trader,
    tolerance: f64,
) -> Result<TradeSession, AgentError> {
    if initiator.id == partner.id {
        return Err(AgentError::SelfTrade(initiator.id));
    }
    ensure_solvent(initiator)?;
    ensure_solvent(partner)?;

    let mut trades: u32 = 0;
    let stop = loop {
        let mrs_initiator = initiator.mrs();
        let mrs_partner = partner.mrs();
        if approx_eq(mrs_initiator, mrs_partner, tolerance) {
            break StopReason::Equilibrium;
        }

        let price = trade_price(mrs_initiator, mrs_partner);
        let role = if mrs_initiator > mrs_partner {
            TradeRole::Seller
        } else {
            TradeRole::Buyer
        };
        let refused = match role {
            TradeRole::Seller => attempt_exchange(initiator, partner, price)?,
            TradeRole::Buyer => attempt_exchange(partner, initiator, price)?,
        };
        if let Some(reason) = refused {
            break reason;
        }

        initiator.history.record(TradeRecord {
            price,
            partner: partner.id,
            role,
        });
        partner.history.record(TradeRecord {
            price,
            partner: initiator.id,
            role: role.opposite(),
        });
        trades = trades
            .checked_add(1)
            .ok_or_else(|| AgentError::overflow("trade count"))?;
    };

    if trades > 0 {
        debug!(
            initiator = %initiator.id,
            partner = %partner.id,
            trades,
            stop = ?stop,
            "trade session closed"
        );
    }
    Ok(TradeSession { trades, stop })
}

fn ensure_solvent(trader: &Trader) -> Result<(), AgentError> {
    if trader.is_solvent() {
        Ok(())
    } else {
        Err(AgentError::NonPositiveBalance {
            trader: trader.id,
            sugar: trader.sugar,
            spice: trader.spice,
        })
    }
}

/// Tentatively move sugar from `buyer` to `seller` and spice the other way.
///
/// Commits and returns `None` when every acceptance check passes, otherwise
/// leaves both traders untouched and returns the refusal reason.
fn attempt_exchange(
    seller: &mut Trader,
    buyer: &mut Trader,
    price: f64,
) -> Result<Option<StopReason>, AgentError> {
    let Some((sugar, spice)) = unit_trade_quantities(price) else {
        return Ok(Some(StopReason::NoWholeUnitTrade));
    };

    let seller_sugar = seller
        .sugar
        .checked_add(sugar)
        .ok_or_else(|| AgentError::overflow("seller sugar after exchange"))?;
    let seller_spice = seller
        .spice
        .checked_sub(spice)
        .ok_or_else(|| AgentError::overflow("seller spice after exchange"))?;
    let buyer_sugar = buyer
        .sugar
        .checked_sub(sugar)
        .ok_or_else(|| AgentError::overflow("buyer sugar after exchange"))?;
    let buyer_spice = buyer
        .spice
        .checked_add(spice)
        .ok_or_else(|| AgentError::overflow("buyer spice after exchange"))?;

    if [seller_sugar, seller_spice, buyer_sugar, buyer_spice]
        .iter()
        .any(|&amount| amount <= 0)
    {
        return Ok(Some(StopReason::InsufficientHoldings));
    }

    let both_better_off = seller.welfare() < seller.welfare_with(seller_sugar, seller_spice)
        && buyer.welfare() < buyer.welfare_with(buyer_sugar, buyer_spice);
    if !both_better_off {
        return Ok(Some(StopReason::NotMutuallyBeneficial));
    }

    if seller.mrs_with(seller_sugar, seller_spice) <= buyer.mrs_with(buyer_sugar, buyer_spice) {
        return Ok(Some(StopReason::Overshoot));
    }

    seller.sugar = seller_sugar;
    seller.spice = seller_spice;
    buyer.sugar = buyer_sugar;
    buyer.spice = buyer_spice;
    Ok(None)
}
