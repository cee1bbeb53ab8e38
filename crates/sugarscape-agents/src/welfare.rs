//! Cobb-Douglas welfare, marginal rate of substitution, and pricing.
//!
//! Prices are always quoted in spice per sugar. A trader's MRS is the rate at
//! which it would give up spice for one more unit of sugar; the bilateral
//! price is the geometric mean of the two traders' rates.
//!
//! None of these functions panic. Degenerate inputs (zero metabolism, zero
//! holdings) produce non-finite floats, which downstream code treats as "no
//! trade possible".

/// Default relative tolerance for "approximately equal" comparisons of MRS,
/// welfare, and distance.
pub const DEFAULT_MRS_TOLERANCE: f64 = 1e-9;

/// Convert an integer holding to `f64` for welfare arithmetic.
///
/// Holdings stay far below 2^53 in any realistic run.
#[allow(clippy::cast_precision_loss)]
pub(crate) const fn holding(amount: i64) -> f64 {
    amount as f64
}

/// Cobb-Douglas welfare of holding `sugar` and `spice`, with exponents
/// weighted by the trader's metabolisms.
///
/// The caller guarantees positive holdings.
pub fn welfare(sugar: i64, spice: i64, metabolism_sugar: u32, metabolism_spice: u32) -> f64 {
    let m_sugar = f64::from(metabolism_sugar);
    let m_spice = f64::from(metabolism_spice);
    let total = m_sugar + m_spice;
    holding(sugar).powf(m_sugar / total) * holding(spice).powf(m_spice / total)
}

/// Marginal rate of substitution: `(spice / m_spice) / (sugar / m_sugar)`.
///
/// Returns a non-finite value when a metabolism or holding is zero.
pub fn marginal_rate_of_substitution(
    sugar: i64,
    spice: i64,
    metabolism_sugar: u32,
    metabolism_spice: u32,
) -> f64 {
    (holding(spice) / f64::from(metabolism_spice)) / (holding(sugar) / f64::from(metabolism_sugar))
}

/// Bilateral price: the geometric mean of two MRS values.
pub fn trade_price(mrs_a: f64, mrs_b: f64) -> f64 {
    (mrs_a * mrs_b).sqrt()
}

/// Whole-unit quantities `(sugar, spice)` exchanged at `price`.
///
/// At a price of one or more, sugar is the numeraire: one sugar for
/// `floor(price)` spice. Below one, spice is the numeraire: `floor(1/price)`
/// sugar for one spice. Non-finite or non-positive prices trade nothing.
pub fn unit_trade_quantities(price: f64) -> Option<(i64, i64)> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    if price >= 1.0 {
        Some((1, whole_units(price)?))
    } else {
        Some((whole_units(price.recip())?, 1))
    }
}

/// Relative closeness: `|a - b| <= tolerance * max(|a|, |b|)`.
///
/// Non-finite operands are never close to anything.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

#[allow(clippy::cast_possible_truncation)]
fn whole_units(amount: f64) -> Option<i64> {
    if !amount.is_finite() {
        return None;
    }
    let units = amount.floor() as i64;
    (units >= 1).then_some(units)
}
