//! Conversions between American odds, decimal odds and implied probability.
//!
//! Odds ratios and probabilities are `f64`. Money amounts derived from them
//! use rust_decimal, rounded to cents.

use rust_decimal::{prelude::FromPrimitive, Decimal};

/// Smallest magnitude a valid American price can have.
pub const MIN_AMERICAN_MAGNITUDE: i32 = 100;

/// Odds converter for American, decimal and implied-probability representations.
pub struct OddsConverter;

impl OddsConverter {
    /// Convert American odds to decimal odds.
    ///
    /// Formula: `odds / 100 + 1` for positive odds, `100 / |odds| + 1` otherwise.
    ///
    /// # Arguments
    /// * `odds` - American odds (e.g. -150, +130)
    ///
    /// # Returns
    /// Decimal odds (total return per unit staked)
    pub fn american_to_decimal(odds: i32) -> f64 {
        let odds = f64::from(odds);
        if odds > 0.0 {
            odds / 100.0 + 1.0
        } else {
            100.0 / odds.abs() + 1.0
        }
    }

    /// Convert decimal odds to American odds, rounded to the nearest integer.
    ///
    /// Formula: `(decimal - 1) * 100` when `decimal >= 2`, `-100 / (decimal - 1)` otherwise.
    ///
    /// # Returns
    /// `None` when the result is not finite or does not fit in an `i64`
    pub fn decimal_to_american(decimal: f64) -> Option<i64> {
        let american = if decimal >= 2.0 {
            ((decimal - 1.0) * 100.0).round()
        } else {
            (-100.0 / (decimal - 1.0)).round()
        };

        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        (american.is_finite() && (i64::MIN as f64..i64::MAX as f64).contains(&american))
            .then_some(american as i64)
    }

    /// Win probability encoded by American odds, ignoring the house edge.
    ///
    /// Formula: `100 / (odds + 100)` for positive odds, `|odds| / (|odds| + 100)` otherwise.
    pub fn implied_probability(odds: i32) -> f64 {
        let odds = f64::from(odds);
        if odds > 0.0 {
            100.0 / (odds + 100.0)
        } else {
            odds.abs() / (odds.abs() + 100.0)
        }
    }

    /// Win probability encoded by decimal odds.
    pub fn decimal_to_implied_probability(decimal: f64) -> f64 {
        1.0 / decimal
    }

    /// Check that American odds are non-zero with magnitude of at least 100.
    pub fn is_valid_american(odds: i32) -> bool {
        odds.checked_abs()
            .is_some_and(|magnitude| magnitude >= MIN_AMERICAN_MAGNITUDE)
    }

    /// Profit returned on a $100 stake at the given decimal odds.
    ///
    /// Formula: `(decimal - 1) * 100`, rounded to cents. `None` when the
    /// profit is not finite or exceeds [`Decimal::MAX`].
    pub fn decimal_profit_per_100(decimal: f64) -> Option<Decimal> {
        Decimal::from_f64((decimal - 1.0) * 100.0).map(|profit| profit.round_dp(2))
    }

    /// Profit returned on a $100 stake at the given American odds.
    ///
    /// Computed exactly in [`Decimal`]: the odds themselves when positive,
    /// `100 * 100 / |odds|` otherwise. `None` for invalid odds.
    pub fn profit_per_100(odds: i32) -> Option<Decimal> {
        if !Self::is_valid_american(odds) {
            return None;
        }

        let odds = Decimal::from(odds);
        let profit = if odds.is_sign_positive() {
            odds
        } else {
            Decimal::ONE_HUNDRED * Decimal::ONE_HUNDRED / odds.abs()
        };
        Some(profit.round_dp(2))
    }
}
