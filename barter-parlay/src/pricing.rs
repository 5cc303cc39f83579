//! Combined parlay pricing and the engine's output type.

use crate::{
    config::CorrelationPenalties,
    correlation::{CorrelationKind, CorrelationWarning},
    error::ParlayError,
    leg::Leg,
    odds::OddsConverter,
    risk::PricingState,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Combined price and probabilities for a set of legs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParlayPrice {
    /// Product of every leg's decimal odds (>= 1)
    pub combined_decimal_odds: f64,
    /// American representation of `combined_decimal_odds`
    pub combined_odds: i64,
    /// Product of independent implied probabilities
    pub naive_probability: f64,
    /// `naive_probability` after correlation adjustment, in `[0, 1]`
    pub true_probability: f64,
    /// Profit on a $100 stake: `(combined_decimal_odds - 1) * 100`
    pub payout_per_100: Decimal,
}

impl ParlayPrice {
    /// Neutral price for requests rejected before pricing.
    ///
    /// `combined_odds` is 0, which is never a valid American price.
    pub fn unpriced() -> Self {
        Self {
            combined_decimal_odds: 1.0,
            combined_odds: 0,
            naive_probability: 0.0,
            true_probability: 0.0,
            payout_per_100: Decimal::ZERO,
        }
    }

    /// Multiply per-leg prices and probabilities, then apply correlation adjustments.
    ///
    /// Fails with [`ParlayError::PriceOverflow`] when the combined price cannot
    /// be expressed as `i64` American odds or a [`Decimal`] payout.
    pub fn combine(
        legs: &[Leg],
        warnings: &[CorrelationWarning],
        penalties: &CorrelationPenalties,
    ) -> Result<Self, ParlayError> {
        let combined_decimal_odds: f64 = legs.iter().map(Leg::decimal_odds).product();
        let naive_probability: f64 = legs.iter().map(Leg::implied_probability).product();

        let combined_odds = OddsConverter::decimal_to_american(combined_decimal_odds)
            .ok_or(ParlayError::PriceOverflow(combined_decimal_odds))?;
        let payout_per_100 = OddsConverter::decimal_profit_per_100(combined_decimal_odds)
            .ok_or(ParlayError::PriceOverflow(combined_decimal_odds))?;

        Ok(Self {
            combined_decimal_odds,
            combined_odds,
            naive_probability,
            true_probability: adjust_probability(naive_probability, warnings, penalties),
            payout_per_100,
        })
    }
}

/// Scale `naive_probability` by one factor per warning, in detection order.
///
/// Positive correlation multiplies by `1 - penalty` for its severity, negative
/// by `1 + negative_bonus`. Prohibited warnings contribute no factor. The
/// result is clamped to `[0, 1]`.
pub fn adjust_probability(
    naive_probability: f64,
    warnings: &[CorrelationWarning],
    penalties: &CorrelationPenalties,
) -> f64 {
    warnings
        .iter()
        .fold(naive_probability, |probability, warning| match warning.kind {
            CorrelationKind::Positive => {
                probability * (1.0 - penalties.for_severity(warning.severity))
            }
            CorrelationKind::Negative => probability * (1.0 + penalties.negative_bonus),
            CorrelationKind::Prohibited => probability,
        })
        .clamp(0.0, 1.0)
}

/// The engine's output for one parlay.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingResult {
    /// Input legs, echoed back
    pub legs: Vec<Leg>,
    /// Terminal state of the validation state machine
    pub state: PricingState,
    pub combined_odds: i64,
    pub combined_decimal_odds: f64,
    pub naive_probability: f64,
    pub true_probability: f64,
    pub payout_per_100: Decimal,
    /// Signed expected profit per unit staked under `true_probability`
    pub expected_value: f64,
    /// Recommended fraction of bankroll, never above the configured cap
    pub kelly_fraction: f64,
    /// `kelly_fraction * bankroll`, rounded to cents
    pub recommended_stake: Decimal,
    /// Bankroll the stake was sized against
    pub bankroll: Decimal,
    /// Correlation warnings in detection order
    pub warnings: Vec<CorrelationWarning>,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl PricingResult {
    /// Check if the parlay was priced and carries a positive recommended stake.
    pub fn has_edge(&self) -> bool {
        self.state == PricingState::PricedWithEdge
    }

    /// Check if a combined price was computed.
    pub fn is_priced(&self) -> bool {
        self.combined_odds != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{correlation::Severity, leg::Market};
    use rust_decimal_macros::dec;

    const TOLERANCE: f64 = 1e-9;

    fn warning(kind: CorrelationKind, severity: Severity) -> CorrelationWarning {
        CorrelationWarning {
            leg_a: "a".into(),
            leg_b: "b".into(),
            kind,
            severity,
            message: String::new(),
        }
    }

    #[test]
    fn test_combine_independent_legs() {
        // -150 -> 1.6667, +130 -> 2.30, combined = 3.8333
        let legs = vec![
            Leg::new("a", "game-1", Market::Moneyline, "Chiefs", -150),
            Leg::new("b", "game-2", Market::Moneyline, "Bills", 130),
        ];

        let price = ParlayPrice::combine(&legs, &[], &CorrelationPenalties::default()).unwrap();

        assert!((price.combined_decimal_odds - 3.833_333_333).abs() < 1e-6);
        assert_eq!(price.combined_odds, 283);
        // 0.6 * 0.43478 = 0.26087
        assert!((price.naive_probability - 0.6 * 100.0 / 230.0).abs() < TOLERANCE);
        assert_eq!(price.true_probability, price.naive_probability);
        assert_eq!(price.payout_per_100, dec!(283.33));
    }

    #[test]
    fn test_combined_decimal_at_least_largest_leg() {
        let legs = vec![
            Leg::new("a", "g1", Market::Moneyline, "X", -500),
            Leg::new("b", "g2", Market::Moneyline, "Y", 450),
            Leg::new("c", "g3", Market::Moneyline, "Z", -110),
        ];

        let price = ParlayPrice::combine(&legs, &[], &CorrelationPenalties::default()).unwrap();
        let largest = legs.iter().map(Leg::decimal_odds).fold(f64::MIN, f64::max);

        assert!(price.combined_decimal_odds >= largest);
    }

    #[test]
    fn test_combine_long_odds_past_i32() {
        // 6^15 = 470,184,984,576
        let legs: Vec<Leg> = (0..15)
            .map(|i| Leg::new(format!("leg-{i}"), format!("g{i}"), Market::Moneyline, "X", 500))
            .collect();

        let price = ParlayPrice::combine(&legs, &[], &CorrelationPenalties::default()).unwrap();

        assert_eq!(price.combined_decimal_odds, 470_184_984_576.0);
        assert_eq!(price.combined_odds, 47_018_498_457_500);
        assert_eq!(price.payout_per_100, dec!(47018498457500));
    }

    #[test]
    fn test_combine_overflow_is_an_error() {
        // 101^15 ~ 1.16e30, past both i64 American odds and Decimal::MAX
        let legs: Vec<Leg> = (0..15)
            .map(|i| Leg::new(format!("leg-{i}"), format!("g{i}"), Market::Moneyline, "X", 10_000))
            .collect();

        let result = ParlayPrice::combine(&legs, &[], &CorrelationPenalties::default());
        assert!(matches!(result, Err(ParlayError::PriceOverflow(decimal)) if decimal > 1e30));
    }

    #[test]
    fn test_adjust_probability_positive_penalties() {
        let penalties = CorrelationPenalties::default();
        let warnings = vec![
            warning(CorrelationKind::Positive, Severity::Medium),
            warning(CorrelationKind::Positive, Severity::Low),
        ];

        // 0.5 * 0.90 * 0.95 = 0.4275
        let adjusted = adjust_probability(0.5, &warnings, &penalties);
        assert!((adjusted - 0.4275).abs() < TOLERANCE);
    }

    #[test]
    fn test_adjust_probability_high_penalty() {
        let adjusted = adjust_probability(
            0.4,
            &[warning(CorrelationKind::Positive, Severity::High)],
            &CorrelationPenalties::default(),
        );
        assert!((adjusted - 0.34).abs() < TOLERANCE);
    }

    #[test]
    fn test_adjust_probability_negative_bonus() {
        let adjusted = adjust_probability(
            0.4,
            &[warning(CorrelationKind::Negative, Severity::Low)],
            &CorrelationPenalties::default(),
        );
        assert!((adjusted - 0.42).abs() < TOLERANCE);
    }

    #[test]
    fn test_adjust_probability_ignores_prohibited() {
        let adjusted = adjust_probability(
            0.4,
            &[warning(CorrelationKind::Prohibited, Severity::High)],
            &CorrelationPenalties::default(),
        );
        assert_eq!(adjusted, 0.4);
    }

    #[test]
    fn test_adjust_probability_clamped() {
        let warnings = vec![warning(CorrelationKind::Negative, Severity::Low); 10];
        let adjusted = adjust_probability(0.99, &warnings, &CorrelationPenalties::default());
        assert_eq!(adjusted, 1.0);
    }

    #[test]
    fn test_unpriced() {
        let price = ParlayPrice::unpriced();
        assert_eq!(price.combined_decimal_odds, 1.0);
        assert_eq!(price.combined_odds, 0);
        assert_eq!(price.payout_per_100, Decimal::ZERO);
    }
}
