//! Expected value, fractional Kelly sizing and the parlay validation states.

use crate::config::ParlayConfig;
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use serde::{Deserialize, Serialize};

/// Terminal state of a pricing request.
///
/// Evaluated in declaration order; the first matching state wins.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingState {
    RejectedTooFewLegs,
    RejectedTooManyLegs,
    RejectedProhibitedCorrelation,
    PricedNoEdge,
    PricedWithEdge,
}

impl PricingState {
    /// Only the rejection states invalidate a parlay.
    pub fn is_valid(&self) -> bool {
        matches!(self, PricingState::PricedNoEdge | PricingState::PricedWithEdge)
    }
}

impl std::fmt::Display for PricingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingState::RejectedTooFewLegs => write!(f, "rejected_too_few_legs"),
            PricingState::RejectedTooManyLegs => write!(f, "rejected_too_many_legs"),
            PricingState::RejectedProhibitedCorrelation => {
                write!(f, "rejected_prohibited_correlation")
            }
            PricingState::PricedNoEdge => write!(f, "priced_no_edge"),
            PricingState::PricedWithEdge => write!(f, "priced_with_edge"),
        }
    }
}

/// Stake recommendation for a priced parlay.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeRecommendation {
    pub state: PricingState,
    pub expected_value: f64,
    pub kelly_fraction: f64,
    pub recommended_stake: Decimal,
}

impl StakeRecommendation {
    /// No stake, for parlays rejected before sizing.
    pub fn none(state: PricingState) -> Self {
        Self {
            state,
            expected_value: 0.0,
            kelly_fraction: 0.0,
            recommended_stake: Decimal::ZERO,
        }
    }
}

/// Fractional Kelly sizer with a hard bankroll cap.
#[derive(Debug, Clone)]
pub struct KellySizer {
    /// Expected value at or below which nothing is staked
    pub min_edge: f64,
    /// Full Kelly is divided by this
    pub kelly_divisor: f64,
    /// Maximum fraction of bankroll on one parlay
    pub max_bankroll_fraction: Decimal,
}

impl Default for KellySizer {
    fn default() -> Self {
        Self::from_config(&ParlayConfig::default())
    }
}

impl KellySizer {
    pub fn from_config(config: &ParlayConfig) -> Self {
        Self {
            min_edge: config.min_edge,
            kelly_divisor: config.kelly_divisor,
            max_bankroll_fraction: config.max_bankroll_fraction,
        }
    }

    /// Expected profit per unit staked.
    ///
    /// Formula: `p * (decimal - 1) - (1 - p)`
    pub fn expected_value(true_probability: f64, decimal_odds: f64) -> f64 {
        true_probability * (decimal_odds - 1.0) - (1.0 - true_probability)
    }

    /// Full Kelly fraction: `edge / (decimal - 1)`.
    pub fn full_kelly(true_probability: f64, decimal_odds: f64) -> f64 {
        let net_odds = decimal_odds - 1.0;
        if net_odds <= 0.0 {
            return 0.0;
        }
        Self::expected_value(true_probability, decimal_odds) / net_odds
    }

    /// Size a stake for a parlay that passed validation.
    ///
    /// Yields [`PricingState::PricedNoEdge`] with a zero stake when the expected
    /// value does not exceed `min_edge`.
    pub fn size(&self, true_probability: f64, decimal_odds: f64, bankroll: Decimal) -> StakeRecommendation {
        let expected_value = Self::expected_value(true_probability, decimal_odds);

        if expected_value <= self.min_edge {
            return StakeRecommendation {
                state: PricingState::PricedNoEdge,
                expected_value,
                kelly_fraction: 0.0,
                recommended_stake: Decimal::ZERO,
            };
        }

        let max_fraction = self.max_bankroll_fraction.to_f64().unwrap_or(0.0);
        let kelly_fraction = (Self::full_kelly(true_probability, decimal_odds) / self.kelly_divisor)
            .clamp(0.0, max_fraction);

        let stake = Decimal::from_f64(kelly_fraction).unwrap_or(Decimal::ZERO) * bankroll;
        let recommended_stake = stake
            .min(self.max_bankroll_fraction * bankroll)
            .round_dp(2);

        StakeRecommendation {
            state: PricingState::PricedWithEdge,
            expected_value,
            kelly_fraction,
            recommended_stake,
        }
    }
}
