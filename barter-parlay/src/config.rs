//! Configuration types for the parlay pricing engine.

use crate::{correlation::Severity, error::ParlayError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for the parlay pricing engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParlayConfig {
    /// Fewest legs a parlay may have
    pub min_legs: usize,
    /// Most legs a parlay may have, also bounding the pairwise correlation pass
    pub max_legs: usize,
    /// Expected value at or below which no stake is recommended (e.g., 0.01 = 1%)
    pub min_edge: f64,
    /// Full Kelly is divided by this (4 = quarter Kelly)
    pub kelly_divisor: f64,
    /// Hard cap on the fraction of bankroll staked on one parlay
    pub max_bankroll_fraction: Decimal,
    /// Bankroll used when the caller does not supply one
    pub default_bankroll: Decimal,
    /// Probability adjustments applied per correlation warning
    pub penalties: CorrelationPenalties,
}

impl Default for ParlayConfig {
    fn default() -> Self {
        Self {
            min_legs: 2,
            max_legs: 15,
            min_edge: 0.01,
            kelly_divisor: 4.0,
            max_bankroll_fraction: Decimal::new(5, 2), // 5%
            default_bankroll: Decimal::new(1000, 0),   // $1,000
            penalties: CorrelationPenalties::default(),
        }
    }
}

impl ParlayConfig {
    /// Parse a (possibly partial) JSON document, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, ParlayError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ParlayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the engine.
    pub fn validate(&self) -> Result<(), ParlayError> {
        if self.min_legs == 0 {
            return Err(ParlayError::Config("min_legs must be at least 1".into()));
        }
        if self.min_legs > self.max_legs {
            return Err(ParlayError::Config(format!(
                "min_legs {} exceeds max_legs {}",
                self.min_legs, self.max_legs
            )));
        }
        if !self.min_edge.is_finite() {
            return Err(ParlayError::Config("min_edge must be finite".into()));
        }
        if !(self.kelly_divisor.is_finite() && self.kelly_divisor > 0.0) {
            return Err(ParlayError::Config(format!(
                "kelly_divisor must be positive, got {}",
                self.kelly_divisor
            )));
        }
        if self.max_bankroll_fraction <= Decimal::ZERO || self.max_bankroll_fraction > Decimal::ONE {
            return Err(ParlayError::Config(format!(
                "max_bankroll_fraction must be in (0, 1], got {}",
                self.max_bankroll_fraction
            )));
        }
        if self.default_bankroll <= Decimal::ZERO {
            return Err(ParlayError::Config(format!(
                "default_bankroll must be positive, got {}",
                self.default_bankroll
            )));
        }
        self.penalties.validate()
    }
}

/// Multiplicative probability adjustments applied per correlation warning.
///
/// Positive correlation multiplies by `1 - penalty`, negative by `1 + negative_bonus`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationPenalties {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub negative_bonus: f64,
}

impl Default for CorrelationPenalties {
    fn default() -> Self {
        Self {
            high: 0.15,
            medium: 0.10,
            low: 0.05,
            negative_bonus: 0.05,
        }
    }
}

impl CorrelationPenalties {
    /// Penalty for a positive warning of the given severity.
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    fn validate(&self) -> Result<(), ParlayError> {
        let fractions = [
            ("high", self.high),
            ("medium", self.medium),
            ("low", self.low),
            ("negative_bonus", self.negative_bonus),
        ];
        match fractions
            .into_iter()
            .find(|(_, value)| !(0.0..1.0).contains(value))
        {
            Some((name, value)) => Err(ParlayError::Config(format!(
                "penalty {name} must be in [0, 1), got {value}"
            ))),
            None => Ok(()),
        }
    }
}
