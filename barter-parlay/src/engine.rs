//! Parlay pricing pipeline: validation, correlation, combination and sizing.

use crate::{
    config::ParlayConfig,
    correlation::{CorrelationDetector, CorrelationWarning},
    error::ParlayError,
    independence::{IndependenceReport, IndependenceScorer},
    leg::Leg,
    line::{BestLine, LineShopper, Quote},
    pricing::{ParlayPrice, PricingResult},
    risk::{KellySizer, PricingState, StakeRecommendation},
};
use itertools::Itertools;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One parlay to price, as received from a caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingRequest {
    pub legs: Vec<Leg>,
    /// Defaults to [`ParlayConfig::default_bankroll`] when absent
    #[serde(default)]
    pub bankroll: Option<Decimal>,
}

impl PricingRequest {
    pub fn new(legs: Vec<Leg>, bankroll: Option<Decimal>) -> Self {
        Self { legs, bankroll }
    }
}

/// Stateless parlay pricing engine.
///
/// Holds only its configuration, so a single instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone)]
pub struct ParlayEngine {
    config: ParlayConfig,
    sizer: KellySizer,
}

impl Default for ParlayEngine {
    fn default() -> Self {
        let config = ParlayConfig::default();
        Self {
            sizer: KellySizer::from_config(&config),
            config,
        }
    }
}

impl ParlayEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: ParlayConfig) -> Result<Self, ParlayError> {
        config.validate()?;
        Ok(Self {
            sizer: KellySizer::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &ParlayConfig {
        &self.config
    }

    /// Price a parlay and recommend a stake.
    ///
    /// Structurally invalid input (no legs, bad odds, duplicate ids,
    /// non-positive bankroll) is an error, as is a combined price too large
    /// to represent. Every other outcome, including rejection, is reported
    /// through [`PricingResult::state`].
    pub fn price_parlay(
        &self,
        legs: &[Leg],
        bankroll: Option<Decimal>,
    ) -> Result<PricingResult, ParlayError> {
        let bankroll = self.validate_request(legs, bankroll).inspect_err(|error| {
            warn!(%error, legs = legs.len(), "Rejected malformed pricing request");
        })?;

        if legs.len() < self.config.min_legs {
            return Ok(self.reject_leg_count(
                legs,
                bankroll,
                PricingState::RejectedTooFewLegs,
                format!(
                    "Parlay requires at least {} legs, got {}",
                    self.config.min_legs,
                    legs.len()
                ),
            ));
        }

        if legs.len() > self.config.max_legs {
            return Ok(self.reject_leg_count(
                legs,
                bankroll,
                PricingState::RejectedTooManyLegs,
                format!(
                    "Parlay allows at most {} legs, got {}",
                    self.config.max_legs,
                    legs.len()
                ),
            ));
        }

        let warnings = CorrelationDetector::detect(legs);
        let price = ParlayPrice::combine(legs, &warnings, &self.config.penalties)
            .inspect_err(|error| {
                warn!(%error, legs = legs.len(), "Combined price out of range");
            })?;

        let errors: Vec<String> = warnings
            .iter()
            .filter(|warning| warning.is_prohibited())
            .map(|warning| warning.message.clone())
            .collect();

        let stake = if errors.is_empty() {
            self.sizer
                .size(price.true_probability, price.combined_decimal_odds, bankroll)
        } else {
            StakeRecommendation::none(PricingState::RejectedProhibitedCorrelation)
        };

        let result = Self::assemble(legs, bankroll, price, stake, warnings, errors);
        info!(
            legs = legs.len(),
            state = %result.state,
            combined_odds = result.combined_odds,
            true_probability = result.true_probability,
            expected_value = result.expected_value,
            recommended_stake = %result.recommended_stake,
            "Priced parlay"
        );
        Ok(result)
    }

    /// Price independent requests in parallel, preserving request order.
    pub fn price_batch(
        &self,
        requests: &[PricingRequest],
    ) -> Vec<Result<PricingResult, ParlayError>> {
        debug!(requests = requests.len(), "Pricing batch");
        requests
            .par_iter()
            .map(|request| self.price_parlay(&request.legs, request.bankroll))
            .collect()
    }

    /// Score how independent the legs of a candidate parlay are.
    pub fn score_independence(&self, legs: &[Leg]) -> IndependenceReport {
        IndependenceScorer::score(legs)
    }

    /// Find the most favourable price among quotes for one selection.
    pub fn find_best_line(&self, quotes: &[Quote]) -> Result<Option<BestLine>, ParlayError> {
        LineShopper::find_best_line(quotes).inspect_err(|error| {
            warn!(%error, quotes = quotes.len(), "Rejected malformed quotes");
        })
    }

    /// Check structural preconditions and resolve the bankroll.
    fn validate_request(
        &self,
        legs: &[Leg],
        bankroll: Option<Decimal>,
    ) -> Result<Decimal, ParlayError> {
        if legs.is_empty() {
            return Err(ParlayError::NoLegs);
        }

        let bankroll = bankroll.unwrap_or(self.config.default_bankroll);
        if bankroll <= Decimal::ZERO {
            return Err(ParlayError::InvalidBankroll(bankroll));
        }

        legs.iter().try_for_each(Leg::validate)?;

        if let Some(duplicate) = legs.iter().map(|leg| &leg.id).duplicates().next() {
            return Err(ParlayError::DuplicateLeg(duplicate.clone()));
        }

        Ok(bankroll)
    }

    fn reject_leg_count(
        &self,
        legs: &[Leg],
        bankroll: Decimal,
        state: PricingState,
        error: String,
    ) -> PricingResult {
        info!(legs = legs.len(), %state, "Rejected parlay before pricing");
        Self::assemble(
            legs,
            bankroll,
            ParlayPrice::unpriced(),
            StakeRecommendation::none(state),
            Vec::new(),
            vec![error],
        )
    }

    fn assemble(
        legs: &[Leg],
        bankroll: Decimal,
        price: ParlayPrice,
        stake: StakeRecommendation,
        warnings: Vec<CorrelationWarning>,
        errors: Vec<String>,
    ) -> PricingResult {
        PricingResult {
            legs: legs.to_vec(),
            state: stake.state,
            combined_odds: price.combined_odds,
            combined_decimal_odds: price.combined_decimal_odds,
            naive_probability: price.naive_probability,
            true_probability: price.true_probability,
            payout_per_100: price.payout_per_100,
            expected_value: stake.expected_value,
            kelly_fraction: stake.kelly_fraction,
            recommended_stake: stake.recommended_stake,
            bankroll,
            warnings,
            is_valid: stake.state.is_valid(),
            errors,
        }
    }
}
