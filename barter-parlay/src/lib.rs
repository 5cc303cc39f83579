//! Parlay Pricing & Correlation Engine for the Barter Ecosystem
//!
//! This crate turns a set of individual wagers ("legs") into a combined price,
//! a correlation-adjusted win probability, an expected value and a
//! fractional-Kelly stake recommendation.
//!
//! # Architecture
//!
//! The engine is a pure, synchronous pipeline with no I/O and no state kept
//! between calls:
//!
//! ```text
//! legs -> OddsConverter -> CorrelationDetector -> ParlayPrice -> KellySizer -> PricingResult
//! ```
//!
//! # Key Components
//!
//! - [`ParlayEngine`]: Entry point wiring the pipeline together
//! - [`ParlayConfig`]: Leg limits, Kelly divisor, bankroll cap and correlation penalties
//! - [`Leg`]: One wager in a parlay
//! - [`CorrelationDetector`]: Pairwise classification from a fixed rule table
//! - [`PricingResult`]: Combined price, probabilities, stake and validity
//! - [`IndependenceScorer`]: 0-100 independence score with recommendations
//! - [`LineShopper`]: Best available price across bookmakers
//!
//! # Example
//!
//! ```rust
//! use barter_parlay::{Leg, Market, ParlayEngine, PricingState};
//! use rust_decimal::Decimal;
//!
//! let engine = ParlayEngine::default();
//! let legs = vec![
//!     Leg::new("leg-1", "NFL-KC-BUF", Market::Moneyline, "Chiefs", -150),
//!     Leg::new("leg-2", "NBA-LAL-BOS", Market::Moneyline, "Celtics", 130),
//! ];
//!
//! let result = engine.price_parlay(&legs, Some(Decimal::from(1000))).unwrap();
//!
//! assert!(result.is_valid);
//! assert_eq!(result.combined_odds, 283);
//! assert_eq!(result.state, PricingState::PricedNoEdge);
//! ```
//!
//! # Correlation Model
//!
//! Same-event pairs are classified by market combination:
//!
//! ```text
//! moneyline + total            => positive, medium   (x 0.90)
//! spread    + total            => positive, medium   (x 0.90)
//! prop      + prop             => positive, low      (x 0.95)
//! moneyline + spread, same side => prohibited, high  (parlay rejected)
//! ```
//!
//! Legs on different events that share a participant are positive, low.

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod independence;
pub mod leg;
pub mod line;
pub mod odds;
pub mod pricing;
pub mod risk;

// Re-exports for convenience
pub use config::{CorrelationPenalties, ParlayConfig};
pub use correlation::{CorrelationDetector, CorrelationKind, CorrelationWarning, Severity};
pub use engine::{ParlayEngine, PricingRequest};
pub use error::ParlayError;
pub use independence::{IndependenceReport, IndependenceScorer};
pub use leg::{EventId, Leg, LegId, Market, Participants};
pub use line::{BestLine, LineShopper, Quote};
pub use odds::OddsConverter;
pub use pricing::{ParlayPrice, PricingResult};
pub use risk::{KellySizer, PricingState, StakeRecommendation};

use rust_decimal::Decimal;

/// Price a parlay with the default configuration.
///
/// `bankroll` defaults to $1,000 when `None`.
pub fn price_parlay(legs: &[Leg], bankroll: Option<Decimal>) -> Result<PricingResult, ParlayError> {
    ParlayEngine::default().price_parlay(legs, bankroll)
}

/// Score leg independence with the default rule table.
pub fn score_independence(legs: &[Leg]) -> IndependenceReport {
    IndependenceScorer::score(legs)
}

/// Find the best line among quotes for one selection.
///
/// Quotes with invalid odds are an error; `Ok(None)` means `quotes` was empty.
pub fn find_best_line(quotes: &[Quote]) -> Result<Option<BestLine>, ParlayError> {
    LineShopper::find_best_line(quotes)
}
