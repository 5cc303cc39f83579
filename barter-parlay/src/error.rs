//! Errors for structurally invalid pricing requests.
//!
//! Domain outcomes such as too many legs or a prohibited combination are not
//! errors; they are terminal [`PricingState`](crate::risk::PricingState)s
//! surfaced on the [`PricingResult`](crate::pricing::PricingResult).

use crate::leg::LegId;
use rust_decimal::Decimal;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors that can occur when a pricing request is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParlayError {
    #[error("Parlay has no legs")]
    NoLegs,

    #[error("Leg {leg} has invalid American odds {odds}: must be non-zero with magnitude >= 100")]
    InvalidOdds { leg: LegId, odds: i32 },

    #[error("Quote from {bookmaker} has invalid American odds {odds}: must be non-zero with magnitude >= 100")]
    InvalidQuote { bookmaker: SmolStr, odds: i32 },

    #[error("Combined decimal odds {0} are beyond the representable price range")]
    PriceOverflow(f64),

    #[error("Bankroll must be positive, got {0}")]
    InvalidBankroll(Decimal),

    #[error("Duplicate leg id: {0}")]
    DuplicateLeg(LegId),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
