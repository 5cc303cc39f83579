//! Parlay leg definitions.

use crate::{error::ParlayError, odds::OddsConverter};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Opaque leg identifier, unique within a pricing request.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Display, From, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LegId(pub SmolStr);

impl LegId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for LegId {
    fn from(id: &str) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Identifier of the underlying contest. Two legs with equal `EventId` are "same game".
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Display, From, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventId(pub SmolStr);

impl EventId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Market type a leg is drawn from.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Moneyline,
    Spread,
    Total,
    Prop,
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Market::Moneyline => write!(f, "moneyline"),
            Market::Spread => write!(f, "spread"),
            Market::Total => write!(f, "total"),
            Market::Prop => write!(f, "prop"),
        }
    }
}

/// The two competing sides of an event.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Participants {
    pub home: SmolStr,
    pub away: SmolStr,
}

impl Participants {
    pub fn new(home: impl Into<SmolStr>, away: impl Into<SmolStr>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Check if `name` is one of the two sides.
    pub fn contains(&self, name: &str) -> bool {
        same_name(&self.home, name) || same_name(&self.away, name)
    }

    /// Find a side that also appears in `other`, if any.
    pub fn shared_with(&self, other: &Participants) -> Option<&SmolStr> {
        [&self.home, &self.away]
            .into_iter()
            .find(|name| other.contains(name))
    }
}

/// One wager to be combined into a parlay.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Leg {
    /// Unique identifier within the request
    pub id: LegId,
    /// Underlying contest
    pub event_id: EventId,
    /// Market type
    pub market: Market,
    /// Chosen outcome (team name, "over"/"under", player identifier)
    pub selection: SmolStr,
    /// American odds (e.g. -150, +120)
    pub odds: i32,
    /// Point/line for spread, total or prop markets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    /// Competing sides, used for cross-event same-team detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Participants>,
}

impl Leg {
    /// Create a new leg without a line or participants.
    pub fn new(
        id: impl Into<SmolStr>,
        event_id: impl Into<SmolStr>,
        market: Market,
        selection: impl Into<SmolStr>,
        odds: i32,
    ) -> Self {
        Self {
            id: LegId::new(id),
            event_id: EventId::new(event_id),
            market,
            selection: selection.into(),
            odds,
            line: None,
            participants: None,
        }
    }

    pub fn with_line(mut self, line: f64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_participants(mut self, home: impl Into<SmolStr>, away: impl Into<SmolStr>) -> Self {
        self.participants = Some(Participants::new(home, away));
        self
    }

    /// Reject odds of zero or with magnitude below 100.
    pub fn validate(&self) -> Result<(), ParlayError> {
        if OddsConverter::is_valid_american(self.odds) {
            Ok(())
        } else {
            Err(ParlayError::InvalidOdds {
                leg: self.id.clone(),
                odds: self.odds,
            })
        }
    }

    pub fn decimal_odds(&self) -> f64 {
        OddsConverter::american_to_decimal(self.odds)
    }

    pub fn implied_probability(&self) -> f64 {
        OddsConverter::implied_probability(self.odds)
    }

    pub fn is_same_event(&self, other: &Leg) -> bool {
        self.event_id == other.event_id
    }

    pub fn is_same_selection(&self, other: &Leg) -> bool {
        same_name(&self.selection, &other.selection)
    }

    /// Participant name shared with `other`, if both legs carry participants.
    pub fn shared_participant<'a>(&'a self, other: &Leg) -> Option<&'a SmolStr> {
        match (&self.participants, &other.participants) {
            (Some(mine), Some(theirs)) => mine.shared_with(theirs),
            _ => None,
        }
    }
}

/// Names compare case-insensitively, ignoring surrounding whitespace.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
