//! Pairwise correlation detection between parlay legs.
//!
//! Correlation is classified by a fixed heuristic rule table, not estimated
//! from historical outcomes. Same-event pairs are looked up in
//! [`SAME_EVENT_RULES`] by their (unordered) market combination; legs from
//! different events that share a participant fall back to
//! [`CROSS_EVENT_PARTICIPANT`].

use crate::leg::{Leg, LegId, Market};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Statistical relationship between two legs.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationKind {
    /// Outcomes tend to move together, so the naive joint probability is overstated.
    Positive,
    /// Outcomes tend to move apart. No current rule emits this.
    Negative,
    /// Definitionally dependent; the parlay must be rejected.
    Prohibited,
}

impl std::fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationKind::Positive => write!(f, "positive"),
            CorrelationKind::Negative => write!(f, "negative"),
            CorrelationKind::Prohibited => write!(f, "prohibited"),
        }
    }
}

#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A detected relationship between two legs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorrelationWarning {
    /// Earlier leg of the pair (input order)
    pub leg_a: LegId,
    /// Later leg of the pair (input order)
    pub leg_b: LegId,
    pub kind: CorrelationKind,
    pub severity: Severity,
    /// Human-readable explanation
    pub message: String,
}

impl CorrelationWarning {
    pub fn is_prohibited(&self) -> bool {
        self.kind == CorrelationKind::Prohibited
    }

    /// Check if this warning references the given leg.
    pub fn involves(&self, leg: &LegId) -> bool {
        &self.leg_a == leg || &self.leg_b == leg
    }
}

/// One entry of the correlation rule table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CorrelationRule {
    /// Market combination this rule applies to, in either order
    pub markets: (Market, Market),
    /// Only applies when both legs back the same selection
    pub same_selection: bool,
    pub kind: CorrelationKind,
    pub severity: Severity,
    pub reason: &'static str,
}

impl CorrelationRule {
    /// Check if this rule applies to the pair, regardless of leg order.
    pub fn matches(&self, a: &Leg, b: &Leg) -> bool {
        let (x, y) = self.markets;
        let markets = (a.market == x && b.market == y) || (a.market == y && b.market == x);
        markets && (!self.same_selection || a.is_same_selection(b))
    }

    fn warning(&self, a: &Leg, b: &Leg, context: &str) -> CorrelationWarning {
        CorrelationWarning {
            leg_a: a.id.clone(),
            leg_b: b.id.clone(),
            kind: self.kind,
            severity: self.severity,
            message: format!(
                "{} ({}) and {} ({}) {context}: {}",
                a.id, a.market, b.id, b.market, self.reason
            ),
        }
    }
}

/// Rules for two legs on the same event. First match wins.
pub const SAME_EVENT_RULES: [CorrelationRule; 4] = [
    CorrelationRule {
        markets: (Market::Moneyline, Market::Spread),
        same_selection: true,
        kind: CorrelationKind::Prohibited,
        severity: Severity::High,
        reason: "moneyline and spread backing the same side are definitionally dependent and cannot be combined",
    },
    CorrelationRule {
        markets: (Market::Moneyline, Market::Total),
        same_selection: false,
        kind: CorrelationKind::Positive,
        severity: Severity::Medium,
        reason: "scoring outcome and total tend to move together",
    },
    CorrelationRule {
        markets: (Market::Spread, Market::Total),
        same_selection: false,
        kind: CorrelationKind::Positive,
        severity: Severity::Medium,
        reason: "margin of victory and total tend to move together",
    },
    CorrelationRule {
        markets: (Market::Prop, Market::Prop),
        same_selection: false,
        kind: CorrelationKind::Positive,
        severity: Severity::Low,
        reason: "shared game-script risk",
    },
];

/// Legs on different events that share a team or player.
pub const CROSS_EVENT_PARTICIPANT: ParticipantRule = ParticipantRule {
    kind: CorrelationKind::Positive,
    severity: Severity::Low,
    reason: "same team across games, mild schedule/form correlation",
};

/// Classification applied without a market lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParticipantRule {
    pub kind: CorrelationKind,
    pub severity: Severity,
    pub reason: &'static str,
}

/// Detects correlation between every pair of legs in a parlay.
pub struct CorrelationDetector;

impl CorrelationDetector {
    /// Examine every unordered pair `(i, j)`, `i < j`, in ascending pair order.
    pub fn detect(legs: &[Leg]) -> Vec<CorrelationWarning> {
        legs.iter()
            .tuple_combinations()
            .filter_map(|(a, b)| Self::classify_pair(a, b))
            .inspect(|warning| {
                debug!(
                    leg_a = %warning.leg_a,
                    leg_b = %warning.leg_b,
                    kind = %warning.kind,
                    severity = %warning.severity,
                    "Correlation detected"
                );
            })
            .collect()
    }

    /// Classify a single pair of legs, `a` preceding `b` in input order.
    pub fn classify_pair(a: &Leg, b: &Leg) -> Option<CorrelationWarning> {
        if a.is_same_event(b) {
            let context = format!("on event {}", a.event_id);
            return SAME_EVENT_RULES
                .iter()
                .find(|rule| rule.matches(a, b))
                .map(|rule| rule.warning(a, b, &context));
        }

        a.shared_participant(b).map(|participant| {
            let rule = CROSS_EVENT_PARTICIPANT;
            CorrelationWarning {
                leg_a: a.id.clone(),
                leg_b: b.id.clone(),
                kind: rule.kind,
                severity: rule.severity,
                message: format!(
                    "{} and {} both involve {participant} on different events: {}",
                    a.id, b.id, rule.reason
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKETS: [Market; 4] = [Market::Moneyline, Market::Spread, Market::Total, Market::Prop];

    fn leg(id: &str, event: &str, market: Market, selection: &str) -> Leg {
        Leg::new(id, event, market, selection, -110)
    }

    /// Expected same-event classification, with same-selection flag.
    fn expected(x: Market, y: Market, same_selection: bool) -> Option<(CorrelationKind, Severity)> {
        use Market::*;
        match (x.min(y), x.max(y)) {
            (Moneyline, Spread) if same_selection => Some((CorrelationKind::Prohibited, Severity::High)),
            (Moneyline, Total) => Some((CorrelationKind::Positive, Severity::Medium)),
            (Spread, Total) => Some((CorrelationKind::Positive, Severity::Medium)),
            (Prop, Prop) => Some((CorrelationKind::Positive, Severity::Low)),
            _ => None,
        }
    }

    #[test]
    fn test_same_event_rule_table_exhaustive() {
        for x in MARKETS {
            for y in MARKETS {
                for same_selection in [true, false] {
                    let a = leg("a", "game-1", x, "Lakers");
                    let b = leg("b", "game-1", y, if same_selection { "Lakers" } else { "Celtics" });

                    let actual = CorrelationDetector::classify_pair(&a, &b)
                        .map(|warning| (warning.kind, warning.severity));
                    assert_eq!(
                        actual,
                        expected(x, y, same_selection),
                        "{x} + {y} (same selection: {same_selection})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rule_matches_either_order() {
        let ml = leg("a", "g", Market::Moneyline, "Lakers");
        let total = leg("b", "g", Market::Total, "over");
        let rule = SAME_EVENT_RULES[1];

        assert!(rule.matches(&ml, &total));
        assert!(rule.matches(&total, &ml));
    }

    #[test]
    fn test_moneyline_spread_same_selection_prohibited() {
        let legs = vec![
            leg("ml", "game-1", Market::Moneyline, "Lakers"),
            leg("sp", "game-1", Market::Spread, "lakers"),
        ];

        let warnings = CorrelationDetector::detect(&legs);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_prohibited());
        assert_eq!(warnings[0].severity, Severity::High);
        assert_eq!(warnings[0].leg_a, LegId::from("ml"));
        assert_eq!(warnings[0].leg_b, LegId::from("sp"));
        assert!(warnings[0].message.contains("game-1"));
    }

    #[test]
    fn test_cross_event_same_participant() {
        let legs = vec![
            leg("a", "game-1", Market::Moneyline, "Lakers").with_participants("Lakers", "Celtics"),
            leg("b", "game-2", Market::Moneyline, "Lakers").with_participants("Warriors", "Lakers"),
        ];

        let warnings = CorrelationDetector::detect(&legs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, CorrelationKind::Positive);
        assert_eq!(warnings[0].severity, Severity::Low);
        assert!(warnings[0].message.contains("Lakers"));
    }

    #[test]
    fn test_same_event_takes_precedence_over_participants() {
        // Same event and shared participants, but moneyline + moneyline has no rule
        let legs = vec![
            leg("a", "game-1", Market::Moneyline, "Lakers").with_participants("Lakers", "Celtics"),
            leg("b", "game-1", Market::Moneyline, "Celtics").with_participants("Lakers", "Celtics"),
        ];

        assert!(CorrelationDetector::detect(&legs).is_empty());
    }

    #[test]
    fn test_independent_legs_no_warnings() {
        let legs = vec![
            leg("a", "game-1", Market::Moneyline, "Lakers").with_participants("Lakers", "Celtics"),
            leg("b", "game-2", Market::Total, "over").with_participants("Heat", "Knicks"),
            leg("c", "game-3", Market::Spread, "Bulls"),
        ];

        assert!(CorrelationDetector::detect(&legs).is_empty());
    }

    #[test]
    fn test_warnings_in_ascending_pair_order() {
        let legs = vec![
            leg("0", "game-1", Market::Prop, "player-1"),
            leg("1", "game-1", Market::Prop, "player-2"),
            leg("2", "game-1", Market::Prop, "player-3"),
        ];

        let pairs: Vec<_> = CorrelationDetector::detect(&legs)
            .into_iter()
            .map(|w| (w.leg_a.0.to_string(), w.leg_b.0.to_string()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("0".to_string(), "1".to_string()),
                ("0".to_string(), "2".to_string()),
                ("1".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_warning_involves() {
        let warning = CorrelationDetector::classify_pair(
            &leg("a", "g", Market::Prop, "p1"),
            &leg("b", "g", Market::Prop, "p2"),
        )
        .unwrap();

        assert!(warning.involves(&LegId::from("a")));
        assert!(warning.involves(&LegId::from("b")));
        assert!(!warning.involves(&LegId::from("c")));
    }
}
