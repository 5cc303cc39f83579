//! Independence/quality scoring for an assembled set of legs.

use crate::{
    correlation::{CorrelationDetector, CorrelationWarning, Severity},
    leg::{EventId, Leg},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Score a parlay starts from before deductions.
pub const MAX_INDEPENDENCE_SCORE: u8 = 100;

/// Deduction per high-severity warning.
pub const HIGH_SEVERITY_DEDUCTION: u8 = 20;

/// Deduction per medium-severity warning.
pub const MEDIUM_SEVERITY_DEDUCTION: u8 = 10;

/// Scores at or above this are considered optimal.
pub const OPTIMAL_SCORE: u8 = 80;

/// How independent the legs of a parlay are, with suggested fixes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndependenceReport {
    /// 0-100, higher is more independent
    pub score: u8,
    pub is_optimal: bool,
    pub recommendations: Vec<String>,
}

/// Scores leg independence from the correlation rule table.
pub struct IndependenceScorer;

impl IndependenceScorer {
    /// Detect correlation between `legs` and score the result.
    pub fn score(legs: &[Leg]) -> IndependenceReport {
        let warnings = CorrelationDetector::detect(legs);
        Self::score_with_warnings(legs, &warnings)
    }

    /// Score `legs` against already-detected warnings.
    pub fn score_with_warnings(legs: &[Leg], warnings: &[CorrelationWarning]) -> IndependenceReport {
        let deductions: u32 = warnings
            .iter()
            .map(|warning| match warning.severity {
                Severity::High => u32::from(HIGH_SEVERITY_DEDUCTION),
                Severity::Medium => u32::from(MEDIUM_SEVERITY_DEDUCTION),
                Severity::Low => 0,
            })
            .sum();
        let score = u32::from(MAX_INDEPENDENCE_SCORE).saturating_sub(deductions) as u8;

        let mut recommendations: Vec<String> = warnings
            .iter()
            .filter(|warning| warning.severity == Severity::High)
            .map(|warning| {
                format!(
                    "Consider replacing leg {}: {}",
                    warning.leg_b, warning.message
                )
            })
            .collect();

        if let Some((event, count)) = Self::most_common_event(legs) {
            // A lone leg shares its event with nothing
            if legs.len() >= 2 && count * 2 > legs.len() {
                recommendations.push(format!(
                    "{count} of {} legs are on event {event}; true odds are materially reduced",
                    legs.len()
                ));
            }
        }

        IndependenceReport {
            score,
            is_optimal: score >= OPTIMAL_SCORE,
            recommendations,
        }
    }

    /// The event with the most legs, first-seen order breaking ties.
    fn most_common_event(legs: &[Leg]) -> Option<(&EventId, usize)> {
        let mut counts: IndexMap<&EventId, usize> = IndexMap::new();
        for leg in legs {
            *counts.entry(&leg.event_id).or_default() += 1;
        }

        counts
            .into_iter()
            .fold(None, |best, (event, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((event, count)),
            })
    }
}
