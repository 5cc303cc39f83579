//! Best available price across bookmakers for one selection.

use crate::{
    error::ParlayError,
    leg::{same_name, EventId, Market},
    odds::OddsConverter,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// A price quoted by one bookmaker for a selection.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quote {
    pub bookmaker: SmolStr,
    pub event_id: EventId,
    pub market: Market,
    pub selection: SmolStr,
    /// American odds
    pub odds: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
}

impl Quote {
    pub fn new(
        bookmaker: impl Into<SmolStr>,
        event_id: impl Into<SmolStr>,
        market: Market,
        selection: impl Into<SmolStr>,
        odds: i32,
    ) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            event_id: EventId::new(event_id),
            market,
            selection: selection.into(),
            odds,
            line: None,
        }
    }

    /// Reject odds of zero or with magnitude below 100.
    pub fn validate(&self) -> Result<(), ParlayError> {
        self.profit_per_100().map(|_| ())
    }

    /// Profit on a $100 stake at this quote's price.
    pub fn profit_per_100(&self) -> Result<Decimal, ParlayError> {
        OddsConverter::profit_per_100(self.odds).ok_or_else(|| ParlayError::InvalidQuote {
            bookmaker: self.bookmaker.clone(),
            odds: self.odds,
        })
    }

    /// Check if both quotes price the same logical selection.
    pub fn is_same_selection(&self, other: &Quote) -> bool {
        self.event_id == other.event_id
            && self.market == other.market
            && same_name(&self.selection, &other.selection)
    }
}

/// The most favourable quote and what it is worth over the worst one.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BestLine {
    pub best: Quote,
    pub bookmaker: SmolStr,
    /// Extra profit on a $100 stake at the best price versus the worst
    pub savings_per_100: Decimal,
}

/// Finds the best line among quotes for the same selection.
pub struct LineShopper;

impl LineShopper {
    /// Return the quote with the highest American odds; ties go to the earliest.
    ///
    /// Quotes for a different selection than the first are skipped. Any quote
    /// with invalid odds is an error. Returns `Ok(None)` only when `quotes` is
    /// empty.
    pub fn find_best_line(quotes: &[Quote]) -> Result<Option<BestLine>, ParlayError> {
        quotes.iter().try_for_each(Quote::validate)?;

        let Some((first, rest)) = quotes.split_first() else {
            return Ok(None);
        };

        let (best, worst) = rest
            .iter()
            .filter(|quote| {
                let same = quote.is_same_selection(first);
                if !same {
                    debug!(
                        bookmaker = %quote.bookmaker,
                        event = %quote.event_id,
                        selection = %quote.selection,
                        "Skipping quote for a different selection"
                    );
                }
                same
            })
            .fold((first, first), |(best, worst), quote| {
                (
                    if quote.odds > best.odds { quote } else { best },
                    if quote.odds < worst.odds { quote } else { worst },
                )
            });

        let savings_per_100 = best.profit_per_100()? - worst.profit_per_100()?;

        Ok(Some(BestLine {
            best: best.clone(),
            bookmaker: best.bookmaker.clone(),
            savings_per_100,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(bookmaker: &str, odds: i32) -> Quote {
        Quote::new(bookmaker, "NBA-LAL-BOS", Market::Moneyline, "Lakers", odds)
    }

    #[test]
    fn test_find_best_line() {
        let quotes = vec![quote("draftkings", 110), quote("fanduel", -105), quote("betmgm", 120)];

        let line = LineShopper::find_best_line(&quotes).unwrap().unwrap();
        assert_eq!(line.best.odds, 120);
        assert_eq!(line.bookmaker.as_str(), "betmgm");
        // $120.00 at +120 versus $95.24 at -105
        assert_eq!(line.savings_per_100, dec!(24.76));
    }

    #[test]
    fn test_find_best_line_empty() {
        assert_eq!(LineShopper::find_best_line(&[]), Ok(None));
    }

    #[test]
    fn test_find_best_line_single_quote() {
        let line = LineShopper::find_best_line(&[quote("draftkings", -110)])
            .unwrap()
            .unwrap();
        assert_eq!(line.bookmaker.as_str(), "draftkings");
        assert_eq!(line.savings_per_100, Decimal::ZERO);
    }

    #[test]
    fn test_find_best_line_tie_first_wins() {
        let quotes = vec![quote("draftkings", -110), quote("fanduel", 105), quote("betmgm", 105)];

        let line = LineShopper::find_best_line(&quotes).unwrap().unwrap();
        assert_eq!(line.bookmaker.as_str(), "fanduel");
    }

    #[test]
    fn test_find_best_line_skips_other_selections() {
        let quotes = vec![
            quote("draftkings", -110),
            Quote::new("fanduel", "NBA-LAL-BOS", Market::Moneyline, "Celtics", 300),
            Quote::new("caesars", "NBA-LAL-BOS", Market::Spread, "Lakers", 250),
            quote("betmgm", -105),
        ];

        let line = LineShopper::find_best_line(&quotes).unwrap().unwrap();
        assert_eq!(line.bookmaker.as_str(), "betmgm");
        // $95.24 at -105 versus $90.91 at -110
        assert_eq!(line.savings_per_100, dec!(4.33));
    }

    #[test]
    fn test_find_best_line_rejects_invalid_odds() {
        let quotes = vec![quote("draftkings", 0), quote("fanduel", -110)];

        assert_eq!(
            LineShopper::find_best_line(&quotes),
            Err(ParlayError::InvalidQuote {
                bookmaker: "draftkings".into(),
                odds: 0
            })
        );
    }

    #[test]
    fn test_find_best_line_rejects_invalid_odds_for_other_selection() {
        let quotes = vec![
            quote("draftkings", -110),
            Quote::new("fanduel", "NBA-LAL-BOS", Market::Moneyline, "Celtics", 50),
        ];

        assert!(matches!(
            LineShopper::find_best_line(&quotes),
            Err(ParlayError::InvalidQuote { odds: 50, .. })
        ));
    }

    #[test]
    fn test_quote_profit_per_100() {
        assert_eq!(quote("betmgm", 120).profit_per_100(), Ok(dec!(120.00)));
        assert!(quote("betmgm", -99).validate().is_err());
        assert!(quote("betmgm", -100).validate().is_ok());
    }
}
