//! Prices a handful of parlays and shops a line across bookmakers.
//!
//! Usage:
//!   cargo run -p barter-parlay --example price_parlay
//!   RUST_LOG=barter_parlay=debug cargo run -p barter-parlay --example price_parlay
//!
//! Pass a path to a JSON `PricingRequest` to price it instead of the samples:
//!   cargo run -p barter-parlay --example price_parlay -- request.json

use barter_parlay::{
    Leg, Market, ParlayConfig, ParlayEngine, PricingRequest, PricingResult, Quote,
};
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that can occur when loading a pricing request from disk.
#[derive(Debug, Error)]
enum LoadRequestError {
    #[error("Failed to read request file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

const CONFIG_JSON: &str = r#"{
    "max_legs": 12,
    "kelly_divisor": 4.0,
    "max_bankroll_fraction": "0.05"
}"#;

fn main() {
    init_logging();

    let config = match ParlayConfig::from_json(CONFIG_JSON) {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "Invalid engine configuration");
            return;
        }
    };
    let engine = match ParlayEngine::new(config) {
        Ok(engine) => engine,
        Err(error) => {
            error!(%error, "Failed to build engine");
            return;
        }
    };

    let requests = match std::env::args().nth(1) {
        Some(path) => match load_request(&path) {
            Ok(request) => vec![request],
            Err(error) => {
                error!(%path, %error, "Failed to load pricing request");
                return;
            }
        },
        None => sample_requests(),
    };

    for (index, result) in engine.price_batch(&requests).into_iter().enumerate() {
        match result {
            Ok(result) => report(index, &result),
            Err(error) => warn!(request = index, %error, "Pricing request rejected"),
        }
    }

    let all_legs = sample_requests()
        .into_iter()
        .flat_map(|request| request.legs)
        .collect::<Vec<_>>();
    let report = engine.score_independence(&all_legs);
    info!(
        score = report.score,
        is_optimal = report.is_optimal,
        recommendations = ?report.recommendations,
        "Independence of all sample legs"
    );

    let quotes = vec![
        Quote::new("draftkings", "NBA-LAL-BOS", Market::Moneyline, "Lakers", 110),
        Quote::new("fanduel", "NBA-LAL-BOS", Market::Moneyline, "Lakers", -105),
        Quote::new("betmgm", "NBA-LAL-BOS", Market::Moneyline, "Lakers", 120),
    ];
    match engine.find_best_line(&quotes) {
        Ok(Some(line)) => info!(
            bookmaker = %line.bookmaker,
            odds = line.best.odds,
            savings_per_100 = %line.savings_per_100,
            "Best line"
        ),
        Ok(None) => info!("No quotes to compare"),
        Err(error) => warn!(%error, "Line shopping rejected"),
    }
}

fn load_request(path: &str) -> Result<PricingRequest, LoadRequestError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn sample_requests() -> Vec<PricingRequest> {
    vec![
        // Independent legs
        PricingRequest::new(
            vec![
                Leg::new("kc-ml", "NFL-KC-BUF", Market::Moneyline, "Chiefs", -150),
                Leg::new("bos-ml", "NBA-LAL-BOS", Market::Moneyline, "Celtics", 130),
            ],
            Some(dec!(1000)),
        ),
        // Same game: moneyline + total
        PricingRequest::new(
            vec![
                Leg::new("kc-ml", "NFL-KC-BUF", Market::Moneyline, "Chiefs", -150)
                    .with_participants("Chiefs", "Bills"),
                Leg::new("kc-buf-over", "NFL-KC-BUF", Market::Total, "over", -110)
                    .with_line(47.5),
                Leg::new("bos-ml", "NBA-LAL-BOS", Market::Moneyline, "Celtics", 130),
            ],
            None,
        ),
        // Same side moneyline + spread
        PricingRequest::new(
            vec![
                Leg::new("kc-ml", "NFL-KC-BUF", Market::Moneyline, "Chiefs", -150),
                Leg::new("kc-spread", "NFL-KC-BUF", Market::Spread, "Chiefs", -110)
                    .with_line(-3.5),
            ],
            Some(dec!(5000)),
        ),
    ]
}

fn report(index: usize, result: &PricingResult) {
    info!(
        request = index,
        state = %result.state,
        combined_odds = result.combined_odds,
        naive_probability = result.naive_probability,
        true_probability = result.true_probability,
        payout_per_100 = %result.payout_per_100,
        expected_value = result.expected_value,
        recommended_stake = %result.recommended_stake,
        "Parlay priced"
    );

    for warning in &result.warnings {
        info!(
            request = index,
            leg_a = %warning.leg_a,
            leg_b = %warning.leg_b,
            kind = %warning.kind,
            severity = %warning.severity,
            "{}",
            warning.message
        );
    }

    for message in &result.errors {
        warn!(request = index, "{message}");
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init()
}
