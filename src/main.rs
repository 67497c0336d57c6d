//! Food Club engine command line
//!
//! Entry point. Loads configuration, initialises structured logging, reads a
//! round (and optionally a portfolio), optionally replaces the portfolio with
//! a generated one, and logs the round calculation.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{info, warn};

use foodclub::codec;
use foodclub::config::{AppConfig, EngineSettings};
use foodclub::engine::{RoundCalculation, RoundCalculator};
use foodclub::generators::Strategy;
use foodclub::storage;
use foodclub::types::{PayoutEntry, Portfolio};
use foodclub::valuation;

const CONFIG_PATH: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "foodclub", about = "Food Club round calculator", version)]
struct Cli {
    /// Round Data JSON file
    round: String,

    /// Saved portfolio JSON file
    portfolio: Option<String>,

    /// Replace the portfolio with a generated one
    /// (max-ter, gambit, bustproof, crazy, winning)
    #[arg(long, value_name = "STRATEGY")]
    generate: Option<Strategy>,

    /// Write the generated portfolio to this path
    #[arg(long, value_name = "PATH", requires = "generate")]
    save: Option<String>,

    /// Print the full calculation as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let args = Cli::parse();

    let cfg = if Path::new(CONFIG_PATH).exists() {
        AppConfig::load(CONFIG_PATH)?
    } else {
        warn!(path = CONFIG_PATH, "No config file found, using defaults");
        AppConfig::default()
    };

    // -- Inputs ----------------------------------------------------------

    let round = storage::load_round(&args.round)?;
    let settings = EngineSettings::from_config(&cfg, round.round);
    info!(
        round = round.round,
        logit = settings.use_logit_model,
        custom_odds = settings.custom_odds_mode,
        max_bet = ?settings.max_bet,
        "Engine settings resolved"
    );
    let calculator = RoundCalculator::new(settings);

    let mut portfolio = match &args.portfolio {
        Some(path) => storage::load_portfolio(path)?
            .with_context(|| format!("Portfolio file not found: {path}"))?,
        None => Portfolio::default(),
    };

    // -- Generation ------------------------------------------------------

    if let Some(strategy) = args.generate {
        let generator = calculator.generator(&round, cfg.generator_config(round.round))?;
        let mut rng = match cfg.generator.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generated = generator.generate(strategy, &round, &mut rng)?;
        info!(label = %generated.label, "Using generated portfolio");
        portfolio = generated.portfolio;

        if let Some(path) = &args.save {
            storage::save_portfolio(&portfolio, path)?;
            info!(path = %path, "Generated portfolio saved");
        }
    }

    for mask in valuation::duplicate_masks(&portfolio) {
        warn!(selection = %codec::decode(mask), "Duplicate wager in portfolio");
    }

    // -- Calculation -----------------------------------------------------

    let calculation = calculator.calculate(&round, &portfolio);
    if !calculation.calculated {
        warn!(round = round.round, "Round could not be calculated");
        return Ok(());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&calculation)
            .context("Failed to serialise round calculation")?;
        println!("{json}");
    } else {
        log_calculation(&calculation);
    }

    Ok(())
}

/// Log a human-readable calculation summary.
fn log_calculation(calculation: &RoundCalculation) {
    let summary = &calculation.summary;
    info!(
        model = ?calculation.model,
        wagers = summary.enabled_wagers,
        total_stake = summary.total_stake,
        expected_ratio = format!("{:.3}", summary.total_expected_ratio),
        net_expected = format!("{:.1}", summary.total_net_expected),
        winning_odds = summary.winning_odds,
        winning_payoff = summary.winning_payoff,
        "Portfolio summary"
    );

    for (index, value) in &calculation.valuations {
        if value.mask == 0 {
            continue;
        }
        info!(
            wager = index,
            selection = %codec::decode(value.mask),
            odds = value.odds,
            probability = format!("{:.5}", value.probability),
            expected_ratio = format!("{:.3}", value.expected_ratio),
            payoff = value.payoff,
            "Wager"
        );
    }

    log_payout_table("odds", &calculation.payout_tables.odds);
    log_payout_table("winnings", &calculation.payout_tables.winnings);
}

fn log_payout_table(kind: &str, entries: &[PayoutEntry]) {
    for entry in entries {
        info!(
            table = kind,
            value = entry.value,
            probability = format!("{:.5}", entry.probability),
            cumulative = format!("{:.5}", entry.cumulative),
            tail = format!("{:.5}", entry.tail),
            "Payout"
        );
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("foodclub=info"));

    let json_logging = std::env::var("FOODCLUB_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("foodclub").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_round_only() {
        let cli = make_cli(&["round.json"]).unwrap();
        assert_eq!(cli.round, "round.json");
        assert!(cli.portfolio.is_none());
        assert!(cli.generate.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_generate_and_save() {
        let cli = make_cli(&[
            "round.json",
            "saved.json",
            "--generate",
            "bustproof",
            "--save",
            "out.json",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.portfolio.as_deref(), Some("saved.json"));
        assert_eq!(cli.generate, Some(Strategy::Bustproof));
        assert_eq!(cli.save.as_deref(), Some("out.json"));
        assert!(cli.json);
    }

    #[test]
    fn test_parse_strategy_aliases() {
        let cli = make_cli(&["round.json", "--generate", "maxter"]).unwrap();
        assert_eq!(cli.generate, Some(Strategy::MaxTer));
        let cli = make_cli(&["round.json", "--generate=winning"]).unwrap();
        assert_eq!(cli.generate, Some(Strategy::Winning));
    }

    #[test]
    fn test_parse_errors() {
        assert!(make_cli(&[]).is_err());
        assert!(make_cli(&["round.json", "--generate"]).is_err());
        assert!(make_cli(&["round.json", "--generate", "martingale"]).is_err());
        assert!(make_cli(&["round.json", "--save", "out.json"]).is_err());
        assert!(make_cli(&["a.json", "b.json", "c.json"]).is_err());
        assert!(make_cli(&["round.json", "--verbose"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
