//! Persistence layer.
//!
//! Round Data is read from the upstream JSON document. Portfolios are saved
//! and loaded as JSON keyed by wager position, with selections validated on
//! the way in.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::{Portfolio, RoundData};

/// Load Round Data from a JSON file.
pub fn load_round(path: &str) -> Result<RoundData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read round data from {path}"))?;
    let round: RoundData = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse round data from {path}"))?;

    if !round.is_valid() {
        warn!(path, round = round.round, "Round data is incomplete");
    }
    info!(
        path,
        round = round.round,
        concluded = round.is_concluded(),
        "Round data loaded"
    );
    Ok(round)
}

/// Save a portfolio to a JSON file.
pub fn save_portfolio(portfolio: &Portfolio, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(portfolio).context("Failed to serialise portfolio")?;
    std::fs::write(path, &json).with_context(|| format!("Failed to write portfolio to {path}"))?;

    debug!(path, wagers = portfolio.len(), "Portfolio saved");
    Ok(())
}

/// Load a portfolio from a JSON file.
/// Returns None if the file doesn't exist.
pub fn load_portfolio(path: &str) -> Result<Option<Portfolio>> {
    if !Path::new(path).exists() {
        info!(path, "No saved portfolio found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portfolio from {path}"))?;
    let portfolio: Portfolio = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse portfolio from {path}"))?;

    info!(
        path,
        wagers = portfolio.len(),
        active = portfolio.active().count(),
        "Portfolio loaded from disk"
    );
    Ok(Some(portfolio))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Selection, Wager};

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("foodclub_test_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    fn make_portfolio() -> Portfolio {
        Portfolio::from_wagers([
            Wager::new(Selection::new([1, 0, 3, 0, 0]).unwrap(), Some(250)).unwrap(),
            Wager::unplaced(Selection::new([0, 0, 0, 0, 4]).unwrap()),
            Wager::default(),
        ])
        .unwrap()
    }

    #[test]
    fn test_save_and_load_portfolio() {
        let path = temp_path();
        let portfolio = make_portfolio();
        save_portfolio(&portfolio, &path).unwrap();

        let loaded = load_portfolio(&path).unwrap().unwrap();
        assert_eq!(loaded, portfolio);
        assert_eq!(loaded.get(1).unwrap().stake, Some(250));
        assert_eq!(loaded.get(2).unwrap().stake, None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_nonexistent_portfolio() {
        let loaded = load_portfolio("/tmp/foodclub_nonexistent_portfolio_12345.json").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_rejects_invalid_selection() {
        let path = temp_path();
        std::fs::write(&path, r#"{"1": {"selection": [5, 0, 0, 0, 0], "stake": 10}}"#).unwrap();
        assert!(load_portfolio(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_out_of_range_stake() {
        let path = temp_path();
        std::fs::write(
            &path,
            r#"{"1": {"selection": [1, 0, 0, 0, 0], "stake": 0},
                "2": {"selection": [2, 0, 0, 0, 0], "stake": 9000000}}"#,
        )
        .unwrap();
        assert!(load_portfolio(&path).is_err());

        std::fs::write(&path, r#"{"1": {"selection": [2, 0, 0, 0, 0], "stake": 9000000}}"#)
            .unwrap();
        let err = load_portfolio(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid stake"));

        std::fs::write(&path, r#"{"1": {"selection": [1, 0, 0, 0, 0], "stake": null}}"#).unwrap();
        let loaded = load_portfolio(&path).unwrap().unwrap();
        assert_eq!(loaded.get(1).unwrap().stake, None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_round() {
        let path = temp_path();
        std::fs::write(
            &path,
            r#"{
                "round": 9001,
                "pirates": [[1,2,3,4],[5,6,7,8],[9,10,11,12],[13,14,15,16],[17,18,19,20]],
                "openingOdds": [[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13]],
                "currentOdds": [[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13],[1,2,4,7,13]],
                "winners": [1,2,3,4,1],
                "start": "2026-10-13T07:00:00Z"
            }"#,
        )
        .unwrap();

        let round = load_round(&path).unwrap();
        assert_eq!(round.round, 9001);
        assert!(round.is_valid());
        assert!(round.is_concluded());
        assert!(round.foods.is_none());
        assert!(round.start.is_some());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_round_missing_file() {
        let err = load_round("/tmp/foodclub_does_not_exist_xyz.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read round data"));
    }
}
