//! End-to-end tests over the public API with a fixture round.

mod engine;
mod generators;
mod payout;

use foodclub::storage;
use foodclub::types::RoundData;

pub fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture_round() -> RoundData {
    storage::load_round(&fixture_path("round.json")).unwrap()
}
