//! Food Club outcome probability and payout engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod codec;
pub mod probability;
pub mod valuation;
pub mod payout;
pub mod generators;
pub mod engine;
pub mod storage;
