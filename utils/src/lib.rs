//! Shared utilities for the Learnopoly ledger.

pub mod logging;

pub use logging::{init_logging, LogFormat};
