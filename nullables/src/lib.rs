//! Nullable infrastructure for deterministic testing.
//!
//! The ledger reaches its storage only through the `learnopoly-store` traits.
//! This crate provides a test-friendly implementation that:
//! - Keeps everything in memory and never touches the filesystem
//! - Is deterministic (ordered maps, dense vectors)
//! - Can be told to fail its next commit, to exercise error paths
//!
//! Usage: swap the LMDB store for a [`NullStore`] in tests.

pub mod store;

pub use store::NullStore;
