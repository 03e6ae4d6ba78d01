//! LMDB storage backend for the Learnopoly ledger.
//!
//! Implements all storage traits from `learnopoly-store` using the `heed` LMDB
//! bindings. Each logical store maps to one LMDB database within a single
//! environment; a [`learnopoly_store::WriteBatch`] is applied inside one LMDB
//! write transaction.

pub mod environment;
pub mod error;
pub mod meta;
pub mod records;
pub mod social;
pub mod write_batch;

pub use environment::LmdbStore;
pub use error::LmdbError;
