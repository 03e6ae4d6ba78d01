//! Abstract storage traits for the Learnopoly ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger depends only on the traits.
//!
//! Reads go through one trait per logical store. Writes never go through the
//! read traits: a ledger operation collects its writes into a [`WriteBatch`]
//! and hands it to [`BatchStore::commit`], which applies all of them or none.

pub mod batch;
pub mod connection;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod meta;
pub mod post;
pub mod profile;

pub use batch::{BatchStore, StoreWrite, WriteBatch};
pub use connection::ConnectionStore;
pub use course::{Course, CourseStore};
pub use enrollment::EnrollmentStore;
pub use error::StoreError;
pub use meta::{MetaStore, ADMINISTRATOR_KEY, CURRENT_SCHEMA_VERSION, SCHEMA_VERSION_KEY};
pub use post::{Post, PostStore};
pub use profile::{Profile, ProfileStore};

/// Everything the ledger needs from a backend.
pub trait LedgerStore:
    ProfileStore + CourseStore + PostStore + EnrollmentStore + ConnectionStore + MetaStore + BatchStore
{
}

impl<T> LedgerStore for T where
    T: ProfileStore
        + CourseStore
        + PostStore
        + EnrollmentStore
        + ConnectionStore
        + MetaStore
        + BatchStore
{
}
