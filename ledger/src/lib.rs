//! Social-learning ledger.
//!
//! A deterministic, single-writer state machine holding profiles, courses,
//! enrollments, posts, likes and connections. Every mutating operation takes
//! the caller identity explicitly, validates against current state, and then
//! commits all of its writes as one batch: it either succeeds entirely or
//! fails with no effect.
//!
//! Only the administrator recorded at creation may raise reputation.

pub mod courses;
pub mod error;
pub mod event;
pub mod feed;
pub mod ledger;
pub mod profiles;
pub mod snapshot;

pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent};
pub use ledger::{Ledger, LedgerSummary};
pub use snapshot::LedgerSnapshot;
