//! Fundamental types for the Learnopoly ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller identities, dense record ids, and the common error type.

pub mod error;
pub mod identity;
pub mod ids;

pub use error::LearnopolyError;
pub use identity::Identity;
pub use ids::{CourseId, PostId};
