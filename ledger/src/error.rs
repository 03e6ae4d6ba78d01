use learnopoly_types::{CourseId, Identity, PostId};
use thiserror::Error;

/// Reasons a ledger operation is rejected.
///
/// Precondition failures display the exact reason strings callers match on
/// (for example "Profile already exists").
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Profile already exists")]
    ProfileAlreadyExists,

    #[error("Profile does not exist")]
    ProfileNotFound,

    #[error("Course does not exist")]
    CourseNotFound(CourseId),

    #[error("Post does not exist")]
    PostNotFound(PostId),

    #[error("Cannot connect with yourself")]
    SelfConnection,

    #[error("caller {caller} is not the administrator")]
    NotAdministrator { caller: Identity },

    #[error("reputation overflow: {current} + {amount} exceeds u64::MAX")]
    ReputationOverflow { current: u64, amount: u64 },

    #[error("{0} counter overflow")]
    CounterOverflow(&'static str),

    #[error("ledger is already initialized")]
    AlreadyInitialized,

    #[error("ledger is not initialized")]
    NotInitialized,

    #[error("unsupported schema version {found}, expected {expected}")]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("invalid snapshot: {0}")]
    SnapshotInvalid(String),

    #[error("storage error: {0}")]
    Storage(#[from] learnopoly_store::StoreError),
}

impl LedgerError {
    /// Whether the caller lacked the privilege for the operation.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAdministrator { .. })
    }

    /// Whether the operation was rejected because of the ledger's current state
    /// or the arguments, as opposed to an authorization or storage failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ProfileAlreadyExists
                | Self::ProfileNotFound
                | Self::CourseNotFound(_)
                | Self::PostNotFound(_)
                | Self::SelfConnection
                | Self::ReputationOverflow { .. }
                | Self::CounterOverflow(_)
        )
    }
}
