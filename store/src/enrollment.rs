//! Enrollment storage trait.

use crate::StoreError;
use learnopoly_types::{CourseId, Identity};

/// Per-identity enrollment lists, in enrollment order.
pub trait EnrollmentStore {
    /// Course ids the identity enrolled in. Empty if none.
    fn get_enrollments(&self, identity: &Identity) -> Result<Vec<CourseId>, StoreError>;

    /// Every non-empty enrollment list, ordered by identity.
    fn iter_enrollments(&self) -> Result<Vec<(Identity, Vec<CourseId>)>, StoreError>;
}
