//! Course storage trait.

use crate::StoreError;
use learnopoly_types::{CourseId, Identity};
use serde::{Deserialize, Serialize};

/// A course. Title and description are fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub creator: Identity,
    /// One increment per successful enrollment.
    pub enrollment_count: u64,
    pub exists: bool,
}

/// Trait for course storage reads.
///
/// Course ids are dense, so `course_count` is also the next id to assign.
pub trait CourseStore {
    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;
    fn course_count(&self) -> Result<u64, StoreError>;

    /// All courses in id order.
    fn iter_courses(&self) -> Result<Vec<Course>, StoreError>;
}
