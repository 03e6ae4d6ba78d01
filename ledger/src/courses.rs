//! Course operations: creation and enrollment.

use learnopoly_store::{Course, LedgerStore, WriteBatch};
use learnopoly_types::{CourseId, Identity};

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::ledger::{rejected, Ledger};

impl<S: LedgerStore> Ledger<S> {
    /// Create a course owned by the caller and return its id.
    ///
    /// Ids are dense and 0-based: the N-th course created, by anyone, gets
    /// id N-1. The caller does not need a profile.
    pub fn create_course(
        &mut self,
        caller: &Identity,
        title: &str,
        description: &str,
    ) -> Result<CourseId, LedgerError> {
        let id = CourseId::new(self.store.course_count()?);
        let course = Course {
            id,
            title: title.to_string(),
            description: description.to_string(),
            creator: *caller,
            enrollment_count: 0,
            exists: true,
        };

        let mut batch = WriteBatch::new();
        batch.put_course(course);
        self.apply(
            batch,
            LedgerEvent::CourseCreated {
                id,
                creator: *caller,
            },
        )?;
        Ok(id)
    }

    /// Enroll the caller in an existing course.
    ///
    /// Appends to the caller's enrollment list and bumps the course's
    /// enrollment count in the same batch. Repeat enrollments are recorded
    /// again, each one counted.
    pub fn enroll_in_course(
        &mut self,
        caller: &Identity,
        course_id: CourseId,
    ) -> Result<(), LedgerError> {
        let mut course = self
            .store
            .get_course(course_id)?
            .filter(|c| c.exists)
            .ok_or_else(|| {
                rejected("enroll_in_course", caller, LedgerError::CourseNotFound(course_id))
            })?;

        course.enrollment_count = course.enrollment_count.checked_add(1).ok_or_else(|| {
            rejected(
                "enroll_in_course",
                caller,
                LedgerError::CounterOverflow("enrollment"),
            )
        })?;
        let enrollment_count = course.enrollment_count;

        let mut batch = WriteBatch::new();
        batch.append_enrollment(caller, course_id).put_course(course);
        self.apply(
            batch,
            LedgerEvent::Enrolled {
                student: *caller,
                course: course_id,
                enrollment_count,
            },
        )
    }
}
