//! Write batching: groups every store write of one ledger operation so the
//! backend can apply them as a single all-or-nothing unit.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.append_connection(&a, &b);
//! batch.append_connection(&b, &a);
//! store.commit(batch)?;
//! ```
//!
//! Writes are applied in insertion order; a later write in the same batch
//! observes the effect of an earlier one (two appends to one list both land).

use learnopoly_types::{CourseId, Identity};

use crate::{Course, Post, Profile, StoreError};

/// A single pending store write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreWrite {
    /// Insert or overwrite the profile keyed by `profile.owner`.
    PutProfile(Profile),
    /// Insert or overwrite the course keyed by `course.id`.
    PutCourse(Course),
    /// Insert or overwrite the post keyed by `post.id`.
    PutPost(Post),
    /// Append `course` to `identity`'s enrollment list.
    AppendEnrollment { identity: Identity, course: CourseId },
    /// Append `other` to `identity`'s connection list.
    AppendConnection { identity: Identity, other: Identity },
    PutMeta { key: String, value: Vec<u8> },
}

/// An ordered set of writes to commit atomically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<StoreWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_profile(&mut self, profile: Profile) -> &mut Self {
        self.writes.push(StoreWrite::PutProfile(profile));
        self
    }

    pub fn put_course(&mut self, course: Course) -> &mut Self {
        self.writes.push(StoreWrite::PutCourse(course));
        self
    }

    pub fn put_post(&mut self, post: Post) -> &mut Self {
        self.writes.push(StoreWrite::PutPost(post));
        self
    }

    pub fn append_enrollment(&mut self, identity: &Identity, course: CourseId) -> &mut Self {
        self.writes.push(StoreWrite::AppendEnrollment {
            identity: *identity,
            course,
        });
        self
    }

    pub fn append_connection(&mut self, identity: &Identity, other: &Identity) -> &mut Self {
        self.writes.push(StoreWrite::AppendConnection {
            identity: *identity,
            other: *other,
        });
        self
    }

    pub fn put_meta(&mut self, key: &str, value: &[u8]) -> &mut Self {
        self.writes.push(StoreWrite::PutMeta {
            key: key.to_string(),
            value: value.to_vec(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<StoreWrite> {
        self.writes
    }
}

/// Trait for backends that can apply a [`WriteBatch`] atomically.
pub trait BatchStore {
    /// Apply every write in `batch`, or none of them if an error is returned.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
