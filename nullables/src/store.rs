//! Nullable store: thread-safe in-memory storage for testing.

use learnopoly_store::{
    BatchStore, ConnectionStore, Course, CourseStore, EnrollmentStore, MetaStore, Post, PostStore,
    Profile, ProfileStore, StoreError, StoreWrite, WriteBatch,
};
use learnopoly_types::{CourseId, Identity, PostId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Default)]
struct NullState {
    profiles: BTreeMap<Identity, Profile>,
    courses: Vec<Course>,
    posts: Vec<Post>,
    enrollments: BTreeMap<Identity, Vec<CourseId>>,
    connections: BTreeMap<Identity, Vec<Identity>>,
    meta: BTreeMap<String, Vec<u8>>,
}

impl NullState {
    fn apply(&mut self, write: StoreWrite) -> Result<(), StoreError> {
        match write {
            StoreWrite::PutProfile(profile) => {
                self.profiles.insert(profile.owner, profile);
            }
            StoreWrite::PutCourse(course) => {
                put_dense(&mut self.courses, course.id.raw(), course, "course")?;
            }
            StoreWrite::PutPost(post) => {
                put_dense(&mut self.posts, post.id.raw(), post, "post")?;
            }
            StoreWrite::AppendEnrollment { identity, course } => {
                self.enrollments.entry(identity).or_default().push(course);
            }
            StoreWrite::AppendConnection { identity, other } => {
                self.connections.entry(identity).or_default().push(other);
            }
            StoreWrite::PutMeta { key, value } => {
                self.meta.insert(key, value);
            }
        }
        Ok(())
    }
}

/// Overwrite `items[index]`, or push when `index` is the next dense slot.
fn put_dense<T>(items: &mut Vec<T>, index: u64, item: T, what: &str) -> Result<(), StoreError> {
    let len = items.len() as u64;
    if index < len {
        items[index as usize] = item;
        Ok(())
    } else if index == len {
        items.push(item);
        Ok(())
    } else {
        Err(StoreError::Corruption(format!(
            "{what} id {index} would leave a gap after {len} records"
        )))
    }
}

/// An in-memory implementation of every ledger store trait.
///
/// Thread-safe; a commit applies to a copy of the state and swaps it in only
/// once every write succeeded.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<NullState>,
    fail_next_commit: AtomicBool,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next [`BatchStore::commit`] fail with a backend error without
    /// applying anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of successfully applied batches.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn state(&self) -> Result<MutexGuard<'_, NullState>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Backend(format!("null store lock poisoned: {e}")))
    }
}

impl BatchStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            tracing::debug!(writes = batch.len(), "null store rejecting commit");
            return Err(StoreError::Backend("injected commit failure".into()));
        }
        let mut guard = self.state()?;
        let mut next = guard.clone();
        for write in batch.into_writes() {
            next.apply(write)?;
        }
        *guard = next;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl ProfileStore for NullStore {
    fn get_profile(&self, owner: &Identity) -> Result<Option<Profile>, StoreError> {
        Ok(self.state()?.profiles.get(owner).cloned())
    }

    fn profile_count(&self) -> Result<u64, StoreError> {
        Ok(self.state()?.profiles.len() as u64)
    }

    fn iter_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.state()?.profiles.values().cloned().collect())
    }
}

impl CourseStore for NullStore {
    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.state()?.courses.get(id.raw() as usize).cloned())
    }

    fn course_count(&self) -> Result<u64, StoreError> {
        Ok(self.state()?.courses.len() as u64)
    }

    fn iter_courses(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.state()?.courses.clone())
    }
}

impl PostStore for NullStore {
    fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        Ok(self.state()?.posts.get(id.raw() as usize).cloned())
    }

    fn post_count(&self) -> Result<u64, StoreError> {
        Ok(self.state()?.posts.len() as u64)
    }

    fn iter_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.state()?.posts.clone())
    }
}

impl EnrollmentStore for NullStore {
    fn get_enrollments(&self, identity: &Identity) -> Result<Vec<CourseId>, StoreError> {
        Ok(self
            .state()?
            .enrollments
            .get(identity)
            .cloned()
            .unwrap_or_default())
    }

    fn iter_enrollments(&self) -> Result<Vec<(Identity, Vec<CourseId>)>, StoreError> {
        Ok(self
            .state()?
            .enrollments
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }
}

impl ConnectionStore for NullStore {
    fn get_connections(&self, identity: &Identity) -> Result<Vec<Identity>, StoreError> {
        Ok(self
            .state()?
            .connections
            .get(identity)
            .cloned()
            .unwrap_or_default())
    }

    fn iter_connections(&self) -> Result<Vec<(Identity, Vec<Identity>)>, StoreError> {
        Ok(self
            .state()?
            .connections
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }
}

impl MetaStore for NullStore {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state()?.meta.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(b: u8) -> Identity {
        Identity::new([b; 20])
    }

    fn course(raw: u64) -> Course {
        Course {
            id: CourseId::new(raw),
            title: format!("course {raw}"),
            description: String::new(),
            creator: id(1),
            enrollment_count: 0,
            exists: true,
        }
    }

    #[test]
    fn appends_in_one_batch_compose() {
        let store = NullStore::new();
        let mut batch = WriteBatch::new();
        batch
            .append_enrollment(&id(1), CourseId::new(0))
            .append_enrollment(&id(1), CourseId::new(0));
        store.commit(batch).unwrap();

        assert_eq!(
            store.get_enrollments(&id(1)).unwrap(),
            vec![CourseId::new(0), CourseId::new(0)]
        );
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn gap_in_dense_ids_rejects_whole_batch() {
        let store = NullStore::new();
        let mut batch = WriteBatch::new();
        batch.put_course(course(0)).put_course(course(2));

        let err = store.commit(batch).unwrap_err();
        assert!(matches!(err, StoreError::Corruption(_)));
        assert_eq!(store.course_count().unwrap(), 0);
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn put_course_overwrites_existing_slot() {
        let store = NullStore::new();
        let mut batch = WriteBatch::new();
        batch.put_course(course(0));
        store.commit(batch).unwrap();

        let mut updated = course(0);
        updated.enrollment_count = 4;
        let mut batch = WriteBatch::new();
        batch.put_course(updated.clone());
        store.commit(batch).unwrap();

        assert_eq!(store.course_count().unwrap(), 1);
        assert_eq!(store.get_course(CourseId::new(0)).unwrap(), Some(updated));
    }

    #[test]
    fn injected_failure_applies_nothing_once() {
        let store = NullStore::new();
        store.fail_next_commit();

        let mut batch = WriteBatch::new();
        batch.put_meta("k", b"v");
        assert!(store.commit(batch.clone()).is_err());
        assert_eq!(store.get_meta("k").unwrap(), None);

        store.commit(batch).unwrap();
        assert_eq!(store.get_meta("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn missing_lists_read_empty() {
        let store = NullStore::new();
        assert!(store.get_connections(&id(9)).unwrap().is_empty());
        assert!(store.get_enrollments(&id(9)).unwrap().is_empty());
        assert!(store.get_profile(&id(9)).unwrap().is_none());
        assert!(!store.profile_exists(&id(9)).unwrap());
    }
}
