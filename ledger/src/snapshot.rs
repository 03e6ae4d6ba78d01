//! Ledger snapshots: capture the complete ledger state at a point in time.
//!
//! A snapshot can be exported from one store and imported into an empty one
//! (backup, migration between backends). The snapshot hash is computed
//! deterministically from the content, so a tampered or truncated snapshot is
//! refused on import.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use learnopoly_store::{
    Course, LedgerStore, Post, Profile, WriteBatch, ADMINISTRATOR_KEY, CURRENT_SCHEMA_VERSION,
    SCHEMA_VERSION_KEY,
};
use learnopoly_types::{CourseId, Identity};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The full state of a ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 over everything below except `created_at`.
    pub hash: [u8; 32],
    pub version: u32,
    /// Unix seconds at export.
    pub created_at: u64,
    pub administrator: Identity,
    /// Ordered by owner.
    pub profiles: Vec<Profile>,
    /// Ordered by id.
    pub courses: Vec<Course>,
    /// Ordered by id.
    pub posts: Vec<Post>,
    /// Ordered by identity.
    pub enrollments: Vec<(Identity, Vec<CourseId>)>,
    /// Ordered by identity.
    pub connections: Vec<(Identity, Vec<Identity>)>,
}

type Hasher = Blake2b<U32>;

fn update_str(hasher: &mut Hasher, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl LedgerSnapshot {
    /// Build a snapshot and stamp its hash.
    pub fn create(
        administrator: Identity,
        profiles: Vec<Profile>,
        courses: Vec<Course>,
        posts: Vec<Post>,
        enrollments: Vec<(Identity, Vec<CourseId>)>,
        connections: Vec<(Identity, Vec<Identity>)>,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at,
            administrator,
            profiles,
            courses,
            posts,
            enrollments,
            connections,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Hasher::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.administrator.as_bytes());

        hasher.update((self.profiles.len() as u64).to_le_bytes());
        for p in &self.profiles {
            hasher.update(p.owner.as_bytes());
            update_str(&mut hasher, &p.username);
            update_str(&mut hasher, &p.bio);
            hasher.update((p.skills.len() as u64).to_le_bytes());
            for skill in &p.skills {
                update_str(&mut hasher, skill);
            }
            hasher.update(p.reputation.to_le_bytes());
            hasher.update([p.exists as u8]);
        }

        hasher.update((self.courses.len() as u64).to_le_bytes());
        for c in &self.courses {
            hasher.update(c.id.raw().to_le_bytes());
            update_str(&mut hasher, &c.title);
            update_str(&mut hasher, &c.description);
            hasher.update(c.creator.as_bytes());
            hasher.update(c.enrollment_count.to_le_bytes());
            hasher.update([c.exists as u8]);
        }

        hasher.update((self.posts.len() as u64).to_le_bytes());
        for p in &self.posts {
            hasher.update(p.id.raw().to_le_bytes());
            hasher.update(p.author.as_bytes());
            update_str(&mut hasher, &p.content);
            hasher.update(p.likes.to_le_bytes());
        }

        hasher.update((self.enrollments.len() as u64).to_le_bytes());
        for (identity, list) in &self.enrollments {
            hasher.update(identity.as_bytes());
            hasher.update((list.len() as u64).to_le_bytes());
            for course in list {
                hasher.update(course.raw().to_le_bytes());
            }
        }

        hasher.update((self.connections.len() as u64).to_le_bytes());
        for (identity, list) in &self.connections {
            hasher.update(identity.as_bytes());
            hasher.update((list.len() as u64).to_le_bytes());
            for other in list {
                hasher.update(other.as_bytes());
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Check the ledger invariants over the captured state.
    ///
    /// Dense ids, enrollment counts matching enrollment lists, enrollments
    /// naming existing courses, and symmetric connections.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (i, c) in self.courses.iter().enumerate() {
            if c.id.raw() != i as u64 {
                return Err(format!("course at position {i} has id {}", c.id));
            }
        }
        for (i, p) in self.posts.iter().enumerate() {
            if p.id.raw() != i as u64 {
                return Err(format!("post at position {i} has id {}", p.id));
            }
        }
        if let Some(p) = self.profiles.iter().find(|p| !p.exists) {
            return Err(format!("profile {} is stored but does not exist", p.owner));
        }

        let mut enrolled = vec![0u64; self.courses.len()];
        for (identity, list) in &self.enrollments {
            for course in list {
                let slot = enrolled.get_mut(course.raw() as usize).ok_or_else(|| {
                    format!("{identity} is enrolled in missing course {course}")
                })?;
                *slot += 1;
            }
        }
        for (c, count) in self.courses.iter().zip(&enrolled) {
            if c.enrollment_count != *count {
                return Err(format!(
                    "course {} counts {} enrollments but {} are recorded",
                    c.id, c.enrollment_count, count
                ));
            }
        }

        let mut edges: BTreeMap<(Identity, Identity), i64> = BTreeMap::new();
        for (identity, list) in &self.connections {
            for other in list {
                *edges.entry((*identity, *other)).or_default() += 1;
                *edges.entry((*other, *identity)).or_default() -= 1;
            }
        }
        if let Some(((a, b), _)) = edges.iter().find(|(_, n)| **n != 0) {
            return Err(format!("connection {a} -> {b} is not mirrored"));
        }
        Ok(())
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::SnapshotInvalid(e.to_string()))
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::SnapshotInvalid(e.to_string()))
    }
}

impl<S: LedgerStore> Ledger<S> {
    /// Capture the complete current state.
    pub fn export_snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let snapshot = LedgerSnapshot::create(
            self.administrator,
            self.store.iter_profiles()?,
            self.store.iter_courses()?,
            self.store.iter_posts()?,
            self.store.iter_enrollments()?,
            self.store.iter_connections()?,
        );
        tracing::info!(
            profiles = snapshot.profiles.len(),
            courses = snapshot.courses.len(),
            posts = snapshot.posts.len(),
            "exported ledger snapshot"
        );
        Ok(snapshot)
    }

    /// Restore a snapshot into an uninitialised store, in one batch.
    pub fn import_snapshot(store: S, snapshot: &LedgerSnapshot) -> Result<Self, LedgerError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::SnapshotInvalid(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if !snapshot.verify() {
            return Err(LedgerError::SnapshotInvalid("hash mismatch".into()));
        }
        snapshot
            .check_invariants()
            .map_err(LedgerError::SnapshotInvalid)?;
        if store.get_administrator()?.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }

        let mut batch = WriteBatch::new();
        batch
            .put_meta(ADMINISTRATOR_KEY, snapshot.administrator.as_bytes())
            .put_meta(SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION.to_le_bytes());
        for profile in &snapshot.profiles {
            batch.put_profile(profile.clone());
        }
        for course in &snapshot.courses {
            batch.put_course(course.clone());
        }
        for post in &snapshot.posts {
            batch.put_post(post.clone());
        }
        for (identity, list) in &snapshot.enrollments {
            for course in list {
                batch.append_enrollment(identity, *course);
            }
        }
        for (identity, list) in &snapshot.connections {
            for other in list {
                batch.append_connection(identity, other);
            }
        }
        store.commit(batch)?;

        tracing::info!(administrator = %snapshot.administrator, "imported ledger snapshot");
        Ok(Self::with_administrator(store, snapshot.administrator))
    }
}
