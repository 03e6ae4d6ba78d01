//! The ledger handle: construction, record reads, and the commit path shared
//! by every mutating operation.

use learnopoly_store::{
    Course, LedgerStore, Post, Profile, WriteBatch, ADMINISTRATOR_KEY, CURRENT_SCHEMA_VERSION,
    SCHEMA_VERSION_KEY,
};
use learnopoly_types::{CourseId, Identity, PostId};
use serde::Serialize;

use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};

/// The social-learning ledger over a storage backend `S`.
///
/// Mutating operations take `&mut self`, so a handle has exactly one writer.
/// Operations live in [`crate::profiles`], [`crate::courses`] and
/// [`crate::feed`].
pub struct Ledger<S: LedgerStore> {
    pub(crate) store: S,
    pub(crate) administrator: Identity,
    pub(crate) events: EventBus,
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub administrator: Identity,
    pub profiles: u64,
    pub courses: u64,
    pub posts: u64,
}

impl<S: LedgerStore> Ledger<S> {
    /// Initialise a fresh store, recording `administrator` as the only identity
    /// allowed to raise reputation.
    pub fn create(store: S, administrator: Identity) -> Result<Self, LedgerError> {
        if store.get_administrator()?.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        let mut batch = WriteBatch::new();
        batch
            .put_meta(ADMINISTRATOR_KEY, administrator.as_bytes())
            .put_meta(SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION.to_le_bytes());
        store.commit(batch)?;

        tracing::info!(%administrator, "created ledger");
        Ok(Self::with_administrator(store, administrator))
    }

    /// Reopen a store initialised by [`Ledger::create`].
    pub fn open(store: S) -> Result<Self, LedgerError> {
        let administrator = store
            .get_administrator()?
            .ok_or(LedgerError::NotInitialized)?;
        match store.get_schema_version()? {
            Some(CURRENT_SCHEMA_VERSION) => {}
            Some(found) => {
                return Err(LedgerError::UnsupportedSchema {
                    found,
                    expected: CURRENT_SCHEMA_VERSION,
                })
            }
            None => return Err(LedgerError::NotInitialized),
        }

        tracing::debug!(%administrator, "opened ledger");
        Ok(Self::with_administrator(store, administrator))
    }

    /// Open the store if it is initialised, otherwise create it.
    ///
    /// An existing store keeps the administrator it was created with.
    pub fn open_or_create(store: S, administrator: Identity) -> Result<Self, LedgerError> {
        match store.get_administrator()? {
            Some(existing) => {
                if existing != administrator {
                    tracing::warn!(
                        recorded = %existing,
                        requested = %administrator,
                        "ledger already has a different administrator; keeping the recorded one"
                    );
                }
                Self::open(store)
            }
            None => Self::create(store, administrator),
        }
    }

    pub(crate) fn with_administrator(store: S, administrator: Identity) -> Self {
        Self {
            store,
            administrator,
            events: EventBus::new(),
        }
    }

    /// Register a listener invoked after every successful mutation.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// The identity allowed to call [`Ledger::increase_reputation`].
    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Commit the batch, then notify listeners. Nothing is emitted if the
    /// commit fails.
    pub(crate) fn apply(&mut self, batch: WriteBatch, event: LedgerEvent) -> Result<(), LedgerError> {
        self.store.commit(batch)?;
        tracing::debug!(?event, "applied ledger operation");
        self.events.emit(&event);
        Ok(())
    }

    // ── Record reads ────────────────────────────────────────────────────

    /// The profile of `owner`. An identity that never created one reads as
    /// [`Profile::empty`], with `exists == false`.
    pub fn profile(&self, owner: &Identity) -> Result<Profile, LedgerError> {
        Ok(self
            .store
            .get_profile(owner)?
            .unwrap_or_else(|| Profile::empty(*owner)))
    }

    pub fn course(&self, id: CourseId) -> Result<Option<Course>, LedgerError> {
        Ok(self.store.get_course(id)?)
    }

    pub fn post(&self, id: PostId) -> Result<Option<Post>, LedgerError> {
        Ok(self.store.get_post(id)?)
    }

    /// Number of courses created so far; also the id the next course gets.
    pub fn course_count(&self) -> Result<u64, LedgerError> {
        Ok(self.store.course_count()?)
    }

    pub fn post_count(&self) -> Result<u64, LedgerError> {
        Ok(self.store.post_count()?)
    }

    /// Course ids `identity` enrolled in, in enrollment order.
    pub fn user_enrollments(&self, identity: &Identity) -> Result<Vec<CourseId>, LedgerError> {
        Ok(self.store.get_enrollments(identity)?)
    }

    /// Identities connected to `identity`, in connection order.
    pub fn user_connections(&self, identity: &Identity) -> Result<Vec<Identity>, LedgerError> {
        Ok(self.store.get_connections(identity)?)
    }

    pub fn summary(&self) -> Result<LedgerSummary, LedgerError> {
        Ok(LedgerSummary {
            administrator: self.administrator,
            profiles: self.store.profile_count()?,
            courses: self.store.course_count()?,
            posts: self.store.post_count()?,
        })
    }
}

/// Log a rejected operation and hand the error back.
pub(crate) fn rejected(op: &'static str, caller: &Identity, err: LedgerError) -> LedgerError {
    tracing::warn!(op, %caller, reason = %err, "ledger operation rejected");
    err
}
