//! LMDB implementations of EnrollmentStore and ConnectionStore.
//!
//! Both are adjacency lists keyed by identity, stored as one bincode
//! `Vec` per identity.

use learnopoly_store::{ConnectionStore, EnrollmentStore, StoreError};
use learnopoly_types::{CourseId, Identity};

use crate::{LmdbError, LmdbStore};

fn decode_key(key: &[u8]) -> Result<Identity, LmdbError> {
    Identity::from_slice(key).map_err(|e| LmdbError::Corruption(e.to_string()))
}

impl EnrollmentStore for LmdbStore {
    fn get_enrollments(&self, identity: &Identity) -> Result<Vec<CourseId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .get_decoded::<Vec<CourseId>>(&rtxn, self.enrollments_db, identity.as_bytes())?
            .unwrap_or_default())
    }

    fn iter_enrollments(&self) -> Result<Vec<(Identity, Vec<CourseId>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for (key, list) in self.iter_decoded::<Vec<CourseId>>(&rtxn, self.enrollments_db)? {
            out.push((decode_key(&key)?, list));
        }
        Ok(out)
    }
}

impl ConnectionStore for LmdbStore {
    fn get_connections(&self, identity: &Identity) -> Result<Vec<Identity>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .get_decoded::<Vec<Identity>>(&rtxn, self.connections_db, identity.as_bytes())?
            .unwrap_or_default())
    }

    fn iter_connections(&self) -> Result<Vec<(Identity, Vec<Identity>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for (key, list) in self.iter_decoded::<Vec<Identity>>(&rtxn, self.connections_db)? {
            out.push((decode_key(&key)?, list));
        }
        Ok(out)
    }
}
