//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::LmdbError;

/// Number of named databases the store opens.
const MAX_DBS: u32 = 6;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
///
/// Key layouts:
/// - `profiles`, `enrollments`, `connections`: 20 raw identity bytes
/// - `courses`, `posts`: big-endian `u64` id
/// - `meta`: UTF-8 key
///
/// Values are bincode-encoded records.
pub struct LmdbStore {
    pub(crate) env: Env,
    pub(crate) profiles_db: Database<Bytes, Bytes>,
    pub(crate) courses_db: Database<Bytes, Bytes>,
    pub(crate) posts_db: Database<Bytes, Bytes>,
    pub(crate) enrollments_db: Database<Bytes, Bytes>,
    pub(crate) connections_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per directory by this process
        // and the map is never truncated while open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let profiles_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("profiles"))?;
        let courses_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("courses"))?;
        let posts_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("posts"))?;
        let enrollments_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("enrollments"))?;
        let connections_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("connections"))?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB store");

        Ok(Self {
            env,
            profiles_db,
            courses_db,
            posts_db,
            enrollments_db,
            connections_db,
            meta_db,
        })
    }

    /// Read and decode a single value.
    pub(crate) fn get_decoded<T: DeserializeOwned>(
        &self,
        txn: &RoTxn,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        match db.get(txn, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Decode every value of a database, in key order.
    pub(crate) fn iter_decoded<T: DeserializeOwned>(
        &self,
        txn: &RoTxn,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<(Vec<u8>, T)>, LmdbError> {
        let mut out = Vec::new();
        for entry in db.iter(txn)? {
            let (key, bytes) = entry?;
            out.push((key.to_vec(), bincode::deserialize(bytes)?));
        }
        Ok(out)
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}
