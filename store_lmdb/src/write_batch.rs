//! Write batching: applies a [`WriteBatch`] inside a single LMDB write
//! transaction.
//!
//! If any write fails the transaction is dropped without committing, so the
//! environment is left exactly as it was before the batch.

use heed::types::Bytes;
use heed::{Database, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use learnopoly_store::{BatchStore, StoreError, StoreWrite, WriteBatch};

use crate::environment::encode;
use crate::{LmdbError, LmdbStore};

impl LmdbStore {
    fn apply(&self, wtxn: &mut RwTxn<'_>, write: StoreWrite) -> Result<(), LmdbError> {
        match write {
            StoreWrite::PutProfile(profile) => {
                self.profiles_db
                    .put(wtxn, profile.owner.as_bytes(), &encode(&profile)?)?;
            }
            StoreWrite::PutCourse(course) => {
                let bytes = encode(&course)?;
                put_dense(wtxn, self.courses_db, course.id.raw(), &bytes, "course")?;
            }
            StoreWrite::PutPost(post) => {
                let bytes = encode(&post)?;
                put_dense(wtxn, self.posts_db, post.id.raw(), &bytes, "post")?;
            }
            StoreWrite::AppendEnrollment { identity, course } => {
                append(wtxn, self.enrollments_db, identity.as_bytes(), course)?;
            }
            StoreWrite::AppendConnection { identity, other } => {
                append(wtxn, self.connections_db, identity.as_bytes(), other)?;
            }
            StoreWrite::PutMeta { key, value } => {
                self.meta_db.put(wtxn, key.as_bytes(), &value)?;
            }
        }
        Ok(())
    }
}

/// Overwrite the record at `index`, or add it when `index` is the next dense slot.
fn put_dense(
    wtxn: &mut RwTxn<'_>,
    db: Database<Bytes, Bytes>,
    index: u64,
    bytes: &[u8],
    what: &str,
) -> Result<(), LmdbError> {
    let len = db.len(&**wtxn)?;
    if index > len {
        return Err(LmdbError::Corruption(format!(
            "{what} id {index} would leave a gap after {len} records"
        )));
    }
    db.put(wtxn, &index.to_be_bytes(), bytes)?;
    Ok(())
}

/// Read-modify-write of a list value; sees earlier writes of the same transaction.
fn append<T: Serialize + DeserializeOwned>(
    wtxn: &mut RwTxn<'_>,
    db: Database<Bytes, Bytes>,
    key: &[u8],
    item: T,
) -> Result<(), LmdbError> {
    let mut list: Vec<T> = match db.get(&**wtxn, key)? {
        Some(bytes) => bincode::deserialize(bytes)?,
        None => Vec::new(),
    };
    list.push(item);
    db.put(wtxn, key, &encode(&list)?)?;
    Ok(())
}

impl BatchStore for LmdbStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let writes = batch.len();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for write in batch.into_writes() {
            self.apply(&mut wtxn, write)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(writes, "committed write batch");
        Ok(())
    }
}
