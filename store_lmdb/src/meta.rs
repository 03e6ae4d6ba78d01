//! LMDB implementation of MetaStore.

use learnopoly_store::{MetaStore, StoreError};

use crate::{LmdbError, LmdbStore};

impl MetaStore for LmdbStore {
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }
}
