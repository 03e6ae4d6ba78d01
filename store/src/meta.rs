//! Metadata storage trait.

use crate::StoreError;
use learnopoly_types::Identity;

/// Key under which the administrator identity is recorded at ledger creation.
pub const ADMINISTRATOR_KEY: &str = "administrator";

pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Current on-disk layout version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Trait for reading ledger metadata (administrator, schema version).
///
/// Metadata is written through [`crate::WriteBatch::put_meta`] like every
/// other record.
pub trait MetaStore {
    /// Retrieve a metadata value, if set.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// The administrator recorded at creation, if the store was initialised.
    fn get_administrator(&self) -> Result<Option<Identity>, StoreError> {
        match self.get_meta(ADMINISTRATOR_KEY)? {
            Some(bytes) => Identity::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Corruption(e.to_string())),
            None => Ok(None),
        }
    }

    /// The schema version, if the store was initialised.
    fn get_schema_version(&self) -> Result<Option<u32>, StoreError> {
        match self.get_meta(SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!(
                        "schema version must be 4 bytes, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(Some(u32::from_le_bytes(arr)))
            }
            None => Ok(None),
        }
    }
}
