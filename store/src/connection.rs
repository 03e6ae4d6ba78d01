//! Connection (social graph) storage trait.

use crate::StoreError;
use learnopoly_types::Identity;

/// Adjacency lists of the social graph.
pub trait ConnectionStore {
    /// Identities connected to `identity`, in connection order. Empty if none.
    fn get_connections(&self, identity: &Identity) -> Result<Vec<Identity>, StoreError>;

    /// Every non-empty adjacency list, ordered by identity.
    fn iter_connections(&self) -> Result<Vec<(Identity, Vec<Identity>)>, StoreError>;
}
