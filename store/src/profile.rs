//! Profile storage trait.

use crate::StoreError;
use learnopoly_types::Identity;
use serde::{Deserialize, Serialize};

/// A user profile, one per identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub owner: Identity,
    pub username: String,
    pub bio: String,
    /// Replaced wholesale on update.
    pub skills: Vec<String>,
    /// Only ever increased, and only by the administrator.
    pub reputation: u64,
    /// Distinguishes "never created" from "created with defaults". Never reverts.
    pub exists: bool,
}

impl Profile {
    /// The value read for an identity that never created a profile.
    pub fn empty(owner: Identity) -> Self {
        Self {
            owner,
            username: String::new(),
            bio: String::new(),
            skills: Vec::new(),
            reputation: 0,
            exists: false,
        }
    }
}

/// Trait for profile storage reads.
pub trait ProfileStore {
    /// Get the stored profile for an identity, if one was ever created.
    fn get_profile(&self, owner: &Identity) -> Result<Option<Profile>, StoreError>;

    fn profile_exists(&self, owner: &Identity) -> Result<bool, StoreError> {
        Ok(self.get_profile(owner)?.is_some_and(|p| p.exists))
    }

    fn profile_count(&self) -> Result<u64, StoreError>;

    /// All stored profiles, ordered by owner.
    fn iter_profiles(&self) -> Result<Vec<Profile>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_does_not_exist() {
        let owner = Identity::new([3; 20]);
        let p = Profile::empty(owner);
        assert_eq!(p.owner, owner);
        assert!(!p.exists);
        assert_eq!(p.reputation, 0);
        assert!(p.skills.is_empty());
    }
}
