//! Profile operations: create, update, and administrator-only reputation.

use learnopoly_store::{LedgerStore, Profile, WriteBatch};
use learnopoly_types::Identity;

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::ledger::{rejected, Ledger};

impl<S: LedgerStore> Ledger<S> {
    /// Create the caller's profile with zero reputation.
    ///
    /// Fails with [`LedgerError::ProfileAlreadyExists`] if the caller already
    /// has one; the stored profile keeps the first call's values.
    pub fn create_profile(
        &mut self,
        caller: &Identity,
        username: &str,
        bio: &str,
        skills: Vec<String>,
    ) -> Result<(), LedgerError> {
        if self.store.profile_exists(caller)? {
            return Err(rejected("create_profile", caller, LedgerError::ProfileAlreadyExists));
        }

        let profile = Profile {
            owner: *caller,
            username: username.to_string(),
            bio: bio.to_string(),
            skills,
            reputation: 0,
            exists: true,
        };
        let mut batch = WriteBatch::new();
        batch.put_profile(profile);
        self.apply(
            batch,
            LedgerEvent::ProfileCreated {
                owner: *caller,
                username: username.to_string(),
            },
        )
    }

    /// Overwrite the caller's username, bio and skills. Reputation is kept.
    pub fn update_profile(
        &mut self,
        caller: &Identity,
        username: &str,
        bio: &str,
        skills: Vec<String>,
    ) -> Result<(), LedgerError> {
        let mut profile = self
            .existing_profile(caller)?
            .ok_or_else(|| rejected("update_profile", caller, LedgerError::ProfileNotFound))?;

        profile.username = username.to_string();
        profile.bio = bio.to_string();
        profile.skills = skills;

        let mut batch = WriteBatch::new();
        batch.put_profile(profile);
        self.apply(batch, LedgerEvent::ProfileUpdated { owner: *caller })
    }

    /// Add `amount` to `target`'s reputation. Administrator only.
    ///
    /// The target must have a profile; overflow past `u64::MAX` is rejected
    /// rather than wrapped.
    pub fn increase_reputation(
        &mut self,
        caller: &Identity,
        target: &Identity,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if caller != &self.administrator {
            return Err(rejected(
                "increase_reputation",
                caller,
                LedgerError::NotAdministrator { caller: *caller },
            ));
        }
        let mut profile = self
            .existing_profile(target)?
            .ok_or_else(|| rejected("increase_reputation", caller, LedgerError::ProfileNotFound))?;

        let current = profile.reputation;
        profile.reputation = current.checked_add(amount).ok_or_else(|| {
            rejected(
                "increase_reputation",
                caller,
                LedgerError::ReputationOverflow { current, amount },
            )
        })?;
        let reputation = profile.reputation;

        let mut batch = WriteBatch::new();
        batch.put_profile(profile);
        self.apply(
            batch,
            LedgerEvent::ReputationIncreased {
                target: *target,
                amount,
                reputation,
            },
        )
    }

    fn existing_profile(&self, owner: &Identity) -> Result<Option<Profile>, LedgerError> {
        Ok(self.store.get_profile(owner)?.filter(|p| p.exists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnopoly_nullables::NullStore;

    fn admin() -> Identity {
        Identity::new([0xAD; 20])
    }

    fn user1() -> Identity {
        Identity::new([0x01; 20])
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ledger() -> Ledger<NullStore> {
        Ledger::create(NullStore::new(), admin()).unwrap()
    }

    #[test]
    fn create_profile_stores_fields() {
        let mut ledger = ledger();
        ledger
            .create_profile(&user1(), "testuser", "Test bio", skills(&["JavaScript", "Solidity"]))
            .unwrap();

        let profile = ledger.profile(&user1()).unwrap();
        assert_eq!(profile.username, "testuser");
        assert_eq!(profile.bio, "Test bio");
        assert_eq!(profile.skills, skills(&["JavaScript", "Solidity"]));
        assert_eq!(profile.reputation, 0);
        assert!(profile.exists);
    }

    #[test]
    fn duplicate_profile_is_rejected_and_first_values_kept() {
        let mut ledger = ledger();
        ledger
            .create_profile(&user1(), "user1", "Bio 1", skills(&["Skill1"]))
            .unwrap();

        let err = ledger
            .create_profile(&user1(), "user1_new", "New bio", skills(&["Skill2"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Profile already exists");
        assert!(err.is_precondition());

        let profile = ledger.profile(&user1()).unwrap();
        assert_eq!(profile.username, "user1");
        assert_eq!(profile.bio, "Bio 1");
        assert_eq!(profile.skills, skills(&["Skill1"]));
    }

    #[test]
    fn update_profile_overwrites_fields() {
        let mut ledger = ledger();
        ledger
            .create_profile(&user1(), "initial", "Initial bio", skills(&["Skill1"]))
            .unwrap();
        ledger
            .update_profile(&user1(), "updated", "Updated bio", skills(&["Skill1", "Skill2", "Skill3"]))
            .unwrap();

        let profile = ledger.profile(&user1()).unwrap();
        assert_eq!(profile.username, "updated");
        assert_eq!(profile.bio, "Updated bio");
        assert_eq!(profile.skills.len(), 3);
        assert!(profile.exists);
    }

    #[test]
    fn update_keeps_reputation() {
        let mut ledger = ledger();
        ledger.create_profile(&user1(), "u", "b", vec![]).unwrap();
        ledger.increase_reputation(&admin(), &user1(), 5).unwrap();
        ledger.update_profile(&user1(), "u2", "b2", vec![]).unwrap();

        assert_eq!(ledger.profile(&user1()).unwrap().reputation, 5);
    }

    #[test]
    fn update_without_profile_fails() {
        let mut ledger = ledger();
        let err = ledger.update_profile(&user1(), "x", "y", vec![]).unwrap_err();
        assert!(matches!(err, LedgerError::ProfileNotFound));
        assert!(!ledger.profile(&user1()).unwrap().exists);
    }

    #[test]
    fn administrator_increases_reputation() {
        let mut ledger = ledger();
        ledger.create_profile(&user1(), "user1", "Bio 1", skills(&["Skill1"])).unwrap();
        ledger.increase_reputation(&admin(), &user1(), 10).unwrap();
        assert_eq!(ledger.profile(&user1()).unwrap().reputation, 10);

        ledger.increase_reputation(&admin(), &user1(), 7).unwrap();
        assert_eq!(ledger.profile(&user1()).unwrap().reputation, 17);
    }

    #[test]
    fn non_administrator_cannot_increase_reputation() {
        let mut ledger = ledger();
        ledger.create_profile(&user1(), "user1", "Bio 1", vec![]).unwrap();

        let err = ledger.increase_reputation(&user1(), &user1(), 10).unwrap_err();
        assert!(err.is_authorization());
        assert_eq!(ledger.profile(&user1()).unwrap().reputation, 0);
    }

    #[test]
    fn reputation_requires_target_profile() {
        let mut ledger = ledger();
        let err = ledger.increase_reputation(&admin(), &user1(), 10).unwrap_err();
        assert!(matches!(err, LedgerError::ProfileNotFound));
    }

    #[test]
    fn reputation_overflow_is_rejected() {
        let mut ledger = ledger();
        ledger.create_profile(&user1(), "u", "b", vec![]).unwrap();
        ledger.increase_reputation(&admin(), &user1(), u64::MAX).unwrap();

        let err = ledger.increase_reputation(&admin(), &user1(), 1).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ReputationOverflow { current: u64::MAX, amount: 1 }
        ));
        assert_eq!(ledger.profile(&user1()).unwrap().reputation, u64::MAX);
    }
}
