//! LMDB implementations of ProfileStore, CourseStore and PostStore.

use learnopoly_store::{Course, CourseStore, Post, PostStore, Profile, ProfileStore, StoreError};
use learnopoly_types::{CourseId, Identity, PostId};

use crate::{LmdbError, LmdbStore};

impl ProfileStore for LmdbStore {
    fn get_profile(&self, owner: &Identity) -> Result<Option<Profile>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.get_decoded(&rtxn, self.profiles_db, owner.as_bytes())?)
    }

    fn profile_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.profiles_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entries = self.iter_decoded::<Profile>(&rtxn, self.profiles_db)?;
        Ok(entries.into_iter().map(|(_, p)| p).collect())
    }
}

impl CourseStore for LmdbStore {
    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.get_decoded(&rtxn, self.courses_db, &id.to_key())?)
    }

    fn course_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.courses_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_courses(&self) -> Result<Vec<Course>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entries = self.iter_decoded::<Course>(&rtxn, self.courses_db)?;
        Ok(entries.into_iter().map(|(_, c)| c).collect())
    }
}

impl PostStore for LmdbStore {
    fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.get_decoded(&rtxn, self.posts_db, &id.to_key())?)
    }

    fn post_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.posts_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entries = self.iter_decoded::<Post>(&rtxn, self.posts_db)?;
        Ok(entries.into_iter().map(|(_, p)| p).collect())
    }
}
