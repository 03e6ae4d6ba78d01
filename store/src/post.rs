//! Post storage trait.

use crate::StoreError;
use learnopoly_types::{Identity, PostId};
use serde::{Deserialize, Serialize};

/// A post in the social feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: Identity,
    pub content: String,
    pub likes: u64,
}

/// Trait for post storage reads. Post ids are dense, like course ids.
pub trait PostStore {
    fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;
    fn post_count(&self) -> Result<u64, StoreError>;
    fn iter_posts(&self) -> Result<Vec<Post>, StoreError>;
}
