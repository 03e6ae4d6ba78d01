//! Social feed operations: posts, likes and connections.

use learnopoly_store::{LedgerStore, Post, WriteBatch};
use learnopoly_types::{Identity, PostId};

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::ledger::{rejected, Ledger};

impl<S: LedgerStore> Ledger<S> {
    /// Publish a post authored by the caller and return its id.
    pub fn create_post(&mut self, caller: &Identity, content: &str) -> Result<PostId, LedgerError> {
        let id = PostId::new(self.store.post_count()?);
        let post = Post {
            id,
            author: *caller,
            content: content.to_string(),
            likes: 0,
        };

        let mut batch = WriteBatch::new();
        batch.put_post(post);
        self.apply(
            batch,
            LedgerEvent::PostCreated {
                id,
                author: *caller,
            },
        )?;
        Ok(id)
    }

    /// Add one like to an existing post.
    ///
    /// Who liked is not recorded, so the same caller liking twice counts twice.
    pub fn like_post(&mut self, caller: &Identity, post_id: PostId) -> Result<(), LedgerError> {
        let mut post = self
            .store
            .get_post(post_id)?
            .ok_or_else(|| rejected("like_post", caller, LedgerError::PostNotFound(post_id)))?;

        post.likes = post
            .likes
            .checked_add(1)
            .ok_or_else(|| rejected("like_post", caller, LedgerError::CounterOverflow("like")))?;
        let likes = post.likes;

        let mut batch = WriteBatch::new();
        batch.put_post(post);
        self.apply(
            batch,
            LedgerEvent::PostLiked {
                id: post_id,
                liker: *caller,
                likes,
            },
        )
    }

    /// Connect the caller and `other` in both directions at once.
    pub fn add_connection(&mut self, caller: &Identity, other: &Identity) -> Result<(), LedgerError> {
        if caller == other {
            return Err(rejected("add_connection", caller, LedgerError::SelfConnection));
        }

        let mut batch = WriteBatch::new();
        batch
            .append_connection(caller, other)
            .append_connection(other, caller);
        self.apply(
            batch,
            LedgerEvent::ConnectionAdded {
                from: *caller,
                to: *other,
            },
        )
    }
}
