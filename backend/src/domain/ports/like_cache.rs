//! Port for the per-recipient like cache.
//!
//! The cache is a derived, eventually consistent index of current likers,
//! ordered by score. Writes are best effort from the caller's point of view;
//! reads are authoritative for listing and counting only.

use async_trait::async_trait;
use pagination::{Page, PageRequest, ScoreCursor};

use crate::domain::{CachedLike, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by like cache adapters.
    pub enum LikeCacheError {
        /// Cache could not be reached or a connection could not be checked out.
        Connection { message: String } =>
            "like cache connection failed: {message}",
        /// Cache rejected a command or returned an unexpected reply.
        Backend { message: String } =>
            "like cache command failed: {message}",
    }
}

/// Sorted index of likers per recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeCache: Send + Sync {
    /// Add or rescore `like` in `recipient`'s index.
    async fn add_like(&self, recipient: &UserId, like: &CachedLike) -> Result<(), LikeCacheError>;

    /// Remove `actor` from `recipient`'s index. Absent members are not an
    /// error.
    async fn remove_like(&self, recipient: &UserId, actor: &UserId)
    -> Result<(), LikeCacheError>;

    /// Entries with a score strictly above the request cursor, ascending.
    ///
    /// A cursor is returned whenever the page is full, so the page after the
    /// last full page may be empty.
    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<ScoreCursor>,
    ) -> Result<Page<CachedLike, ScoreCursor>, LikeCacheError>;

    /// Number of entries in `recipient`'s index.
    async fn count_likers(&self, recipient: &UserId) -> Result<u64, LikeCacheError>;
}
