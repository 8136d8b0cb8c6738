//! Port for the durable decision store.
//!
//! The store is the source of truth for mutual-like and reciprocation checks.
//! Listing is keyset-paginated on `(timestamp, actor)` ascending; a page's
//! cursor names its last row and the next page starts strictly after it.

use async_trait::async_trait;
use pagination::{DecisionCursor, Page, PageRequest};

use crate::domain::{Decision, Liker, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by decision store adapters.
    pub enum DecisionRepositoryError {
        /// Store could not be reached or a connection could not be checked out.
        Connection { message: String } =>
            "decision store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "decision store query failed: {message}",
    }
}

/// Durable record of every actor to recipient decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Insert the decision, overwriting `liked` and the timestamp of any
    /// existing row for the same (actor, recipient) pair.
    async fn record(&self, decision: &Decision) -> Result<(), DecisionRepositoryError>;

    /// Whether both `a` and `b` currently like each other.
    ///
    /// Evaluated in a single read that is not isolated from concurrent
    /// writes.
    async fn is_mutual_like(&self, a: &UserId, b: &UserId)
    -> Result<bool, DecisionRepositoryError>;

    /// Users who currently like `recipient`.
    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError>;

    /// Users who like `recipient` and whom `recipient` has not liked back.
    async fn list_new_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError>;

    /// Whether `recipient` has a liked decision on `actor`. A missing row is
    /// `false`.
    async fn has_reciprocated(
        &self,
        recipient: &UserId,
        actor: &UserId,
    ) -> Result<bool, DecisionRepositoryError>;

    /// Number of users who currently like `recipient`.
    async fn count_likers(&self, recipient: &UserId) -> Result<u64, DecisionRepositoryError>;
}
