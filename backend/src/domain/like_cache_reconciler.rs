//! Rebuild a recipient's like-cache index from the decision store.
//!
//! Cache writes during decision recording are best effort, so the cache can
//! drift. Reconciliation is operator-invoked: it reads the authoritative
//! likers, drops cached members the store no longer backs, and rewrites every
//! authoritative liker with its durable timestamp.
//!
//! A liker can record a pass after the store was read. Each liker's decision
//! is therefore re-read just before it is written back, and retracted likes
//! are skipped. The re-read and the cache write are still two steps, so a pass
//! landing between them can be undone; a rerun repairs it.

use std::collections::HashSet;
use std::sync::Arc;

use pagination::{PageRequest, PageSize};
use tracing::{debug, info};

use crate::domain::explore_service::{map_cache_error, map_repository_error};
use crate::domain::ports::{DecisionRepository, LikeCache};
use crate::domain::{CachedLike, Error, Liker, UserId};

/// Outcome of reconciling one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Authoritative likers written to the cache.
    pub added: usize,
    /// Stale cache members removed.
    pub removed: usize,
    /// Likers retracted in the store while the reconciler was running.
    pub retracted: usize,
}

/// Repairs like-cache drift for individual recipients.
#[derive(Clone)]
pub struct LikeCacheReconciler<R, C> {
    decisions: Arc<R>,
    cache: Arc<C>,
    page_size: PageSize,
}

impl<R, C> LikeCacheReconciler<R, C>
where
    R: DecisionRepository,
    C: LikeCache,
{
    /// Create a reconciler reading both stores `page_size` entries at a time.
    pub fn new(decisions: Arc<R>, cache: Arc<C>, page_size: PageSize) -> Self {
        Self {
            decisions,
            cache,
            page_size,
        }
    }

    /// Bring `recipient`'s cache index in line with the decision store.
    ///
    /// # Errors
    ///
    /// Fails on the first store or cache error; entries already written stay
    /// written, and a rerun completes the repair.
    pub async fn reconcile(&self, recipient: &UserId) -> Result<ReconcileReport, Error> {
        let likers = self.authoritative_likers(recipient).await?;
        let cached = self.cached_members(recipient).await?;

        let authoritative: HashSet<&UserId> = likers.iter().map(Liker::actor_id).collect();
        let mut report = ReconcileReport::default();

        for stale in cached.iter().filter(|member| !authoritative.contains(member)) {
            self.cache
                .remove_like(recipient, stale)
                .await
                .map_err(map_cache_error)?;
            report.removed += 1;
        }

        for liker in &likers {
            if !self.still_likes(liker.actor_id(), recipient).await? {
                debug!(%recipient, actor = %liker.actor_id(), "like retracted during reconcile");
                report.retracted += 1;
                continue;
            }
            self.cache
                .add_like(recipient, &CachedLike::from_liker(liker))
                .await
                .map_err(map_cache_error)?;
            report.added += 1;
        }

        info!(
            %recipient,
            added = report.added,
            removed = report.removed,
            retracted = report.retracted,
            "like cache reconciled"
        );
        Ok(report)
    }

    async fn still_likes(&self, actor: &UserId, recipient: &UserId) -> Result<bool, Error> {
        // `has_reciprocated(a, b)` reads a's current decision on b.
        self.decisions
            .has_reciprocated(actor, recipient)
            .await
            .map_err(map_repository_error)
    }

    async fn authoritative_likers(&self, recipient: &UserId) -> Result<Vec<Liker>, Error> {
        let mut likers = Vec::new();
        let mut request = PageRequest::first(self.page_size);
        loop {
            let page = self
                .decisions
                .list_likers(recipient, &request)
                .await
                .map_err(map_repository_error)?;
            let (items, next) = page.into_parts();
            likers.extend(items);
            match next {
                Some(cursor) => request = PageRequest::new(Some(cursor), self.page_size),
                None => return Ok(likers),
            }
        }
    }

    async fn cached_members(&self, recipient: &UserId) -> Result<Vec<UserId>, Error> {
        let mut members = Vec::new();
        let mut request = PageRequest::first(self.page_size);
        loop {
            let page = self
                .cache
                .list_likers(recipient, &request)
                .await
                .map_err(map_cache_error)?;
            let (items, next) = page.into_parts();
            let progressed = !items.is_empty();
            members.extend(items.into_iter().map(|entry| entry.actor_id().clone()));
            match next {
                Some(cursor) if progressed => {
                    request = PageRequest::new(Some(cursor), self.page_size);
                }
                _ => return Ok(members),
            }
        }
    }
}
