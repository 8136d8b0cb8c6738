//! Explore orchestration over the decision store and the like cache.
//!
//! Decisions are written to the durable store first and mirrored into the
//! cache on a best-effort basis. Listing and counting read the cache; the
//! new-likers listing cross-checks each cached entry against the store.
//!
//! `put_decision` runs its write, cache update, and mutual-like read as three
//! independent steps. Two users liking each other at nearly the same instant
//! can therefore both observe `mutualLikes = false`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Cursor, CursorError, PageRequest, PageSize, ScoreCursor};
use tracing::{debug, warn};

use crate::domain::ports::{
    CountLikedYouRequest, CountLikedYouResponse, DecisionCommand, DecisionRepository,
    DecisionRepositoryError, LikeCache, LikeCacheError, LikedYouQuery, LikerPayload,
    ListLikedYouRequest, ListLikedYouResponse, PutDecisionRequest, PutDecisionResponse,
};
use crate::domain::{CachedLike, Decision, Error, timestamp_score};

/// Immutable settings for the explore service, built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExploreConfig {
    page_size: PageSize,
}

impl ExploreConfig {
    /// Build a configuration with the given page size.
    pub fn new(page_size: PageSize) -> Self {
        Self { page_size }
    }

    /// Number of likers returned per page.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }
}

pub(crate) fn map_repository_error(error: DecisionRepositoryError) -> Error {
    match error {
        DecisionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("decision store unavailable: {message}"))
        }
        DecisionRepositoryError::Query { message } => {
            Error::internal(format!("decision store error: {message}"))
        }
    }
}

pub(crate) fn map_cache_error(error: LikeCacheError) -> Error {
    match error {
        LikeCacheError::Connection { message } => {
            Error::service_unavailable(format!("like cache unavailable: {message}"))
        }
        LikeCacheError::Backend { message } => {
            Error::service_unavailable(format!("like cache error: {message}"))
        }
    }
}

fn map_cursor_error(error: CursorError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Service implementing the [`DecisionCommand`] and [`LikedYouQuery`] ports.
#[derive(Clone)]
pub struct ExploreService<R, C> {
    decisions: Arc<R>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
    config: ExploreConfig,
}

impl<R, C> ExploreService<R, C> {
    /// Create a service over the given stores.
    pub fn new(
        decisions: Arc<R>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
        config: ExploreConfig,
    ) -> Self {
        Self {
            decisions,
            cache,
            clock,
            config,
        }
    }
}

impl<R, C> ExploreService<R, C>
where
    R: DecisionRepository,
    C: LikeCache,
{
    async fn mirror_into_cache(&self, decision: &Decision) {
        let result = if decision.liked() {
            let like = CachedLike::new(
                decision.actor().clone(),
                timestamp_score(decision.timestamp()),
            );
            self.cache.add_like(decision.recipient(), &like).await
        } else {
            self.cache
                .remove_like(decision.recipient(), decision.actor())
                .await
        };

        if let Err(error) = result {
            warn!(
                %error,
                actor = %decision.actor(),
                recipient = %decision.recipient(),
                liked = decision.liked(),
                "like cache update failed; cache is stale until reconciled"
            );
        }
    }

    async fn cached_page(
        &self,
        request: &ListLikedYouRequest,
    ) -> Result<(Vec<CachedLike>, Option<String>), Error> {
        let after = ScoreCursor::decode_optional(request.pagination_token.as_deref())
            .map_err(map_cursor_error)?;
        let page_request = PageRequest::new(after, self.config.page_size());
        let page = self
            .cache
            .list_likers(&request.recipient_user_id, &page_request)
            .await
            .map_err(map_cache_error)?;
        let (entries, next) = page.into_parts();
        Ok((entries, next.map(|cursor| cursor.encode())))
    }
}

#[async_trait]
impl<R, C> DecisionCommand for ExploreService<R, C>
where
    R: DecisionRepository,
    C: LikeCache,
{
    async fn put_decision(&self, request: PutDecisionRequest) -> Result<PutDecisionResponse, Error> {
        let PutDecisionRequest {
            actor_user_id,
            recipient_user_id,
            liked_recipient,
        } = request;
        let decision = Decision::new(
            actor_user_id,
            recipient_user_id,
            liked_recipient,
            self.clock.utc().timestamp(),
        );

        self.decisions
            .record(&decision)
            .await
            .map_err(map_repository_error)?;
        debug!(
            actor = %decision.actor(),
            recipient = %decision.recipient(),
            liked = decision.liked(),
            "decision recorded"
        );

        self.mirror_into_cache(&decision).await;

        let mutual_likes = self
            .decisions
            .is_mutual_like(decision.actor(), decision.recipient())
            .await
            .map_err(map_repository_error)?;

        Ok(PutDecisionResponse { mutual_likes })
    }
}

#[async_trait]
impl<R, C> LikedYouQuery for ExploreService<R, C>
where
    R: DecisionRepository,
    C: LikeCache,
{
    async fn list_liked_you(
        &self,
        request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error> {
        let (entries, next_pagination_token) = self.cached_page(&request).await?;
        Ok(ListLikedYouResponse {
            likers: entries
                .into_iter()
                .map(|entry| LikerPayload::try_from(entry.into_liker()))
                .collect::<Result<Vec<_>, _>>()?,
            next_pagination_token,
        })
    }

    async fn list_new_liked_you(
        &self,
        request: ListLikedYouRequest,
    ) -> Result<ListLikedYouResponse, Error> {
        let (entries, next_pagination_token) = self.cached_page(&request).await?;

        let mut likers = Vec::with_capacity(entries.len());
        for entry in entries {
            let reciprocated = self
                .decisions
                .has_reciprocated(&request.recipient_user_id, entry.actor_id())
                .await
                .map_err(map_repository_error)?;
            if !reciprocated {
                likers.push(LikerPayload::try_from(entry.into_liker())?);
            }
        }

        // The token follows the unfiltered cache page so filtered pages never
        // stall pagination.
        Ok(ListLikedYouResponse {
            likers,
            next_pagination_token,
        })
    }

    async fn count_liked_you(
        &self,
        request: CountLikedYouRequest,
    ) -> Result<CountLikedYouResponse, Error> {
        let count = self
            .cache
            .count_likers(&request.recipient_user_id)
            .await
            .map_err(map_cache_error)?;
        Ok(CountLikedYouResponse { count })
    }
}

#[cfg(test)]
#[path = "explore_service_tests.rs"]
mod tests;
