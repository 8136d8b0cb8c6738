//! Redis-backed `LikeCache` using one sorted set per recipient.
//!
//! Each recipient's likers live under `liked:<recipient>` with the decision
//! timestamp as the score. Listing walks the set with `ZRANGEBYSCORE` from an
//! exclusive lower bound, so the cursor only carries a score.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use pagination::{Page, PageRequest, ScoreCursor};
use tracing::debug;

use crate::domain::ports::{LikeCache, LikeCacheError};
use crate::domain::{CachedLike, UserId};

const KEY_PREFIX: &str = "liked:";

/// Settings for the Redis connection pool.
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    redis_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisPoolConfig {
    /// Create a configuration for `redis_url` with 16 connections and a
    /// five second checkout timeout.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            max_size: 16,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Redis URL.
    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }
}

/// Like cache stored in Redis sorted sets.
#[derive(Clone)]
pub struct RedisLikeCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisLikeCache {
    /// Wrap an existing pool.
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    /// Build a pool from `config` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`LikeCacheError::Connection`] when the URL is invalid or the
    /// initial connections cannot be opened.
    pub async fn connect(config: &RedisPoolConfig) -> Result<Self, LikeCacheError> {
        let manager = RedisConnectionManager::new(config.redis_url.as_str())
            .map_err(|err| LikeCacheError::connection(format!("invalid redis url: {err}")))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| LikeCacheError::connection(err.to_string()))?;
        Ok(Self::new(pool))
    }

    async fn conn(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, LikeCacheError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

fn key_for(recipient: &UserId) -> String {
    format!("{KEY_PREFIX}{recipient}")
}

/// Exclusive lower bound for `ZRANGEBYSCORE`.
fn min_bound(after: Option<&ScoreCursor>) -> String {
    after.map_or_else(|| "-inf".to_owned(), |cursor| format!("({}", cursor.score()))
}

fn map_run_error(error: RunError<RedisError>) -> LikeCacheError {
    match error {
        RunError::User(err) => map_redis_error(err),
        RunError::TimedOut => LikeCacheError::connection("timed out waiting for connection"),
    }
}

fn map_redis_error(error: RedisError) -> LikeCacheError {
    debug!(error = %error, "redis command failed");
    if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
        LikeCacheError::connection(error.to_string())
    } else {
        LikeCacheError::backend(error.to_string())
    }
}

/// Pair up a flat `member, score, member, score, ...` reply.
fn parse_scored_members(reply: Vec<String>) -> Result<Vec<CachedLike>, LikeCacheError> {
    if reply.len() % 2 != 0 {
        return Err(LikeCacheError::backend("odd-length WITHSCORES reply"));
    }
    reply
        .chunks_exact(2)
        .map(|pair| {
            let [member, score] = pair else {
                return Err(LikeCacheError::backend("malformed WITHSCORES pair"));
            };
            let actor = UserId::new(member.as_str())
                .map_err(|err| LikeCacheError::backend(format!("cached member: {err}")))?;
            let score = score
                .parse::<f64>()
                .map_err(|err| LikeCacheError::backend(format!("cached score {score:?}: {err}")))?;
            Ok(CachedLike::new(actor, score))
        })
        .collect()
}

#[async_trait]
impl LikeCache for RedisLikeCache {
    async fn add_like(&self, recipient: &UserId, like: &CachedLike) -> Result<(), LikeCacheError> {
        let mut conn = self.conn().await?;
        redis::cmd("ZADD")
            .arg(key_for(recipient))
            .arg(like.score())
            .arg(like.actor_id().as_str())
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn remove_like(
        &self,
        recipient: &UserId,
        actor: &UserId,
    ) -> Result<(), LikeCacheError> {
        let mut conn = self.conn().await?;
        redis::cmd("ZREM")
            .arg(key_for(recipient))
            .arg(actor.as_str())
            .query_async::<()>(&mut *conn)
            .await
            .map_err(map_redis_error)
    }

    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<ScoreCursor>,
    ) -> Result<Page<CachedLike, ScoreCursor>, LikeCacheError> {
        let mut conn = self.conn().await?;
        let reply: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(key_for(recipient))
            .arg(min_bound(request.after()))
            .arg("+inf")
            .arg("WITHSCORES")
            .arg("LIMIT")
            .arg(0)
            .arg(request.size().get())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;

        let likes = parse_scored_members(reply)?;
        Ok(Page::from_full_page(likes, request.size(), |last| {
            ScoreCursor::new(last.score(), last.actor_id().as_str())
        }))
    }

    async fn count_likers(&self, recipient: &UserId) -> Result<u64, LikeCacheError> {
        let mut conn = self.conn().await?;
        redis::cmd("ZCARD")
            .arg(key_for(recipient))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)
    }
}
