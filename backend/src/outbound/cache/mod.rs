//! Redis cache adapters.
//!
//! Connections are pooled with `bb8-redis`. Cache failures are reported
//! through the port's error type; whether they are fatal is the caller's
//! decision.

mod redis_like_cache;

pub use redis_like_cache::{RedisLikeCache, RedisPoolConfig};
