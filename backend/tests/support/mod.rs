//! Shared helpers for integration suites.
//!
//! Suites that need live services read their URLs from the environment and
//! skip when the variable is unset, so `cargo test` stays green on machines
//! without PostgreSQL or Redis.

#![allow(dead_code, reason = "each suite uses a different subset")]

use std::sync::Arc;

use explore::domain::{ExploreConfig, ExploreService, UserId};
use explore::test_support::{InMemoryDecisionRepository, InMemoryLikeCache, MutableClock};
use pagination::PageSize;
use uuid::Uuid;

/// PostgreSQL URL for live adapter tests.
pub const DATABASE_URL_VAR: &str = "EXPLORE_TEST_DATABASE_URL";
/// Redis URL for live adapter tests.
pub const REDIS_URL_VAR: &str = "EXPLORE_TEST_REDIS_URL";

/// Read `var`, logging a skip notice when it is unset.
pub fn service_url(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("skipping: {var} is not set");
            None
        }
    }
}

/// User id that is unique to this test run.
pub fn unique_user(label: &str) -> UserId {
    UserId::new(format!("{label}-{}", Uuid::new_v4())).expect("generated id is valid")
}

/// User id from a fixed label.
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Explore service wired to in-memory adapters.
pub struct InMemoryExplore {
    pub decisions: Arc<InMemoryDecisionRepository>,
    pub cache: Arc<InMemoryLikeCache>,
    pub clock: Arc<MutableClock>,
    pub service: Arc<ExploreService<InMemoryDecisionRepository, InMemoryLikeCache>>,
}

impl InMemoryExplore {
    /// Build with the clock at `start` and the given page size.
    pub fn new(start: i64, page_size: u32) -> Self {
        let decisions = Arc::new(InMemoryDecisionRepository::new());
        let cache = Arc::new(InMemoryLikeCache::new());
        let clock = Arc::new(MutableClock::at(start));
        let page_size = PageSize::new(page_size).expect("valid page size");
        let service = Arc::new(ExploreService::new(
            decisions.clone(),
            cache.clone(),
            clock.clone(),
            ExploreConfig::new(page_size),
        ));
        Self {
            decisions,
            cache,
            clock,
            service,
        }
    }
}
