//! Integration tests for `RedisLikeCache` against a live Redis.
//!
//! Set `EXPLORE_TEST_REDIS_URL` to run them. Keys are namespaced by unique
//! recipient ids, so the suite can share a Redis with other data.

use explore::domain::CachedLike;
use explore::domain::ports::LikeCache;
use explore::outbound::cache::{RedisLikeCache, RedisPoolConfig};
use pagination::{PageRequest, PageSize};
use rstest::rstest;

mod support;

use support::{REDIS_URL_VAR, service_url, unique_user, user};

async fn cache() -> Option<RedisLikeCache> {
    let url = service_url(REDIS_URL_VAR)?;
    let config = RedisPoolConfig::new(url).with_max_size(2);
    Some(RedisLikeCache::connect(&config).await.expect("redis connects"))
}

#[rstest]
#[tokio::test]
async fn add_rescore_and_remove_track_membership() {
    let Some(cache) = cache().await else { return };
    let recipient = unique_user("recipient");

    cache
        .add_like(&recipient, &CachedLike::new(user("a"), 100.0))
        .await
        .expect("add");
    cache
        .add_like(&recipient, &CachedLike::new(user("a"), 150.0))
        .await
        .expect("rescore");
    cache
        .add_like(&recipient, &CachedLike::new(user("b"), 200.0))
        .await
        .expect("add");
    assert_eq!(cache.count_likers(&recipient).await.expect("count"), 2);

    cache.remove_like(&recipient, &user("a")).await.expect("remove");
    cache.remove_like(&recipient, &user("a")).await.expect("remove is idempotent");
    assert_eq!(cache.count_likers(&recipient).await.expect("count"), 1);

    cache.remove_like(&recipient, &user("b")).await.expect("cleanup");
}

#[rstest]
#[tokio::test]
async fn pages_walk_scores_in_ascending_order() {
    let Some(cache) = cache().await else { return };
    let recipient = unique_user("recipient");
    for (actor, score) in [("c", 300.0), ("a", 100.0), ("b", 200.0)] {
        cache
            .add_like(&recipient, &CachedLike::new(user(actor), score))
            .await
            .expect("add");
    }
    let size = PageSize::new(2).expect("valid size");

    let first = cache
        .list_likers(&recipient, &PageRequest::first(size))
        .await
        .expect("first page");
    let second = cache
        .list_likers(&recipient, &PageRequest::new(first.next().cloned(), size))
        .await
        .expect("second page");

    let actors: Vec<_> = first
        .items()
        .iter()
        .chain(second.items())
        .map(|like| like.actor_id().as_str().to_owned())
        .collect();
    assert_eq!(actors, vec!["a", "b", "c"]);
    assert_eq!(second.items()[0].score(), 300.0);
    assert!(second.is_last());

    for actor in ["a", "b", "c"] {
        cache.remove_like(&recipient, &user(actor)).await.expect("cleanup");
    }
}
