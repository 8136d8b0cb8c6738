//! Behavioural tests for decision recording and liked-you reads.
//!
//! The explore service runs against the in-memory store and cache, which
//! follow the same ordering and paging rules as the PostgreSQL and Redis
//! adapters.

use explore::domain::ErrorCode;
use explore::domain::ports::{
    CountLikedYouRequest, DecisionCommand, DecisionRepository, DecisionRepositoryError,
    LikeCacheError, LikedYouQuery, ListLikedYouRequest, ListLikedYouResponse, PutDecisionRequest,
};
use explore::domain::{LikeCacheReconciler, UserId};
use pagination::{DecisionCursor, PageRequest, PageSize};
use rstest::{fixture, rstest};

mod support;

use support::{InMemoryExplore, user};

async fn decide(env: &InMemoryExplore, actor: &str, recipient: &str, liked: bool) -> bool {
    env.service
        .put_decision(PutDecisionRequest {
            actor_user_id: user(actor),
            recipient_user_id: user(recipient),
            liked_recipient: liked,
        })
        .await
        .expect("decision recorded")
        .mutual_likes
}

async fn list(
    env: &InMemoryExplore,
    recipient: &str,
    token: Option<String>,
) -> ListLikedYouResponse {
    env.service
        .list_liked_you(ListLikedYouRequest {
            recipient_user_id: user(recipient),
            pagination_token: token,
        })
        .await
        .expect("listing succeeds")
}

async fn list_new_all(env: &InMemoryExplore, recipient: &str) -> Vec<String> {
    let mut actors = Vec::new();
    let mut token = None;
    loop {
        let page = env
            .service
            .list_new_liked_you(ListLikedYouRequest {
                recipient_user_id: user(recipient),
                pagination_token: token,
            })
            .await
            .expect("listing succeeds");
        actors.extend(page.likers.into_iter().map(|l| l.actor_id.as_str().to_owned()));
        match page.next_pagination_token {
            Some(next) => token = Some(next),
            None => return actors,
        }
    }
}

async fn count(env: &InMemoryExplore, recipient: &str) -> u64 {
    env.service
        .count_liked_you(CountLikedYouRequest {
            recipient_user_id: user(recipient),
        })
        .await
        .expect("count succeeds")
        .count
}

fn actor_ids(page: &ListLikedYouResponse) -> Vec<&str> {
    page.likers.iter().map(|l| l.actor_id.as_str()).collect()
}

/// Three likers of `r` at 100, 200 and 300 with a page size of two.
#[fixture]
async fn three_likers() -> InMemoryExplore {
    let env = InMemoryExplore::new(100, 2);
    for actor in ["a", "b", "c"] {
        decide(&env, actor, "r", true).await;
        env.clock.advance_seconds(100);
    }
    env
}

#[rstest]
#[tokio::test]
async fn reciprocated_like_is_reported_as_mutual() {
    let env = InMemoryExplore::new(1_700_000_000, 10);

    assert!(!decide(&env, "u1", "u2", true).await);
    assert!(decide(&env, "u2", "u1", true).await);
}

#[rstest]
#[tokio::test]
async fn pass_after_like_breaks_the_mutual_like() {
    let env = InMemoryExplore::new(1_700_000_000, 10);
    decide(&env, "u1", "u2", true).await;
    decide(&env, "u2", "u1", true).await;

    assert!(!decide(&env, "u1", "u2", false).await);
    assert!(!decide(&env, "u2", "u1", true).await);
}

#[rstest]
#[tokio::test]
async fn repeated_decisions_overwrite_in_place() {
    let env = InMemoryExplore::new(1_000, 10);
    decide(&env, "a", "b", true).await;
    env.clock.advance_seconds(5);
    decide(&env, "a", "b", false).await;

    assert_eq!(env.decisions.row_count(&user("a"), &user("b")), 1);
    assert_eq!(env.decisions.decision(&user("a"), &user("b")), Some((false, 1_005)));
    assert_eq!(count(&env, "b").await, 0);
}

#[rstest]
#[case("u1", "u2")]
#[case("u2", "u1")]
#[tokio::test]
async fn mutual_like_check_is_symmetric(#[case] first: &str, #[case] second: &str) {
    let env = InMemoryExplore::new(1_000, 10);
    decide(&env, first, second, true).await;
    decide(&env, second, first, true).await;

    let a = user(first);
    let b = user(second);
    let forward = env.decisions.is_mutual_like(&a, &b).await.expect("check");
    let backward = env.decisions.is_mutual_like(&b, &a).await.expect("check");
    assert!(forward);
    assert_eq!(forward, backward);
}

#[rstest]
#[tokio::test]
async fn likers_page_in_timestamp_order(#[future] three_likers: InMemoryExplore) {
    let env = three_likers.await;

    let first = list(&env, "r", None).await;
    assert_eq!(actor_ids(&first), vec!["a", "b"]);
    assert_eq!(first.likers[0].unix_timestamp, 100);
    let token = first.next_pagination_token.clone().expect("more pages");

    let second = list(&env, "r", Some(token)).await;
    assert_eq!(actor_ids(&second), vec!["c"]);
    assert_eq!(second.likers[0].unix_timestamp, 300);
    assert!(second.next_pagination_token.is_none());
}

#[rstest]
#[tokio::test]
async fn empty_token_pages_like_an_absent_one(#[future] three_likers: InMemoryExplore) {
    let env = three_likers.await;

    let first = list(&env, "r", Some(String::new())).await;
    assert_eq!(actor_ids(&first), vec!["a", "b"]);
    let token = first.next_pagination_token.clone().expect("more pages");

    let second = list(&env, "r", Some(token)).await;
    assert_eq!(actor_ids(&second), vec!["c"]);
    assert!(second.next_pagination_token.is_none());
}

#[rstest]
#[case("not base64 !!")]
#[case("MTAwfGE=")]
#[tokio::test]
async fn malformed_tokens_are_invalid_requests(
    #[future] three_likers: InMemoryExplore,
    #[case] token: &str,
) {
    let env = three_likers.await;

    let err = env
        .service
        .list_liked_you(ListLikedYouRequest {
            recipient_user_id: user("r"),
            pagination_token: Some(token.to_owned()),
        })
        .await
        .expect_err("token rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn new_likers_exclude_reciprocated_actors(#[future] three_likers: InMemoryExplore) {
    let env = three_likers.await;
    decide(&env, "r", "b", true).await;
    decide(&env, "r", "c", false).await;

    assert_eq!(list_new_all(&env, "r").await, vec!["a", "c"]);
}

#[rstest]
#[tokio::test]
async fn store_new_likers_match_cache_view(#[future] three_likers: InMemoryExplore) {
    let env = three_likers.await;
    decide(&env, "r", "a", true).await;

    let page = env
        .decisions
        .list_new_likers(
            &user("r"),
            &PageRequest::first(PageSize::new(10).expect("valid size")),
        )
        .await
        .expect("store listing");
    let from_store: Vec<_> = page
        .items()
        .iter()
        .map(|l| l.actor_id().as_str().to_owned())
        .collect();

    assert_eq!(from_store, list_new_all(&env, "r").await);
}

#[rstest]
#[tokio::test]
async fn store_pages_resume_strictly_after_the_cursor() {
    let env = InMemoryExplore::new(100, 10);
    // Two likers share a timestamp; the actor breaks the tie.
    for actor in ["b", "a", "c"] {
        decide(&env, actor, "r", true).await;
    }
    let size = PageSize::new(2).expect("valid size");

    let first = env
        .decisions
        .list_likers(&user("r"), &PageRequest::first(size))
        .await
        .expect("first page");
    assert_eq!(first.next(), Some(&DecisionCursor::new(100, "b")));

    let second = env
        .decisions
        .list_likers(&user("r"), &PageRequest::new(first.next().cloned(), size))
        .await
        .expect("second page");
    let actors: Vec<_> = second.items().iter().map(|l| l.actor_id().as_str()).collect();
    assert_eq!(actors, vec!["c"]);
    assert!(second.is_last());
}

#[rstest]
#[tokio::test]
async fn count_tracks_current_likers() {
    let env = InMemoryExplore::new(1_000, 10);
    for actor in ["a", "b", "c", "d"] {
        decide(&env, actor, "r", true).await;
    }
    decide(&env, "b", "r", false).await;
    decide(&env, "a", "r", true).await;
    decide(&env, "e", "r", false).await;

    assert_eq!(count(&env, "r").await, 3);
}

#[rstest]
#[tokio::test]
async fn cache_write_failure_does_not_fail_the_decision() {
    let env = InMemoryExplore::new(1_000, 10);
    env.cache
        .fail_writes_with(Some(LikeCacheError::connection("redis down")));

    assert!(!decide(&env, "a", "r", true).await);
    assert_eq!(env.decisions.decision(&user("a"), &user("r")), Some((true, 1_000)));

    env.cache.fail_writes_with(None);
    assert_eq!(count(&env, "r").await, 0);
}

#[rstest]
#[tokio::test]
async fn cache_read_failure_is_surfaced_without_fallback(
    #[future] three_likers: InMemoryExplore,
) {
    let env = three_likers.await;
    env.cache
        .fail_reads_with(Some(LikeCacheError::backend("WRONGTYPE")));

    let err = env
        .service
        .list_liked_you(ListLikedYouRequest {
            recipient_user_id: user("r"),
            pagination_token: None,
        })
        .await
        .expect_err("cache read fails");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(DecisionRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(DecisionRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_write_failure_fails_the_decision(
    #[case] failure: DecisionRepositoryError,
    #[case] expected: ErrorCode,
) {
    let env = InMemoryExplore::new(1_000, 10);
    env.decisions.fail_with(Some(failure));

    let err = env
        .service
        .put_decision(PutDecisionRequest {
            actor_user_id: user("a"),
            recipient_user_id: user("r"),
            liked_recipient: true,
        })
        .await
        .expect_err("store failure surfaces");

    assert_eq!(err.code(), expected);
    assert!(env.cache.members(&user("r")).is_empty());
}

#[rstest]
#[tokio::test]
async fn reconciler_repairs_drift(#[future] three_likers: InMemoryExplore) {
    let env = three_likers.await;
    // A pass that never reached the cache, and a like that was lost.
    env.cache
        .fail_writes_with(Some(LikeCacheError::connection("redis down")));
    decide(&env, "a", "r", false).await;
    decide(&env, "d", "r", true).await;
    env.cache.fail_writes_with(None);

    let reconciler = LikeCacheReconciler::new(
        env.decisions.clone(),
        env.cache.clone(),
        PageSize::new(2).expect("valid size"),
    );
    let report = reconciler.reconcile(&user("r")).await.expect("reconciles");

    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 3);
    let members: Vec<UserId> = env
        .cache
        .members(&user("r"))
        .into_iter()
        .map(|like| like.actor_id().clone())
        .collect();
    assert_eq!(members, vec![user("b"), user("c"), user("d")]);
}
