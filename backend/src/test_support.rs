//! In-memory port implementations and clocks for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites under `tests/`. The doubles follow the same ordering
//! and pagination rules as the PostgreSQL and Redis adapters so behavioural
//! tests can run without either service.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use pagination::{DecisionCursor, Page, PageRequest, ScoreCursor};

use crate::domain::ports::{DecisionRepository, DecisionRepositoryError, LikeCache, LikeCacheError};
use crate::domain::{CachedLike, Decision, Liker, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at `timestamp` seconds since the Unix epoch.
    ///
    /// Out-of-range timestamps fall back to the epoch.
    pub fn at(timestamp: i64) -> Self {
        let now = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH);
        Self::new(now)
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct StoredDecision {
    liked: bool,
    timestamp: i64,
}

/// Decision store held in a map keyed by `(actor, recipient)`.
#[derive(Default)]
pub struct InMemoryDecisionRepository {
    rows: Mutex<BTreeMap<(UserId, UserId), StoredDecision>>,
    failure: Mutex<Option<DecisionRepositoryError>>,
}

impl InMemoryDecisionRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error`, or succeed again with
    /// `None`.
    pub fn fail_with(&self, error: Option<DecisionRepositoryError>) {
        *lock(&self.failure) = error;
    }

    /// Number of stored rows for the pair, which is at most one.
    pub fn row_count(&self, actor: &UserId, recipient: &UserId) -> usize {
        usize::from(lock(&self.rows).contains_key(&(actor.clone(), recipient.clone())))
    }

    /// Stored `(liked, timestamp)` for the pair.
    pub fn decision(&self, actor: &UserId, recipient: &UserId) -> Option<(bool, i64)> {
        lock(&self.rows)
            .get(&(actor.clone(), recipient.clone()))
            .map(|row| (row.liked, row.timestamp))
    }

    fn check(&self) -> Result<(), DecisionRepositoryError> {
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn likes(&self, actor: &UserId, recipient: &UserId) -> bool {
        lock(&self.rows)
            .get(&(actor.clone(), recipient.clone()))
            .is_some_and(|row| row.liked)
    }

    fn page_of_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
        keep: impl Fn(&Liker) -> bool,
    ) -> Page<Liker, DecisionCursor> {
        let mut likers: Vec<Liker> = lock(&self.rows)
            .iter()
            .filter(|((_, to), row)| to == recipient && row.liked)
            .map(|((from, _), row)| Liker::new(from.clone(), row.timestamp))
            .collect();
        likers.sort_by(|a, b| {
            (a.timestamp(), a.actor_id().as_str()).cmp(&(b.timestamp(), b.actor_id().as_str()))
        });

        let after = request
            .after()
            .map(|cursor| (cursor.timestamp(), cursor.actor_id().to_owned()));
        let rows: Vec<Liker> = likers
            .into_iter()
            .filter(|liker| match &after {
                Some((ts, actor)) => {
                    (liker.timestamp(), liker.actor_id().as_str()) > (*ts, actor.as_str())
                }
                None => true,
            })
            .filter(|liker| keep(liker))
            .take(request.size().as_usize() + 1)
            .collect();

        Page::from_overfetch(rows, request.size(), |last| {
            DecisionCursor::new(last.timestamp(), last.actor_id().as_str())
        })
    }
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionRepository {
    async fn record(&self, decision: &Decision) -> Result<(), DecisionRepositoryError> {
        self.check()?;
        lock(&self.rows).insert(
            (decision.actor().clone(), decision.recipient().clone()),
            StoredDecision {
                liked: decision.liked(),
                timestamp: decision.timestamp(),
            },
        );
        Ok(())
    }

    async fn is_mutual_like(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<bool, DecisionRepositoryError> {
        self.check()?;
        Ok(a != b && self.likes(a, b) && self.likes(b, a))
    }

    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError> {
        self.check()?;
        Ok(self.page_of_likers(recipient, request, |_| true))
    }

    async fn list_new_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError> {
        self.check()?;
        Ok(self.page_of_likers(recipient, request, |liker| {
            !self.likes(recipient, liker.actor_id())
        }))
    }

    async fn has_reciprocated(
        &self,
        recipient: &UserId,
        actor: &UserId,
    ) -> Result<bool, DecisionRepositoryError> {
        self.check()?;
        Ok(self.likes(recipient, actor))
    }

    async fn count_likers(&self, recipient: &UserId) -> Result<u64, DecisionRepositoryError> {
        self.check()?;
        let count = lock(&self.rows)
            .iter()
            .filter(|((_, to), row)| to == recipient && row.liked)
            .count();
        Ok(count as u64)
    }
}

/// Like cache with sorted-set semantics: one score per member, ordered by
/// score then member.
#[derive(Default)]
pub struct InMemoryLikeCache {
    sets: Mutex<HashMap<UserId, HashMap<UserId, f64>>>,
    write_failure: Mutex<Option<LikeCacheError>>,
    read_failure: Mutex<Option<LikeCacheError>>,
}

impl InMemoryLikeCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `add_like` and `remove_like` fail with `error`.
    pub fn fail_writes_with(&self, error: Option<LikeCacheError>) {
        *lock(&self.write_failure) = error;
    }

    /// Make `list_likers` and `count_likers` fail with `error`.
    pub fn fail_reads_with(&self, error: Option<LikeCacheError>) {
        *lock(&self.read_failure) = error;
    }

    /// Members of `recipient`'s set in score order.
    pub fn members(&self, recipient: &UserId) -> Vec<CachedLike> {
        let sets = lock(&self.sets);
        let mut members: Vec<CachedLike> = sets
            .get(recipient)
            .map(|set| {
                set.iter()
                    .map(|(actor, score)| CachedLike::new(actor.clone(), *score))
                    .collect()
            })
            .unwrap_or_default();
        members.sort_by(|a, b| {
            a.score()
                .total_cmp(&b.score())
                .then_with(|| a.actor_id().cmp(b.actor_id()))
        });
        members
    }

    fn check(slot: &Mutex<Option<LikeCacheError>>) -> Result<(), LikeCacheError> {
        match lock(slot).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LikeCache for InMemoryLikeCache {
    async fn add_like(&self, recipient: &UserId, like: &CachedLike) -> Result<(), LikeCacheError> {
        Self::check(&self.write_failure)?;
        lock(&self.sets)
            .entry(recipient.clone())
            .or_default()
            .insert(like.actor_id().clone(), like.score());
        Ok(())
    }

    async fn remove_like(
        &self,
        recipient: &UserId,
        actor: &UserId,
    ) -> Result<(), LikeCacheError> {
        Self::check(&self.write_failure)?;
        let mut sets = lock(&self.sets);
        if let Some(set) = sets.get_mut(recipient) {
            set.remove(actor);
            if set.is_empty() {
                sets.remove(recipient);
            }
        }
        Ok(())
    }

    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<ScoreCursor>,
    ) -> Result<Page<CachedLike, ScoreCursor>, LikeCacheError> {
        Self::check(&self.read_failure)?;
        let min = request.after().map(ScoreCursor::score);
        let rows: Vec<CachedLike> = self
            .members(recipient)
            .into_iter()
            .filter(|like| min.is_none_or(|min| like.score() > min))
            .take(request.size().as_usize())
            .collect();
        Ok(Page::from_full_page(rows, request.size(), |last| {
            ScoreCursor::new(last.score(), last.actor_id().as_str())
        }))
    }

    async fn count_likers(&self, recipient: &UserId) -> Result<u64, LikeCacheError> {
        Self::check(&self.read_failure)?;
        let count = lock(&self.sets).get(recipient).map_or(0, HashMap::len);
        Ok(count as u64)
    }
}
