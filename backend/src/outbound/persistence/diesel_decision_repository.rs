//! PostgreSQL-backed `DecisionRepository` using Diesel.
//!
//! Listing uses keyset pagination on `(unix_timestamp, actor_user_id)`. Each
//! query fetches one row beyond the page size to learn whether another page
//! exists; the cursor is the last row kept.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use pagination::{DecisionCursor, Page, PageRequest};

use crate::domain::ports::{DecisionRepository, DecisionRepositoryError};
use crate::domain::{Decision, Liker, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LikerRow, NewDecisionRow};
use super::pool::{DbPool, PoolError};
use super::schema::decisions;

/// Likers of `$1` not liked back, after the optional `($2, $3)` position.
const NEW_LIKERS_SQL: &str = r"
SELECT liker.actor_user_id, liker.unix_timestamp
FROM decisions AS liker
LEFT JOIN decisions AS reply
    ON reply.actor_user_id = liker.recipient_user_id
   AND reply.recipient_user_id = liker.actor_user_id
WHERE liker.recipient_user_id = $1
  AND liker.liked
  AND (reply.liked IS NULL OR NOT reply.liked)
  AND (
      $2::BIGINT IS NULL
      OR (liker.unix_timestamp, liker.actor_user_id) > ($2::BIGINT, $3::TEXT)
  )
ORDER BY liker.unix_timestamp ASC, liker.actor_user_id ASC
LIMIT $4
";

/// Diesel-backed implementation of the decision store port.
#[derive(Clone)]
pub struct DieselDecisionRepository {
    pool: DbPool,
}

impl DieselDecisionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DecisionRepositoryError {
    map_basic_pool_error(error, DecisionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DecisionRepositoryError {
    map_basic_diesel_error(
        error,
        DecisionRepositoryError::query,
        DecisionRepositoryError::connection,
    )
}

fn row_to_liker(row: LikerRow) -> Result<Liker, DecisionRepositoryError> {
    let LikerRow {
        actor_user_id,
        unix_timestamp,
    } = row;
    let actor = UserId::new(actor_user_id)
        .map_err(|err| DecisionRepositoryError::query(format!("stored actor id: {err}")))?;
    Ok(Liker::new(actor, unix_timestamp))
}

fn rows_to_page(
    rows: Vec<LikerRow>,
    request: &PageRequest<DecisionCursor>,
) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError> {
    let likers = rows
        .into_iter()
        .map(row_to_liker)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::from_overfetch(likers, request.size(), |last| {
        DecisionCursor::new(last.timestamp(), last.actor_id().as_str())
    }))
}

#[async_trait]
impl DecisionRepository for DieselDecisionRepository {
    async fn record(&self, decision: &Decision) -> Result<(), DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDecisionRow {
            actor_user_id: decision.actor().as_str(),
            recipient_user_id: decision.recipient().as_str(),
            liked: decision.liked(),
            unix_timestamp: decision.timestamp(),
        };

        diesel::insert_into(decisions::table)
            .values(&row)
            .on_conflict((decisions::actor_user_id, decisions::recipient_user_id))
            .do_update()
            .set((
                decisions::liked.eq(excluded(decisions::liked)),
                decisions::unix_timestamp.eq(excluded(decisions::unix_timestamp)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn is_mutual_like(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<bool, DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let forward = decisions::actor_user_id
            .eq(a.as_str())
            .and(decisions::recipient_user_id.eq(b.as_str()));
        let backward = decisions::actor_user_id
            .eq(b.as_str())
            .and(decisions::recipient_user_id.eq(a.as_str()));

        let liked_rows: i64 = decisions::table
            .filter(decisions::liked.eq(true))
            .filter(forward.or(backward))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // A self-decision matches both arms with one row, so it never counts.
        Ok(liked_rows == 2)
    }

    async fn list_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = decisions::table
            .filter(decisions::recipient_user_id.eq(recipient.as_str()))
            .filter(decisions::liked.eq(true))
            .into_boxed();

        if let Some(after) = request.after() {
            query = query.filter(
                decisions::unix_timestamp.gt(after.timestamp()).or(decisions::unix_timestamp
                    .eq(after.timestamp())
                    .and(decisions::actor_user_id.gt(after.actor_id()))),
            );
        }

        let rows: Vec<LikerRow> = query
            .order((decisions::unix_timestamp.asc(), decisions::actor_user_id.asc()))
            .limit(request.size().overfetch_limit())
            .select(LikerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_page(rows, request)
    }

    async fn list_new_likers(
        &self,
        recipient: &UserId,
        request: &PageRequest<DecisionCursor>,
    ) -> Result<Page<Liker, DecisionCursor>, DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let after_timestamp = request.after().map(DecisionCursor::timestamp);
        let after_actor = request.after().map(DecisionCursor::actor_id);

        let rows: Vec<LikerRow> = sql_query(NEW_LIKERS_SQL)
            .bind::<Text, _>(recipient.as_str())
            .bind::<Nullable<BigInt>, _>(after_timestamp)
            .bind::<Nullable<Text>, _>(after_actor)
            .bind::<BigInt, _>(request.size().overfetch_limit())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_page(rows, request)
    }

    async fn has_reciprocated(
        &self,
        recipient: &UserId,
        actor: &UserId,
    ) -> Result<bool, DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let liked = decisions::table
            .filter(decisions::actor_user_id.eq(recipient.as_str()))
            .filter(decisions::recipient_user_id.eq(actor.as_str()))
            .select(decisions::liked)
            .first::<bool>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(liked.unwrap_or(false))
    }

    async fn count_likers(&self, recipient: &UserId) -> Result<u64, DecisionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = decisions::table
            .filter(decisions::recipient_user_id.eq(recipient.as_str()))
            .filter(decisions::liked.eq(true))
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(count)
            .map_err(|_| DecisionRepositoryError::query(format!("negative liker count {count}")))
    }
}
