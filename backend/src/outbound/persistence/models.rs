//! Internal Diesel row structs for the decision store.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::decisions;

/// Insertable decision row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = decisions)]
pub(crate) struct NewDecisionRow<'a> {
    pub actor_user_id: &'a str,
    pub recipient_user_id: &'a str,
    pub liked: bool,
    pub unix_timestamp: i64,
}

/// Projection of a liked decision onto its actor and timestamp.
///
/// Also loadable from raw SQL, where column types are taken from the
/// `decisions` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = decisions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LikerRow {
    pub actor_user_id: String,
    pub unix_timestamp: i64,
}
