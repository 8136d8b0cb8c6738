//! Diesel table definitions for the decision store.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Latest like or pass per (actor, recipient) pair.
    decisions (actor_user_id, recipient_user_id) {
        /// User who made the decision.
        actor_user_id -> Text,
        /// User the decision is about.
        recipient_user_id -> Text,
        /// `true` for a like, `false` for a pass.
        liked -> Bool,
        /// Decision time in seconds since the Unix epoch.
        unix_timestamp -> Int8,
    }
}
