//! Decision data model.
//!
//! A decision is one user's like or pass toward another. Only the latest
//! decision per (actor, recipient) pair is retained. [`Liker`] and
//! [`CachedLike`] are read-only projections produced by the durable store and
//! the like cache respectively.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// Identifier carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Opaque user identifier.
///
/// # Examples
/// ```
/// use explore::domain::UserId;
///
/// let id = UserId::new("user-42").expect("valid id");
/// assert_eq!(id.as_ref(), "user-42");
/// assert!(UserId::new(" user-42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Rejects empty identifiers and identifiers with surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdValidationError::SurroundingWhitespace);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A recorded like or pass from `actor` toward `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    actor: UserId,
    recipient: UserId,
    liked: bool,
    timestamp: i64,
}

impl Decision {
    /// Build a decision stamped at `timestamp` (seconds since the Unix epoch).
    pub fn new(actor: UserId, recipient: UserId, liked: bool, timestamp: i64) -> Self {
        Self {
            actor,
            recipient,
            liked,
            timestamp,
        }
    }

    /// User who made the decision.
    pub fn actor(&self) -> &UserId {
        &self.actor
    }

    /// User the decision is about.
    pub fn recipient(&self) -> &UserId {
        &self.recipient
    }

    /// Whether the actor liked the recipient.
    pub fn liked(&self) -> bool {
        self.liked
    }

    /// Decision time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// A user who currently likes a given recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liker {
    actor_id: UserId,
    timestamp: i64,
}

impl Liker {
    /// Build a liker view.
    pub fn new(actor_id: UserId, timestamp: i64) -> Self {
        Self {
            actor_id,
            timestamp,
        }
    }

    /// The liking user.
    pub fn actor_id(&self) -> &UserId {
        &self.actor_id
    }

    /// When the like was recorded, in seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// One member of a recipient's like-cache index.
///
/// The score is the decision timestamp as stored by the sorted set.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLike {
    actor_id: UserId,
    score: f64,
}

impl CachedLike {
    /// Build a cache entry.
    pub fn new(actor_id: UserId, score: f64) -> Self {
        Self { actor_id, score }
    }

    /// Entry for a durable liker, scored by its decision timestamp.
    pub fn from_liker(liker: &Liker) -> Self {
        Self::new(liker.actor_id.clone(), timestamp_score(liker.timestamp))
    }

    /// The liking user.
    pub fn actor_id(&self) -> &UserId {
        &self.actor_id
    }

    /// Sorted-set score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Convert into the liker view, truncating the score to whole seconds.
    pub fn into_liker(self) -> Liker {
        // Scores are written from whole-second timestamps; `as` saturates.
        let timestamp = self.score.trunc() as i64;
        Liker::new(self.actor_id, timestamp)
    }
}

/// Sorted-set score for a decision timestamp.
///
/// Exact for every timestamp below 2^53 seconds.
pub fn timestamp_score(timestamp: i64) -> f64 {
    timestamp as f64
}
