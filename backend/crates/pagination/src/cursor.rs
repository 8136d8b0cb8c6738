//! Opaque cursor encodings for the decision store and the like cache.
//!
//! Wire formats:
//!
//! - [`DecisionCursor`]: standard padded base64 of `timestamp|actor`.
//! - [`ScoreCursor`]: URL-safe padded base64 of `score:member`, with the
//!   score printed to six decimal places.
//!
//! The identifier is everything after the first separator, so identifiers
//! may themselves contain the separator character.

use std::fmt;

use base64::Engine as _;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use thiserror::Error;

/// Backend that minted a pagination token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenOrigin {
    /// Keyset token over the durable decision table.
    DecisionStore,
    /// Score token over a recipient's sorted like index.
    LikeCache,
}

impl fmt::Display for TokenOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecisionStore => f.write_str("decision store"),
            Self::LikeCache => f.write_str("like cache"),
        }
    }
}

/// Errors raised while decoding a pagination token.
///
/// A malformed token is always an error. Callers must not treat it as a
/// request for the first page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token string was empty.
    #[error("{origin} pagination token is empty")]
    Empty {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
    },
    /// The token was not valid base64 for the backend's alphabet.
    #[error("{origin} pagination token is not valid base64")]
    InvalidEncoding {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
    },
    /// The decoded payload was not UTF-8.
    #[error("{origin} pagination token payload is not valid UTF-8")]
    InvalidUtf8 {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
    },
    /// The payload did not contain the position/identifier separator.
    #[error("{origin} pagination token is missing the `{separator}` separator")]
    MissingSeparator {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
        /// Separator expected by the backend.
        separator: char,
    },
    /// The position component could not be parsed.
    #[error("{origin} pagination token has an invalid position `{value}`")]
    InvalidPosition {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
        /// Raw position text found in the token.
        value: String,
    },
    /// The identifier component was empty.
    #[error("{origin} pagination token has an empty identifier")]
    EmptyIdentifier {
        /// Backend the token was decoded for.
        origin: TokenOrigin,
    },
}

impl CursorError {
    /// Backend whose token failed to decode.
    pub fn origin(&self) -> TokenOrigin {
        match self {
            Self::Empty { origin }
            | Self::InvalidEncoding { origin }
            | Self::InvalidUtf8 { origin }
            | Self::MissingSeparator { origin, .. }
            | Self::InvalidPosition { origin, .. }
            | Self::EmptyIdentifier { origin } => *origin,
        }
    }
}

/// Shared behaviour of backend-specific cursors.
pub trait Cursor: Sized {
    /// Backend that owns this cursor encoding.
    const ORIGIN: TokenOrigin;

    /// Render the cursor as an opaque token.
    fn encode(&self) -> String;

    /// Parse an opaque token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the token is empty, badly encoded, or
    /// does not carry a valid position and identifier.
    fn decode(token: &str) -> Result<Self, CursorError>;

    /// Decode an optional raw token.
    ///
    /// Both `None` and `Some("")` mean "first page": the empty string is what
    /// a final page hands back, and clients commonly echo it.
    ///
    /// # Errors
    ///
    /// Propagates [`Cursor::decode`] failures for non-empty tokens.
    fn decode_optional(token: Option<&str>) -> Result<Option<Self>, CursorError> {
        token
            .filter(|raw| !raw.is_empty())
            .map(Self::decode)
            .transpose()
    }
}

fn decode_payload(
    token: &str,
    origin: TokenOrigin,
    engine: &GeneralPurpose,
) -> Result<String, CursorError> {
    if token.is_empty() {
        return Err(CursorError::Empty { origin });
    }
    let bytes = engine
        .decode(token)
        .map_err(|_| CursorError::InvalidEncoding { origin })?;
    String::from_utf8(bytes).map_err(|_| CursorError::InvalidUtf8 { origin })
}

fn split_payload(
    payload: &str,
    origin: TokenOrigin,
    separator: char,
) -> Result<(&str, &str), CursorError> {
    let (position, identifier) = payload
        .split_once(separator)
        .ok_or(CursorError::MissingSeparator { origin, separator })?;
    if identifier.is_empty() {
        return Err(CursorError::EmptyIdentifier { origin });
    }
    Ok((position, identifier))
}

/// Keyset position within the decision store, ordered by `(timestamp, actor)`.
///
/// The cursor names the last row a page returned; the next page starts
/// strictly after it.
///
/// # Examples
///
/// ```
/// use pagination::{Cursor, DecisionCursor};
///
/// let cursor = DecisionCursor::new(1_700_000_000, "user-7");
/// let token = cursor.encode();
/// assert_eq!(DecisionCursor::decode(&token), Ok(cursor));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionCursor {
    timestamp: i64,
    actor_id: String,
}

impl DecisionCursor {
    const SEPARATOR: char = '|';

    /// Build a cursor from a decision timestamp and actor identifier.
    pub fn new(timestamp: i64, actor_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            actor_id: actor_id.into(),
        }
    }

    /// Decision timestamp in seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Actor identifier used as the tie-breaker.
    pub fn actor_id(&self) -> &str {
        self.actor_id.as_str()
    }
}

impl Cursor for DecisionCursor {
    const ORIGIN: TokenOrigin = TokenOrigin::DecisionStore;

    fn encode(&self) -> String {
        let payload = format!("{}{}{}", self.timestamp, Self::SEPARATOR, self.actor_id);
        STANDARD.encode(payload)
    }

    fn decode(token: &str) -> Result<Self, CursorError> {
        let payload = decode_payload(token, Self::ORIGIN, &STANDARD)?;
        let (position, actor_id) = split_payload(&payload, Self::ORIGIN, Self::SEPARATOR)?;
        let timestamp = position
            .parse::<i64>()
            .map_err(|_| CursorError::InvalidPosition {
                origin: Self::ORIGIN,
                value: position.to_owned(),
            })?;
        Ok(Self::new(timestamp, actor_id))
    }
}

/// Score position within a sorted-set index.
///
/// Listing resumes at scores strictly greater than [`ScoreCursor::score`].
/// The member is carried for diagnostics; members sharing the boundary score
/// are not revisited.
///
/// # Examples
///
/// ```
/// use pagination::{Cursor, ScoreCursor};
///
/// let cursor = ScoreCursor::new(200.0, "user-b");
/// let decoded = ScoreCursor::decode(&cursor.encode()).expect("token decodes");
/// assert_eq!(decoded.member(), "user-b");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCursor {
    score: f64,
    member: String,
}

impl ScoreCursor {
    const SEPARATOR: char = ':';

    /// Build a cursor from a sorted-set score and member.
    pub fn new(score: f64, member: impl Into<String>) -> Self {
        Self {
            score,
            member: member.into(),
        }
    }

    /// Score of the last member returned.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Last member returned.
    pub fn member(&self) -> &str {
        self.member.as_str()
    }
}

impl Cursor for ScoreCursor {
    const ORIGIN: TokenOrigin = TokenOrigin::LikeCache;

    fn encode(&self) -> String {
        let payload = format!("{:.6}{}{}", self.score, Self::SEPARATOR, self.member);
        URL_SAFE.encode(payload)
    }

    fn decode(token: &str) -> Result<Self, CursorError> {
        let payload = decode_payload(token, Self::ORIGIN, &URL_SAFE)?;
        let (position, member) = split_payload(&payload, Self::ORIGIN, Self::SEPARATOR)?;
        let score = position
            .parse::<f64>()
            .ok()
            .filter(|score| !score.is_nan())
            .ok_or_else(|| CursorError::InvalidPosition {
                origin: Self::ORIGIN,
                value: position.to_owned(),
            })?;
        Ok(Self::new(score, member))
    }
}
