//! Keyset pagination primitives shared by the explore backend.
//!
//! Listing endpoints hand callers opaque continuation tokens instead of
//! numeric offsets. Each storage backend owns its own cursor type:
//!
//! - [`DecisionCursor`] for the durable decision store, ordered by
//!   `(timestamp, actor)`.
//! - [`ScoreCursor`] for the sorted-set like cache, ordered by score.
//!
//! The two encodings are not interchangeable. Operations accept the concrete
//! cursor type of their backend, so handing a cache token to the decision
//! store is a type error rather than a silently wrong page.
//!
//! Callers ask for a page with [`PageRequest`] and receive a [`Page`]. Both
//! carry a validated [`PageSize`].

mod cursor;
mod page;

pub use cursor::{Cursor, CursorError, DecisionCursor, ScoreCursor, TokenOrigin};
pub use page::{Page, PageRequest, PageSize, PageSizeError};
