//! Domain primitives, ports, and services.
//!
//! Purpose: model like/pass decisions and the "liked you" views derived from
//! them, independent of storage and transport. Adapters depend on this module;
//! it depends on none of them.
//!
//! Public surface:
//! - [`Decision`], [`Liker`], [`CachedLike`], [`UserId`]: data model.
//! - [`ExploreService`]: implements the driving ports in [`ports`].
//! - [`LikeCacheReconciler`]: repairs like-cache drift on demand.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.

pub mod decision;
pub mod error;
pub mod explore_service;
pub mod like_cache_reconciler;
pub mod ports;
pub mod trace_id;

pub use self::decision::{
    CachedLike, Decision, Liker, UserId, UserIdValidationError, timestamp_score,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::explore_service::{ExploreConfig, ExploreService};
pub use self::like_cache_reconciler::{LikeCacheReconciler, ReconcileReport};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for domain and adapter code.
///
/// # Examples
/// ```
/// use explore::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u64> {
///     Err(Error::service_unavailable("store down"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
