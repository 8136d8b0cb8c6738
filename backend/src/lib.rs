//! Like/pass decisions and "liked you" views.
//!
//! Decisions are stored durably in PostgreSQL and mirrored into a Redis
//! sorted set per recipient for fast listing and counting. The crate is laid
//! out as ports and adapters: [`domain`] holds the rules and port traits,
//! [`inbound`] and [`outbound`] hold the HTTP, Diesel and Redis adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
