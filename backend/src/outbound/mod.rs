//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL decision store using Diesel
//! - **cache**: Redis sorted-set like cache
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod cache;
pub mod persistence;
