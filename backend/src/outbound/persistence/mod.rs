//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and the table definitions (`schema.rs`)
//! stay private to this module. Connections come from a `bb8` pool through
//! `diesel-async`, and every database failure is mapped into the port's
//! error type.
//!
//! # Example
//!
//! ```ignore
//! use explore::outbound::persistence::{DbPool, DieselDecisionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/explore")).await?;
//! let repo = DieselDecisionRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_decision_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_decision_repository::DieselDecisionRepository;
pub use migrations::{MIGRATIONS, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
