//! HTTP inbound adapter exposing the decision and liked-you endpoints.

pub mod decisions;
pub mod error;
pub mod health;
pub mod liked_you;
pub mod state;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Versioned API scope with every endpoint and the JSON error handlers for
/// body, query and path extraction.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(decisions::put_decision)
        .service(liked_you::list_liked_you)
        .service(liked_you::list_new_liked_you)
        .service(liked_you::count_liked_you)
}
