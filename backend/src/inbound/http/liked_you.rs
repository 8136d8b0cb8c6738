//! "Liked you" API handlers.
//!
//! ```text
//! GET /api/v1/users/{recipientUserId}/liked-you?paginationToken=...
//! GET /api/v1/users/{recipientUserId}/liked-you/new?paginationToken=...
//! GET /api/v1/users/{recipientUserId}/liked-you/count
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::ports::{
    CountLikedYouRequest, CountLikedYouResponse, ListLikedYouRequest, ListLikedYouResponse,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query parameters shared by the listing endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Opaque token from a previous page's `nextPaginationToken`.
    pub pagination_token: Option<String>,
}

fn parse_recipient(raw: String) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(format!("recipient user id is invalid: {err}"))
            .with_details(json!({ "field": "recipientUserId" }))
    })
}

fn list_request(
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<ListLikedYouRequest> {
    Ok(ListLikedYouRequest {
        recipient_user_id: parse_recipient(path.into_inner())?,
        pagination_token: query.into_inner().pagination_token,
    })
}

/// List users who like the recipient, oldest like first.
///
/// A malformed token is rejected rather than restarting from the first page.
#[utoipa::path(
    get,
    path = "/api/v1/users/{recipientUserId}/liked-you",
    params(
        ("recipientUserId" = String, Path, description = "Recipient user id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of likers", body = ListLikedYouResponse),
        (status = 400, description = "Invalid recipient or pagination token", body = Error),
        (status = 503, description = "Like cache unavailable", body = Error)
    ),
    tags = ["liked-you"],
    operation_id = "listLikedYou"
)]
#[get("/users/{recipientUserId}/liked-you")]
pub async fn list_liked_you(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<web::Json<ListLikedYouResponse>> {
    let request = list_request(path, query)?;
    let response = state.liked_you.list_liked_you(request).await?;
    Ok(web::Json(response))
}

/// List likers the recipient has not liked back.
///
/// Pages follow the same token as [`list_liked_you`]; a page may hold fewer
/// entries than the page size while a next token is still returned.
#[utoipa::path(
    get,
    path = "/api/v1/users/{recipientUserId}/liked-you/new",
    params(
        ("recipientUserId" = String, Path, description = "Recipient user id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of unreciprocated likers", body = ListLikedYouResponse),
        (status = 400, description = "Invalid recipient or pagination token", body = Error),
        (status = 503, description = "Like cache or decision store unavailable", body = Error)
    ),
    tags = ["liked-you"],
    operation_id = "listNewLikedYou"
)]
#[get("/users/{recipientUserId}/liked-you/new")]
pub async fn list_new_liked_you(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<web::Json<ListLikedYouResponse>> {
    let request = list_request(path, query)?;
    let response = state.liked_you.list_new_liked_you(request).await?;
    Ok(web::Json(response))
}

/// Count users who like the recipient.
#[utoipa::path(
    get,
    path = "/api/v1/users/{recipientUserId}/liked-you/count",
    params(("recipientUserId" = String, Path, description = "Recipient user id")),
    responses(
        (status = 200, description = "Liker count", body = CountLikedYouResponse),
        (status = 400, description = "Invalid recipient", body = Error),
        (status = 503, description = "Like cache unavailable", body = Error)
    ),
    tags = ["liked-you"],
    operation_id = "countLikedYou"
)]
#[get("/users/{recipientUserId}/liked-you/count")]
pub async fn count_liked_you(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CountLikedYouResponse>> {
    let request = CountLikedYouRequest {
        recipient_user_id: parse_recipient(path.into_inner())?,
    };
    let response = state.liked_you.count_liked_you(request).await?;
    Ok(web::Json(response))
}

#[cfg(test)]
#[path = "liked_you_tests.rs"]
mod tests;
