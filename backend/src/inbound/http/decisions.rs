//! Decision API handler.
//!
//! ```text
//! PUT /api/v1/decisions {"actorUserId":"u1","recipientUserId":"u2","likedRecipient":true}
//! ```

use actix_web::{put, web};

use crate::domain::Error;
use crate::domain::ports::{PutDecisionRequest, PutDecisionResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Record a like or pass and report whether the pair now like each other.
///
/// Re-sending a decision for the same pair overwrites the earlier one.
#[utoipa::path(
    put,
    path = "/api/v1/decisions",
    request_body = PutDecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = PutDecisionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Decision store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["decisions"],
    operation_id = "putDecision"
)]
#[put("/decisions")]
pub async fn put_decision(
    state: web::Data<HttpState>,
    payload: web::Json<PutDecisionRequest>,
) -> ApiResult<web::Json<PutDecisionResponse>> {
    let response = state.decisions.put_decision(payload.into_inner()).await?;
    Ok(web::Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{FixtureLikedYouQuery, MockDecisionCommand};
    use crate::domain::{ErrorCode, UserId};
    use crate::inbound::http::api_scope;

    async fn send(command: MockDecisionCommand, body: Value) -> (StatusCode, Value) {
        let state = HttpState::new(Arc::new(command), Arc::new(FixtureLikedYouQuery));
        let app =
            actix_test::init_service(App::new().app_data(web::Data::new(state)).service(api_scope()))
                .await;
        let request = actix_test::TestRequest::put()
            .uri("/api/v1/decisions")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&body).expect("JSON response");
        (status, value)
    }

    #[rstest]
    #[actix_web::test]
    async fn records_decision_and_returns_mutual_flag() {
        let mut command = MockDecisionCommand::new();
        command
            .expect_put_decision()
            .withf(|request| {
                request.actor_user_id == UserId::new("u1").expect("valid id")
                    && request.recipient_user_id == UserId::new("u2").expect("valid id")
                    && request.liked_recipient
            })
            .times(1)
            .return_once(|_| Ok(PutDecisionResponse { mutual_likes: true }));

        let (status, body) = send(
            command,
            json!({ "actorUserId": "u1", "recipientUserId": "u2", "likedRecipient": true }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "mutualLikes": true }));
    }

    #[rstest]
    #[case(json!({ "actorUserId": "  ", "recipientUserId": "u2", "likedRecipient": true }))]
    #[case(json!({ "actorUserId": "u1", "likedRecipient": true }))]
    #[case(json!({ "actorUserId": "u1", "recipientUserId": "u2", "likedRecipient": "yes" }))]
    #[actix_web::test]
    async fn malformed_bodies_are_rejected_before_the_domain(#[case] body: Value) {
        let mut command = MockDecisionCommand::new();
        command.expect_put_decision().never();

        let (status, payload) = send(command, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["code"], json!("invalid_request"));
    }

    #[rstest]
    #[actix_web::test]
    async fn store_outage_surfaces_as_service_unavailable() {
        let mut command = MockDecisionCommand::new();
        command
            .expect_put_decision()
            .return_once(|_| Err(Error::service_unavailable("decision store unavailable")));

        let (status, payload) = send(
            command,
            json!({ "actorUserId": "u1", "recipientUserId": "u2", "likedRecipient": false }),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let error: Error = serde_json::from_value(payload).expect("error payload");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
