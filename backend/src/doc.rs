//! OpenAPI documentation for the HTTP surface.
//!
//! Served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary for external tooling.

use utoipa::OpenApi;

use crate::domain::ports::{
    CountLikedYouResponse, LikerPayload, ListLikedYouResponse, PutDecisionRequest,
    PutDecisionResponse,
};
use crate::domain::{Error, ErrorCode};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Explore API",
        description = "Record like/pass decisions and read who liked a user."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::decisions::put_decision,
        crate::inbound::http::liked_you::list_liked_you,
        crate::inbound::http::liked_you::list_new_liked_you,
        crate::inbound::http::liked_you::count_liked_you,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PutDecisionRequest,
        PutDecisionResponse,
        ListLikedYouResponse,
        LikerPayload,
        CountLikedYouResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "decisions", description = "Recording likes and passes"),
        (name = "liked-you", description = "Who liked a user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_fields(doc: &utoipa::openapi::OpenApi, name: &str) -> Vec<String> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/decisions",
            "/api/v1/users/{recipientUserId}/liked-you",
            "/api/v1/users/{recipientUserId}/liked-you/new",
            "/api/v1/users/{recipientUserId}/liked-you/count",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[rstest]
    fn payload_schemas_use_camel_case() {
        let doc = ApiDoc::openapi();
        let request = object_fields(&doc, "PutDecisionRequest");
        assert!(request.contains(&"actorUserId".to_owned()));
        assert!(request.contains(&"likedRecipient".to_owned()));

        let page = object_fields(&doc, "ListLikedYouResponse");
        assert!(page.contains(&"nextPaginationToken".to_owned()));
    }
}
