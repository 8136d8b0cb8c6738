//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use explore::Trace;
#[cfg(debug_assertions)]
use explore::doc::ApiDoc;
use explore::inbound::http::api_scope;
use explore::inbound::http::health::{HealthState, live, ready};
use explore::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        http_state,
    } = config;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready() {
        let health_state = web::Data::new(HealthState::new());
        assert!(!health_state.is_ready());

        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("valid address"),
            HttpState::fixtures(),
        );
        let _server = create_server(health_state.clone(), config).expect("server binds");

        assert!(health_state.is_ready());
    }

    #[rstest]
    #[actix_rt::test]
    async fn app_serves_api_and_probes_with_trace_header() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let app = actix_test::init_service(build_app(
            health_state,
            web::Data::new(HttpState::fixtures()),
        ))
        .await;

        for uri in ["/health/ready", "/api/v1/users/u1/liked-you/count"] {
            let response =
                actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                    .await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert!(response.headers().contains_key("trace-id"), "{uri}");
        }
    }
}
