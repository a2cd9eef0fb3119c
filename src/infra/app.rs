use axum::{Router, http, middleware};
use http::header::CONTENT_TYPE;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::request_gate,
        routes::{api_router, pages},
    },
    infra::setup::init_tracing,
};

pub fn create_app(app_state: AppState) -> Router {
    init_tracing();
    router(app_state)
}

/// Full router without the global tracing subscriber, used by tests too.
///
/// Every non-`/api` path, matched or not, sits behind the request gate.
/// `/api` handlers verify the session themselves and answer JSON.
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let pages = pages::router().layer(middleware::from_fn_with_state(
        app_state.clone(),
        request_gate,
    ));

    Router::new()
        .nest("/api", api_router())
        .merge(pages)
        .with_state(app_state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use axum_test::TestServer;

    use super::router;
    use crate::test_utils::TestAppStateBuilder;

    #[tokio::test]
    async fn security_headers_are_set() {
        let server = TestServer::new(router(TestAppStateBuilder::new().build())).unwrap();
        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
        assert_eq!(response.header(header::X_FRAME_OPTIONS), "DENY");
    }

    #[tokio::test]
    async fn api_routes_answer_json_not_redirects() {
        let server = TestServer::new(router(TestAppStateBuilder::new().build())).unwrap();
        let response = server.get("/api/auth/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn unknown_api_path_is_json_404() {
        let server = TestServer::new(router(TestAppStateBuilder::new().build())).unwrap();
        let response = server.get("/api/nothing-here").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<serde_json::Value>()["code"], "NOT_FOUND");
    }
}
