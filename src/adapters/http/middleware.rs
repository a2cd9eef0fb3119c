use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::{
        app_state::AppState,
        session::{SESSION_COOKIE, append_cookie, cleared_session_cookie},
    },
    application::route_policy::{GateDecision, LOGIN_PATH},
};

/// Request gate for page routes.
///
/// Consults the route policy once per request. On success the verified claim
/// is placed in the request extensions for the page handler. Never fails:
/// anything wrong with the session ends in a redirect to the login page.
pub async fn request_gate(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let token = cookies.get(SESSION_COOKIE).map(|c| c.value().to_owned());

    match app_state
        .route_policy
        .decide(&path, token.as_deref(), &app_state.token_codec)
    {
        GateDecision::Proceed(claim) => {
            tracing::debug!(%path, authenticated = claim.is_some(), "gate: proceed");
            if let Some(claim) = claim {
                request.extensions_mut().insert(claim);
            }
            next.run(request).await
        }
        GateDecision::Login { clear_session } => {
            tracing::debug!(%path, clear_session, "gate: login required");
            let mut headers = HeaderMap::new();
            if clear_session
                && let Err(err) = append_cookie(
                    &mut headers,
                    cleared_session_cookie(app_state.config.cookie_secure),
                )
            {
                tracing::error!(error = ?err, "failed to clear session cookie");
            }
            (headers, Redirect::temporary(LOGIN_PATH)).into_response()
        }
        GateDecision::Redirect(to) => {
            tracing::debug!(%path, to, "gate: redirect");
            Redirect::temporary(to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;

    use crate::{
        domain::entities::role::Role,
        infra::app::router,
        test_utils::{TestAppStateBuilder, create_test_user, session_header},
    };

    fn server() -> TestServer {
        TestServer::new(router(TestAppStateBuilder::new().build())).unwrap()
    }

    fn location(response: &axum_test::TestResponse) -> String {
        response
            .header(header::LOCATION)
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn public_pages_pass_without_token() {
        let server = server();
        for path in ["/", "/login", "/register"] {
            server.get(path).await.assert_status(StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn protected_page_without_token_redirects_to_login() {
        let response = server().get("/dashboard").await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn unmatched_paths_without_token_redirect_to_login() {
        let server = server();
        for path in [
            "/admin/unknown",
            "/admin/",
            "/store-owner/anything",
            "/nonexistent",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(location(&response), "/login");
        }
    }

    #[tokio::test]
    async fn unmatched_admin_path_with_customer_token_goes_to_neutral_page() {
        let customer = create_test_user(Role::Customer, |_| {});
        let response = server()
            .get("/admin/unknown")
            .add_header(header::COOKIE, session_header(&customer))
            .await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn tampered_token_redirects_and_clears_session() {
        let response = server()
            .get("/stores")
            .add_header(
                header::COOKIE,
                HeaderValue::from_static("auth-token=eyJpZCI6MX0.bm90LWEtdGFn"),
            )
            .await;

        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login");
        let cleared = response.cookies();
        let cookie = cleared.get("auth-token").unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[tokio::test]
    async fn customer_in_admin_area_goes_to_neutral_page() {
        let customer = create_test_user(Role::Customer, |_| {});
        let response = server()
            .get("/admin")
            .add_header(header::COOKIE, session_header(&customer))
            .await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn customer_in_store_owner_area_goes_to_own_landing() {
        let customer = create_test_user(Role::Customer, |_| {});
        let response = server()
            .get("/store-owner/stores")
            .add_header(header::COOKIE, session_header(&customer))
            .await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/stores");
    }

    #[tokio::test]
    async fn store_owner_reaches_own_area() {
        let owner = create_test_user(Role::StoreOwner, |_| {});
        let state = TestAppStateBuilder::new().with_users(vec![owner.clone()]).build();
        let server = TestServer::new(router(state)).unwrap();

        let response = server
            .get("/store-owner/stores")
            .add_header(header::COOKIE, session_header(&owner))
            .await;

        response.assert_status(StatusCode::OK);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["page"], "store-owner/stores");
        assert_eq!(body["viewer"]["role"], "store_owner");
    }

    #[tokio::test]
    async fn api_routes_are_not_gated() {
        let response = server().get("/api/stores").await;
        response.assert_status(StatusCode::OK);
    }
}
