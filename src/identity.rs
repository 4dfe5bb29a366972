//! Middleware that resolves the user behind a request from a trusted header.
//!
//! Authentication itself happens upstream. The identity provider forwards
//! the resolved user ID in a configurable header, and this middleware turns
//! it into a [UserId] request extension.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, UserId, config::IdentityConfig};

/// The state needed for the identity middleware.
#[derive(Debug, Clone)]
pub struct IdentityState {
    pub identity_config: IdentityConfig,
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            identity_config: state.identity_config.clone(),
        }
    }
}

/// Middleware function that checks for a user ID in the identity header.
///
/// The user ID is placed into the request and the request executed normally
/// if the header holds a non-blank value, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn identity_guard(
    State(state): State<IdentityState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_name = state.identity_config.header_name.as_str();

    let user_id = request
        .headers()
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::new);

    let Some(user_id) = user_id else {
        tracing::debug!(
            "Rejecting {} {}: missing or blank \"{header_name}\" header",
            request.method(),
            request.uri()
        );
        return Error::AuthenticationRequired.into_response();
    };

    request.extensions_mut().insert(user_id);
    next.run(request).await
}

#[cfg(test)]
mod identity_guard_tests {
    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{UserId, config::IdentityConfig};

    use super::{IdentityState, identity_guard};

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn echo_user(Extension(user_id): Extension<UserId>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let state = IdentityState {
            identity_config: IdentityConfig {
                header_name: "x-test-user".to_owned(),
            },
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(echo_user))
            .route_layer(middleware::from_fn_with_state(state.clone(), identity_guard))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_user_id_to_handler() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_header("x-test-user", "user_1")
            .await;

        response.assert_status_ok();
        response.assert_text("user_1");
    }

    #[tokio::test]
    async fn trims_surrounding_whitespace() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_header("x-test-user", "  user_1 ")
            .await;

        response.assert_text("user_1");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["error"], "authentication required");
    }

    #[tokio::test]
    async fn blank_header_is_unauthorized() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_header("x-test-user", "   ")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn other_header_is_ignored() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_header("x-user-id", "user_1")
            .await
            .assert_status_unauthorized();
    }
}
