use axum::{extract::Request, middleware::Next, response::Response, Router};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

#[allow(dead_code)]
pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        email: "inspector@example.com".to_string(),
        role: "reporter".to_string(),
    }
}

async fn inject_test_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_user());
    next.run(request).await
}

/// Wrap a router so every request carries an authenticated identity,
/// bypassing the bearer token guard in tests.
#[allow(dead_code)]
pub fn with_test_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_test_user_middleware))
}
