//! Route definitions for `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login    -> login     (public, counts failures toward lockout)
/// POST /refresh  -> refresh   (public, rotates the refresh token)
/// POST /logout   -> logout    (bearer token, revokes every session)
/// GET  /me       -> me        (bearer token)
/// ```
pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    public
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}
