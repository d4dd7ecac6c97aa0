use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies};

use crate::run::AppState;
use crate::session::SESSION_COOKIE;

/// Attaches the browser's session, starting one on first visit
pub async fn session_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let session_id = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());

    let existing = match session_id {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    };

    let session = match existing {
        Some(session) => session,
        None => {
            let session = state.sessions.create().await;
            cookies.add(
                Cookie::build((SESSION_COOKIE, session.id.clone()))
                    .path("/")
                    .http_only(true)
                    .build(),
            );
            session
        }
    };

    req.extensions_mut().insert(session);
    next.run(req).await
}
