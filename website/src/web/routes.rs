use axum::response::Response;
use axum::routing::get;
use axum::{Router, middleware};
use tower_cookies::CookieManagerLayer;
use tracing::error;

use crate::error::ErrorInfo;
use crate::run::AppState;

use super::entries::{
    delete_entry_handler, edit_entry_handler, post_delete_entry_handler, post_edit_entry_handler,
};
use super::index::{index_handler, post_entry_handler};
use super::middleware::session_middleware;
use super::{error_handler, handle_error, liveness_handler};

pub fn all_routes(state: AppState) -> Router {
    Router::new()
        .merge(guestbook_routes(state))
        .route("/health/liveness", get(liveness_handler))
        .fallback(error_handler)
        .layer(middleware::map_response(response_mapper))
        .layer(CookieManagerLayer::new())
}

fn guestbook_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(post_entry_handler))
        .route(
            "/entries/{entry_id}/edit",
            get(edit_entry_handler).post(post_edit_entry_handler),
        )
        .route(
            "/entries/{entry_id}/delete",
            get(delete_entry_handler).post(post_delete_entry_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

async fn response_mapper(res: Response) -> Response {
    let error = res.extensions().get::<ErrorInfo>();
    if let Some(e) = error {
        if e.status_code.is_server_error() {
            error!("{}", e.message);
            if let Some(bt) = &e.backtrace {
                error!("{}", bt);
            }
        }

        return handle_error(e.clone());
    }
    res
}
