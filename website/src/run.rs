use axum::Router;
use axum::extract::FromRef;
use snafu::ResultExt;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::Result;
use crate::config::Config;
use crate::error::{BindSnafu, ServerSnafu};
use crate::session::SessionStore;
use crate::web::all_routes;
use guestbook::entry::{EntryRepo, EntryRepoable};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
}

pub fn create_app_state(config: Config, repo: Arc<dyn EntryRepoable>) -> AppState {
    let sessions = SessionStore::new(repo, config.max_sessions);
    AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
    }
}

pub async fn run(config: Config) -> Result<()> {
    let port = config.port;
    let repo = Arc::new(EntryRepo::new(&config.api_url));
    info!("Using guestbook API at {}", &config.api_url);

    let state = create_app_state(config, repo);

    let routes_all = Router::new().merge(all_routes(state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        ),
    );

    // Setup the server
    let ip = "127.0.0.1";
    let addr = format!("{}:{}", ip, port);
    info!("HTTP Server running on {}", addr);

    let listener = TcpListener::bind(addr.as_str())
        .await
        .context(BindSnafu { addr: addr.clone() })?;
    axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServerSnafu)?;

    info!("HTTP Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
pub fn create_test_app_state(repo: Arc<dyn EntryRepoable>) -> AppState {
    let config = Config {
        port: 43700,
        api_url: "http://localhost:43701".to_string(),
        max_sessions: 10,
    };

    create_app_state(config, repo)
}
