mod entries;
mod index;
mod middleware;
mod routes;

use askama::Template;
use axum::body::Body;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::ErrorInfo;
use crate::models::TemplateData;
use crate::{Error, Result};

pub use routes::all_routes;

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorTemplate {
    t: TemplateData,
    error: ErrorInfo,
}

pub fn handle_error(error: ErrorInfo) -> Response<Body> {
    let status_code = error.status_code;
    let tpl = ErrorTemplate {
        t: TemplateData::new(&error.title),
        error,
    };

    match tpl.render() {
        Ok(html) => (status_code, Html(html)).into_response(),
        Err(_) => (status_code, "Something went wrong").into_response(),
    }
}

pub async fn error_handler() -> Result<()> {
    Err(Error::NotFound {
        msg: "Page not found".to_string(),
    })
}

#[derive(Serialize)]
pub struct LiveStatus {
    pub status: String,
}

pub async fn liveness_handler() -> Json<LiveStatus> {
    // Nothing much to check, if it hits this function, it's alive
    Json(LiveStatus {
        status: "UP".to_string(),
    })
}
