use askama::Template;
use axum::{
    Extension, Form,
    body::Body,
    response::{IntoResponse, Redirect, Response},
};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    Result,
    error::{ResponseBuilderSnafu, TemplateSnafu},
    models::{EntryView, TemplateData},
    session::Session,
};
use guestbook::state::{EntryForm, Outcome};

#[derive(Template)]
#[template(path = "pages/index.html")]
struct IndexTemplate {
    t: TemplateData,
    inputs: EntryForm,
    entries: Vec<EntryView>,
    error_message: Option<String>,
}

/// Every page view reloads the list, except the one that started the session
pub async fn index_handler(Extension(session): Extension<Session>) -> Result<Response<Body>> {
    if !session.fresh {
        session.client.load().await;
    }
    let state = session.client.state().await;

    let tpl = IndexTemplate {
        t: TemplateData::new("Guestbook"),
        inputs: state.inputs,
        entries: state.entries.into_iter().map(EntryView::from).collect(),
        error_message: state.error,
    };

    Ok(Response::builder()
        .status(200)
        .body(Body::from(tpl.render().context(TemplateSnafu)?))
        .context(ResponseBuilderSnafu)?)
}

/// Submits the new entry form, the page shows the result either way
pub async fn post_entry_handler(
    Extension(session): Extension<Session>,
    Form(payload): Form<EntryForm>,
) -> Response {
    let outcome = session.client.submit(payload).await;
    if outcome == Outcome::Incomplete {
        debug!("Incomplete guestbook form, nothing sent");
    }

    Redirect::to("/").into_response()
}
