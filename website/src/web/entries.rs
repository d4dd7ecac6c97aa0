use askama::Template;
use axum::http::StatusCode;
use axum::{
    Extension, Form,
    body::Body,
    extract::Path,
    response::{IntoResponse, Redirect, Response},
};
use snafu::{OptionExt, ResultExt};

use crate::{
    Result,
    error::{EntryNotFoundSnafu, ResponseBuilderSnafu, TemplateSnafu},
    models::{DeleteEntryFormData, EditEntryFormData, EntryParams, EntryView, TemplateData},
    session::Session,
};
use guestbook::state::{DeleteRequest, EditRequest, Outcome, PASSWORD_MISMATCH};

#[derive(Template)]
#[template(path = "pages/edit_entry.html")]
struct EditEntryTemplate {
    t: TemplateData,
    entry: EntryView,
}

#[derive(Template)]
#[template(path = "pages/delete_entry.html")]
struct DeleteEntryTemplate {
    t: TemplateData,
    entry: EntryView,
}

#[derive(Template)]
#[template(path = "pages/notice.html")]
struct NoticeTemplate {
    t: TemplateData,
    message: String,
}

/// Asks for the replacement message and the entry password
pub async fn edit_entry_handler(
    Extension(session): Extension<Session>,
    Path(params): Path<EntryParams>,
) -> Result<Response<Body>> {
    let entry = session
        .client
        .find_entry(&params.entry_id)
        .await
        .context(EntryNotFoundSnafu)?;

    let tpl = EditEntryTemplate {
        t: TemplateData::new("Edit Entry"),
        entry: EntryView::from(entry),
    };

    Ok(Response::builder()
        .status(200)
        .body(Body::from(tpl.render().context(TemplateSnafu)?))
        .context(ResponseBuilderSnafu)?)
}

pub async fn post_edit_entry_handler(
    Extension(session): Extension<Session>,
    Path(params): Path<EntryParams>,
    Form(payload): Form<EditEntryFormData>,
) -> Result<Response<Body>> {
    let entry = session
        .client
        .find_entry(&params.entry_id)
        .await
        .context(EntryNotFoundSnafu)?;

    let outcome = session
        .client
        .edit(EditRequest {
            id: entry.id,
            message: payload.message,
            password: payload.password,
        })
        .await;

    render_outcome(outcome)
}

/// Asks for the entry password before deleting
pub async fn delete_entry_handler(
    Extension(session): Extension<Session>,
    Path(params): Path<EntryParams>,
) -> Result<Response<Body>> {
    let entry = session
        .client
        .find_entry(&params.entry_id)
        .await
        .context(EntryNotFoundSnafu)?;

    let tpl = DeleteEntryTemplate {
        t: TemplateData::new("Delete Entry"),
        entry: EntryView::from(entry),
    };

    Ok(Response::builder()
        .status(200)
        .body(Body::from(tpl.render().context(TemplateSnafu)?))
        .context(ResponseBuilderSnafu)?)
}

pub async fn post_delete_entry_handler(
    Extension(session): Extension<Session>,
    Path(params): Path<EntryParams>,
    Form(payload): Form<DeleteEntryFormData>,
) -> Result<Response<Body>> {
    let entry = session
        .client
        .find_entry(&params.entry_id)
        .await
        .context(EntryNotFoundSnafu)?;

    let outcome = session
        .client
        .delete(DeleteRequest {
            id: entry.id,
            password: payload.password,
        })
        .await;

    render_outcome(outcome)
}

/// Password mismatch gets its own notice page, everything else is visible
/// on the guestbook page itself.
fn render_outcome(outcome: Outcome) -> Result<Response<Body>> {
    match outcome {
        Outcome::PasswordMismatch => {
            let tpl = NoticeTemplate {
                t: TemplateData::new("Notice"),
                message: PASSWORD_MISMATCH.to_string(),
            };

            Ok(Response::builder()
                .status(StatusCode::FORBIDDEN)
                .body(Body::from(tpl.render().context(TemplateSnafu)?))
                .context(ResponseBuilderSnafu)?)
        }
        _ => Ok(Redirect::to("/").into_response()),
    }
}
