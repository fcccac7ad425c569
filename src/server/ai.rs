use anyhow::Result;
use axum::Json;
use axum::extract::multipart::Multipart;
use axum::extract::{Form, FromRequest, Request, State};
use axum::http::header;
use serde::Serialize;

use super::{AppState, ApiError, current_session};
use crate::consts::PROCESSING_ERROR;
use crate::dispatcher::DispatchRequest;
use crate::history::NewEntry;

#[derive(Debug, Serialize)]
pub struct ResultBody {
    pub result: String,
}

/// `POST /api/ai`: form fields `operation` + `text` (multipart or
/// urlencoded), answers `{"result": ...}`.
pub async fn process(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ResultBody>, ApiError> {
    let headers = request.headers().clone();

    let request = match read_form(request, &state).await {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed to read form body");
            return Ok(Json(ResultBody {
                result: PROCESSING_ERROR.to_string(),
            }));
        }
    };

    let result = state.dispatcher.respond(&request).await?;

    if let (Some(history), Some(claims)) = (&state.history, current_session(&state, &headers)) {
        let entry = NewEntry {
            user: &claims.email,
            operation: request.operation.as_deref().unwrap_or_default(),
            text: request.text.as_deref().unwrap_or_default(),
            result: &result,
        };
        if let Err(e) = history.record(entry).await {
            tracing::warn!(error = %format!("{e:#}"), "failed to record history");
        }
    }

    Ok(Json(ResultBody { result }))
}

/// Multipart goes through `Multipart`, everything else through `Form`,
/// which rejects bodies that are not urlencoded.
async fn read_form(request: Request, state: &AppState) -> Result<DispatchRequest> {
    let mut form = DispatchRequest::default();

    if is_multipart(&request) {
        let mut multipart = Multipart::from_request(request, state).await?;
        while let Some(field) = multipart.next_field().await? {
            // Uploaded files and anything else the editor sends along are skipped
            if let Some(slot) = field_slot(&mut form, field.name()) {
                *slot = Some(field.text().await?);
            }
        }
    } else {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state).await?;
        for (name, value) in pairs {
            if let Some(slot) = field_slot(&mut form, Some(&name)) {
                *slot = Some(value);
            }
        }
    }

    Ok(form)
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// The unfilled field `name` maps to. A repeated field keeps its first value.
fn field_slot<'a>(form: &'a mut DispatchRequest, name: Option<&str>) -> Option<&'a mut Option<String>> {
    let slot = match name? {
        "operation" => &mut form.operation,
        "text" => &mut form.text,
        "find" => &mut form.find,
        "replace" => &mut form.replace,
        "entities" => &mut form.entities,
        _ => return None,
    };
    slot.is_none().then_some(slot)
}
