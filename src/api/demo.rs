//! Greeting, echo and error-test endpoints

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::Html,
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::json::has_json_content_type;
use crate::api::types::{ApiError, Json};

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<h1>users-api</h1>\n<p>User records over HTTP</p>\n<p>PORT: {}</p>\n",
        state.server_port
    ))
}

/// GET /user/{id}
pub async fn show_user(Path(id): Path<String>) -> String {
    format!("Show user info by ID: {}", id)
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
    pub category: Option<String>,
}

/// GET /search
pub async fn search(Query(params): Query<SearchParams>) -> Html<String> {
    let term = non_empty_or(params.term, "no specified");
    let category = non_empty_or(params.category, "all");

    Html(format!(
        "<h2>Search results:</h2>\n<p>Term: {}</p>\n<p>Category: {}</p>\n",
        escape_html(&term),
        escape_html(&category)
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct FormInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub message: &'static str,
    pub data: FormData,
}

/// POST /form
///
/// Accepts urlencoded or JSON bodies; anything else reads as an empty form.
pub async fn submit_form(request: Request) -> Result<Json<FormResponse>, ApiError> {
    let input = read_form(request).await?;
    debug!(has_name = input.name.is_some(), "Form received");

    Ok(Json(FormResponse {
        message: "Data received",
        data: FormData {
            name: input.name.unwrap_or_else(|| "anonymous".to_string()),
            email: input.email.unwrap_or_else(|| "N/A".to_string()),
        },
    }))
}

async fn read_form(request: Request) -> Result<FormInput, ApiError> {
    use axum::extract::rejection::FormRejection;

    if has_json_content_type(request.headers()) {
        let Json(input) = <Json<FormInput> as FromRequest<()>>::from_request(request, &()).await?;
        return Ok(input);
    }

    match <Form<FormInput> as FromRequest<()>>::from_request(request, &()).await {
        Ok(Form(input)) => Ok(input),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(FormInput::default()),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

#[derive(Debug, Serialize)]
pub struct DataReceived {
    pub message: &'static str,
    pub data: Value,
}

/// POST /api/data
pub async fn receive_data(
    payload: Option<Json<Value>>,
) -> Result<(StatusCode, Json<DataReceived>), ApiError> {
    let data = payload
        .map(Json::into_inner)
        .filter(|value| !is_empty_payload(value))
        .ok_or_else(|| ApiError::bad_request("No data was received"))?;

    Ok((
        StatusCode::CREATED,
        Json(DataReceived {
            message: "JSON data received",
            data,
        }),
    ))
}

/// GET /error
pub async fn intentional_error() -> Result<(), ApiError> {
    Err(ApiError::internal("Intentional error"))
}

/// A payload with no own keys: null, `{}`, `[]`, or a scalar other than a non-empty string
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
