use crate::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct SubscribeRequest {
    #[serde(default)]
    email: Option<Value>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Returns the address when the body carries a non-empty `email` string.
fn extract_email(body: &[u8]) -> Result<String, &'static str> {
    let request: SubscribeRequest =
        serde_json::from_slice(body).map_err(|_| "Invalid request body")?;

    match request.email {
        Some(Value::String(email)) if !email.trim().is_empty() => Ok(email.trim().to_string()),
        _ => Err("Email is required"),
    }
}

/// POST /api/subscribe
///
/// Forwards `{email}` to the CMS newsletter endpoint. Upstream replies are
/// passed back with their status; a transport failure becomes a generic 500.
pub async fn subscribe_handler(State(app_state): State<AppState>, body: Bytes) -> Response {
    let email = match extract_email(&body) {
        Ok(email) => email,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let endpoint = app_state.config.cms.subscribe_path.as_str();
    match app_state
        .cms
        .post_json(endpoint, &json!({ "email": email }))
        .await
    {
        Ok(reply) => {
            let status =
                StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if reply.is_success() {
                info!("Subscription forwarded, upstream status {}", reply.status);
                let data = reply.json().unwrap_or_else(|| json!({ "success": true }));
                (status, Json(data)).into_response()
            } else {
                info!("Subscription rejected upstream with status {}", reply.status);
                let data = reply.json().unwrap_or_else(|| json!({}));
                (status, Json(data)).into_response()
            }
        }
        Err(e) => {
            error!("Subscription proxy error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
