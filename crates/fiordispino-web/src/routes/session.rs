use axum::extract::rejection::JsonRejection;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::cookies::TokenCookieStore;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

/// `POST /api/auth`: `{action: "login", token}` or `{action: "logout"}`
pub async fn update_session(
    jar: CookieJar,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let mut cookies = TokenCookieStore::new(jar);

    match request.action.as_deref() {
        Some("login") => {
            let token = request
                .token
                .filter(|t| !t.is_empty())
                .ok_or(AppError::MissingToken)?;
            cookies.set_token(&token);
            info!("Session cookie set");
        }
        Some("logout") => {
            cookies.remove_token();
            info!("Session cookie removed");
        }
        _ => return Err(AppError::InvalidAction),
    }

    Ok((cookies.into_jar(), Json(json!({ "success": true }))))
}
