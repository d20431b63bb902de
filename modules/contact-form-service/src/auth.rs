//! Static bearer-token gate for admin routes.

use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Json, Response};
use contact_form_types::ErrorResponse;

pub struct AdminGate {
    token: Option<String>,
}

impl AdminGate {
    /// With no token configured every request is refused.
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), Response> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim);

        match (&self.token, presented) {
            (Some(expected), Some(token)) if token == expected.as_str() => Ok(()),
            _ => {
                log::warn!("Rejected admin request");
                Err(unauthorized())
            }
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            detail: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}
