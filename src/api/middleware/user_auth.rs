//! Bearer-token authentication for account endpoints

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Extractor that requires a valid account token
///
/// Extracts the token from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating bearer token");

        let user = state
            .account_service
            .authenticate_token(&token)
            .await
            .map_err(rejection_for)?;

        Ok(RequireUser(user))
    }
}

/// Bad or orphaned tokens are 401s; anything else is a server failure
fn rejection_for(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCredentials { message } | DomainError::NotFound { message } => {
            ApiError::unauthorized(message)
        }
        other => ApiError::from(other),
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();

            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>' header",
    ))
}
