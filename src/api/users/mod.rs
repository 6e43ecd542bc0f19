//! Account API endpoints
//!
//! Registration, login, logout, current-user and lookup-by-id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, LoginRequest, LoginResponse, MessageResponse, RegisterUserRequest,
    UserResponse,
};
use crate::infrastructure::user::RegisterRequest;

/// Create the account router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .route("/{id}", get(get_user))
}

/// Register a new account
///
/// POST /users
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .account_service
        .register(RegisterRequest {
            email: request.email,
            password: request.password,
            username: request.username,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

/// Verify credentials and issue a token
///
/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state
        .account_service
        .verify_and_issue_token(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        user: UserResponse::from(&issued.user),
        expires_at: issued.expires_at.to_rfc3339(),
    }))
}

/// Logout
///
/// POST /users/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(_user: RequireUser) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// GET /users/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.account_service.find_user_by_id(&id).await?;
    Ok(Json(UserResponse::from(&user)))
}
