//! Request/response types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod user;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use user::{LoginRequest, LoginResponse, MessageResponse, RegisterUserRequest, UserResponse};
