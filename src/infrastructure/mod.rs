//! Infrastructure layer - Implementations of the domain traits

pub mod auth;
pub mod logging;
pub mod secrets;
pub mod user;
