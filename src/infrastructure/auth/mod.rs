//! Authentication infrastructure module
//!
//! This module provides JWT signing for issued account tokens.

mod jwt;

pub use jwt::JwtTokenIssuer;
