//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::user::AccountService;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
}

impl AppState {
    pub fn new(account_service: AccountService) -> Self {
        Self {
            account_service: Arc::new(account_service),
        }
    }
}
