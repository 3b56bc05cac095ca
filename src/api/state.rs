//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::account::AccountService;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::user::UserRecordService;

/// Application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserRecordService>,
    pub accounts: Arc<AccountService>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// Port shown on the greeting page
    pub server_port: u16,
}

impl AppState {
    pub fn new(
        users: Arc<UserRecordService>,
        accounts: Arc<AccountService>,
        jwt_service: Arc<dyn JwtGenerator>,
        server_port: u16,
    ) -> Self {
        Self {
            users,
            accounts,
            jwt_service,
            server_port,
        }
    }
}
