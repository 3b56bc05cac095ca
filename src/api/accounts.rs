//! Database account endpoints: listing, registration, login and a token-guarded route

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::api::middleware::RequireToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Account, DomainError};
use crate::infrastructure::account::RegisterAccountRequest;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// GET /db-users
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    debug!("Listing database accounts");

    let accounts = state.accounts.list().await.map_err(|e| {
        error!(error = %e, "Failed to list accounts");
        ApiError::internal("Error communicating with database")
    })?;

    Ok(Json(accounts))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    debug!("Registering account");

    state
        .accounts
        .register(RegisterAccountRequest {
            name: request.name,
            email,
            password,
        })
        .await
        .map_err(|e| match e {
            DomainError::Conflict { message } => ApiError::conflict(message),
            other => {
                error!(error = %other, "Failed to register account");
                ApiError::internal("Error registering user")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    };

    let token = state
        .accounts
        .login(&email, &password)
        .await?
        .ok_or_else(|| ApiError::bad_request(INVALID_CREDENTIALS))?;

    Ok(Json(LoginResponse { token }))
}

/// GET /protected-route
pub async fn protected_route(RequireToken(claims): RequireToken) -> &'static str {
    debug!(id = claims.id, role = %claims.role, "Protected route accessed");
    "This is a protected route."
}
