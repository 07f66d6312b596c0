use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use campus_core::session::{OptionalSession, SessionHeader};
use campus_domain::time::Timestamp;
use campus_domain::user::{Role, UserStatus};

use crate::domain::types::User;
use crate::error::MarketError;
use crate::state::AppState;
use crate::usecase::auth::RegisterInput;

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of an account. The password never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub campus: String,
    pub user_type: Role,
    pub user_type_label: &'static str,
    pub credit_score: u32,
    pub status: UserStatus,
    pub registration_date: Option<Timestamp>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username,
            email: user.email,
            campus: user.campus,
            user_type: user.role,
            user_type_label: user.role.label(),
            credit_score: user.credit_score,
            status: user.status,
            registration_date: user.registered_at,
        }
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub campus: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), MarketError> {
    let user = state.auth.register(RegisterInput {
        username: body.username,
        password: body.password,
        email: body.email,
        campus: body.campus,
    })?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, MarketError> {
    let session = state.auth.login(&body.username, &body.password)?;
    Ok(Json(LoginResponse {
        token: session.token.to_string(),
        user: session.user.into(),
    }))
}

// ── POST /auth/logout ────────────────────────────────────────────────────────

pub async fn logout(
    OptionalSession(token): OptionalSession,
    State(state): State<AppState>,
) -> Result<StatusCode, MarketError> {
    if let Some(token) = token {
        state.auth.logout(&token)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn me(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, MarketError> {
    let user = state.auth.require_user(&token)?;
    Ok(Json(user.into()))
}
