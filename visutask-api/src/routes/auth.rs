//! Authentication endpoints
//!
//! ```text
//! POST /auth/register   {username, email, password}  -> 201 user
//! POST /auth/login      {username, password}         -> 200 tokens
//! POST /auth/refresh    {refresh_token}              -> 200 access token
//! ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::views::UserResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;
use visutask_shared::{
    auth::{jwt, password},
    models::{
        board::{Board, CreateBoard, INBOX_BOARD_NAME, INBOX_LIST_NAME},
        list::List,
        user::{CreateUser, User},
    },
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 256, message = "Password must be 8 to 256 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Always "bearer"
    pub token_type: &'static str,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenResponse {
    fn bearer(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer",
            expires_in: jwt::TokenType::Access.lifetime().num_seconds(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Registers a user together with their inbox board and its default list
///
/// All three rows are written in one transaction.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let inbox = Board::create(
        &mut *tx,
        CreateBoard {
            user_id: user.id,
            name: INBOX_BOARD_NAME.to_string(),
            description: None,
            is_inbox: true,
        },
    )
    .await?;
    List::create(&mut *tx, inbox.id, INBOX_LIST_NAME).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges username and password for an access/refresh token pair
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let rejected = || ApiError::Unauthorized("Incorrect username or password".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(rejected)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(username = %req.username, "Failed login attempt");
        return Err(rejected());
    }

    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;
    tracing::debug!(user_id = %user.id, "Issued token pair");

    Ok(Json(TokenResponse::bearer(
        pair.access_token,
        Some(pair.refresh_token),
    )))
}

/// Issues a new access token from a refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(TokenResponse::bearer(access_token, None)))
}
