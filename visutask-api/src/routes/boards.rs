//! Board endpoints
//!
//! ```text
//! POST   /boards
//! GET    /boards
//! GET    /boards/:board_id
//! PATCH  /boards/:board_id
//! DELETE /boards/:board_id
//! ```
//!
//! The inbox never appears in `GET /boards` and cannot be changed here.

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{
        check_length, double_option,
        views::{board_detail, BoardDetail},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use visutask_shared::{
    auth::{
        authorization::{forbid_inbox, require_board, InboxMutation},
        middleware::CurrentUser,
    },
    error::BoardError,
    models::board::{Board, CreateBoard, UpdateBoard},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl UpdateBoardRequest {
    fn validate(&self) -> ApiResult<()> {
        check_length("name", self.name.as_deref(), 1, 100)?;
        check_length("description", self.description.as_ref().and_then(|d| d.as_deref()), 0, 255)
    }
}

pub async fn create_board(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    req.validate()?;

    let board = Board::create(
        &state.db,
        CreateBoard {
            user_id: current.user_id,
            name: req.name,
            description: req.description,
            is_inbox: false,
        },
    )
    .await?;

    tracing::info!(board_id = %board.id, user_id = %current.user_id, "Board created");

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn list_boards(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = Board::list_by_user(&state.db, current.user_id).await?;

    Ok(Json(boards))
}

pub async fn get_board(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<BoardDetail>> {
    let board = require_board(&state.db, current.user_id, board_id).await?;

    Ok(Json(board_detail(&state.db, board).await?))
}

pub async fn update_board(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    let board = require_board(&state.db, current.user_id, board_id).await?;
    forbid_inbox(board.is_inbox, InboxMutation::UpdateBoard)?;
    req.validate()?;

    let changes = UpdateBoard {
        name: req.name,
        description: req.description,
    };
    if changes.is_empty() {
        return Ok(Json(board));
    }

    let board = Board::update(&state.db, board_id, changes)
        .await?
        .ok_or_else(|| BoardError::missing("Board", board_id))?;

    Ok(Json(board))
}

/// Deletes a board; lists, cards, tags and tag links cascade
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;

    let board = require_board(&mut *tx, current.user_id, board_id).await?;
    forbid_inbox(board.is_inbox, InboxMutation::DeleteBoard)?;
    Board::delete(&mut *tx, board_id).await?;

    tx.commit().await?;

    tracing::info!(%board_id, user_id = %current.user_id, "Board deleted");

    Ok(StatusCode::NO_CONTENT)
}
