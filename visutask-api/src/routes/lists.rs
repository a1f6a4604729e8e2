//! List endpoints
//!
//! ```text
//! POST   /boards/:board_id/lists
//! GET    /boards/:board_id/lists
//! PATCH  /boards/:board_id/lists/:list_id
//! DELETE /boards/:board_id/lists/:list_id
//! ```

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{
        check_length,
        views::{board_detail, ListView},
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
        authorization::{forbid_inbox, require_board, require_list, InboxMutation},
        middleware::CurrentUser,
    },
    error::BoardError,
    models::list::List,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub name: Option<String>,
}

pub async fn create_list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateListRequest>,
) -> ApiResult<(StatusCode, Json<List>)> {
    let board = require_board(&state.db, current.user_id, board_id).await?;
    forbid_inbox(board.is_inbox, InboxMutation::CreateList)?;
    req.validate()?;

    let list = List::create(&state.db, board_id, &req.name).await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// Lists of a board, each with its cards in position order
pub async fn list_lists(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ListView>>> {
    let board = require_board(&state.db, current.user_id, board_id).await?;

    Ok(Json(board_detail(&state.db, board).await?.lists))
}

pub async fn update_list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateListRequest>,
) -> ApiResult<Json<List>> {
    let scope = require_list(&state.db, current.user_id, board_id, list_id).await?;
    forbid_inbox(scope.is_inbox, InboxMutation::UpdateList)?;
    check_length("name", req.name.as_deref(), 1, 100)?;

    let list = match req.name {
        Some(name) => List::rename(&state.db, list_id, &name).await?,
        None => List::find_by_id(&state.db, list_id).await?,
    };

    Ok(Json(list.ok_or_else(|| BoardError::missing("List", list_id))?))
}

/// Deletes a list and its cards
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;

    let scope = require_list(&mut *tx, current.user_id, board_id, list_id).await?;
    forbid_inbox(scope.is_inbox, InboxMutation::DeleteList)?;
    List::delete(&mut *tx, list_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
