//! `GET /inbox`: the current user's inbox with its lists and cards

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::views::{board_detail, BoardDetail},
};
use axum::{extract::State, Extension, Json};
use visutask_shared::{auth::middleware::CurrentUser, models::board::Board};

pub async fn get_inbox(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<BoardDetail>> {
    let inbox = Board::find_inbox(&state.db, current.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inbox not found for the current user.".to_string()))?;

    Ok(Json(board_detail(&state.db, inbox).await?))
}
