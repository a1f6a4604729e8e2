//! `GET /users/me`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::views::UserResponse,
};
use axum::{extract::State, Extension, Json};
use visutask_shared::{auth::middleware::CurrentUser, models::user::User};

pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, current.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("The credentials could not be validated".to_string()))?;

    Ok(Json(user.into()))
}
