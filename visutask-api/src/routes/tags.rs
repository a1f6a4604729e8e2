//! Tag endpoints
//!
//! ```text
//! POST   /boards/:board_id/tags
//! GET    /boards/:board_id/tags
//! PATCH  /boards/:board_id/tags/:tag_id
//! DELETE /boards/:board_id/tags/:tag_id
//! POST   /cards/:card_id/tags/:tag_id
//! DELETE /cards/:card_id/tags/:tag_id
//! ```

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{
        check_color, check_length, double_option,
        views::{card_view, CardView},
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
        authorization::{forbid_inbox, require_board, require_tag, InboxMutation},
        middleware::CurrentUser,
    },
    error::BoardError,
    models::tag::{Tag, UpdateTag},
    tagging::{attach_tag, detach_tag, TagLink},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: Option<String>,

    #[validate(length(equal = 7, message = "Color must be exactly 7 characters"))]
    pub color: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,

    pub color: Option<String>,
}

impl UpdateTagRequest {
    fn validate(&self) -> ApiResult<()> {
        check_length("name", self.name.as_ref().and_then(|n| n.as_deref()), 1, 50)?;
        check_color("color", self.color.as_deref())
    }
}

pub async fn create_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let board = require_board(&state.db, current.user_id, board_id).await?;
    forbid_inbox(board.is_inbox, InboxMutation::CreateTag)?;
    req.validate()?;
    check_color("color", Some(&req.color))?;

    let tag = Tag::create(&state.db, board_id, req.name, &req.color).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn list_tags(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Tag>>> {
    require_board(&state.db, current.user_id, board_id).await?;

    Ok(Json(Tag::list_by_board(&state.db, board_id).await?))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, tag_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTagRequest>,
) -> ApiResult<Json<Tag>> {
    require_tag(&state.db, current.user_id, board_id, tag_id).await?;
    req.validate()?;

    let changes = UpdateTag {
        name: req.name,
        color: req.color,
    };
    let tag = if changes.is_empty() {
        Tag::find_by_id(&state.db, tag_id).await?
    } else {
        Tag::update(&state.db, tag_id, changes).await?
    };

    Ok(Json(tag.ok_or_else(|| BoardError::missing("Tag", tag_id))?))
}

/// Deletes a tag and detaches it from every card
pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    require_tag(&state.db, current.user_id, board_id, tag_id).await?;
    Tag::delete(&state.db, tag_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attaches a tag; repeating the call succeeds without adding a second link
pub async fn attach(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((card_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<(StatusCode, Json<CardView>)> {
    let mut tx = state.db.begin().await?;
    let link = attach_tag(&mut tx, current.user_id, card_id, tag_id).await?;
    tx.commit().await?;

    if link == TagLink::AlreadyAttached {
        tracing::debug!(%card_id, %tag_id, "Tag was already attached");
    }

    Ok((StatusCode::CREATED, Json(card_view(&state.db, card_id).await?)))
}

pub async fn detach(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((card_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<CardView>> {
    let mut tx = state.db.begin().await?;
    detach_tag(&mut tx, current.user_id, card_id, tag_id).await?;
    tx.commit().await?;

    Ok(Json(card_view(&state.db, card_id).await?))
}
