//! Card endpoints
//!
//! ```text
//! POST   /boards/:board_id/lists/:list_id/cards
//! GET    /boards/:board_id/lists/:list_id/cards
//! GET    /boards/:board_id/lists/:list_id/cards/:card_id
//! PATCH  /boards/:board_id/lists/:list_id/cards/:card_id
//! DELETE /boards/:board_id/lists/:list_id/cards/:card_id
//! POST   /cards/:card_id/move
//! ```
//!
//! New cards go to the end of their list. Deleting a card closes the gap it
//! leaves. Cards inside inbox lists behave like any other card.

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{
        check_length, double_option,
        views::{card_view, list_cards, CardView},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use visutask_shared::{
    auth::{
        authorization::{require_card, require_list},
        middleware::CurrentUser,
    },
    error::BoardError,
    models::card::{Card, UpdateCard},
    positioning::{self, MoveRequest, NewCard},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Text must be at most 255 characters"))]
    pub text: Option<String>,

    #[serde(default)]
    pub is_done: bool,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub text: Option<Option<String>>,

    pub is_done: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateCardRequest {
    fn validate(&self) -> ApiResult<()> {
        check_length("name", self.name.as_deref(), 1, 100)?;
        check_length("text", self.text.as_ref().and_then(|t| t.as_deref()), 0, 255)
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveCardRequest {
    pub destination_list_id: Uuid,

    /// 1-based; omitted means the end of the destination
    pub destination_list_position: Option<i32>,
}

pub async fn create_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<CardView>)> {
    req.validate()?;

    let mut tx = state.db.begin().await?;

    require_list(&mut *tx, current.user_id, board_id, list_id).await?;
    let card = positioning::insert_card(
        &mut tx,
        list_id,
        NewCard {
            name: req.name,
            text: req.text,
            is_done: req.is_done,
            due_date: req.due_date,
        },
    )
    .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(CardView {
            card,
            tags: Vec::new(),
        }),
    ))
}

/// Cards of a list in position order
pub async fn list_list_cards(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<CardView>>> {
    require_list(&state.db, current.user_id, board_id, list_id).await?;

    Ok(Json(list_cards(&state.db, list_id).await?))
}

pub async fn get_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Json<CardView>> {
    require_card(&state.db, current.user_id, board_id, list_id, card_id).await?;

    Ok(Json(card_view(&state.db, card_id).await?))
}

/// Updates card content; position changes go through the move endpoint
pub async fn update_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateCardRequest>,
) -> ApiResult<Json<CardView>> {
    require_card(&state.db, current.user_id, board_id, list_id, card_id).await?;
    req.validate()?;

    let changes = UpdateCard {
        name: req.name,
        text: req.text,
        is_done: req.is_done,
        due_date: req.due_date,
    };
    if !changes.is_empty() {
        Card::update(&state.db, card_id, changes)
            .await?
            .ok_or_else(|| BoardError::missing("Card", card_id))?;
    }

    Ok(Json(card_view(&state.db, card_id).await?))
}

/// Deletes a card and renumbers the cards after it
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;

    require_card(&mut *tx, current.user_id, board_id, list_id, card_id).await?;
    positioning::remove_card(&mut tx, list_id, card_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Moves a card within its list or to another list the user owns
pub async fn move_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<MoveCardRequest>,
) -> ApiResult<Json<CardView>> {
    let card = positioning::move_card(
        &state.db,
        current.user_id,
        card_id,
        MoveRequest {
            destination_list_id: req.destination_list_id,
            position: req.destination_list_position,
        },
    )
    .await?;

    Ok(Json(card_view(&state.db, card.id).await?))
}
