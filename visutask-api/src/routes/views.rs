//! Response shapes
//!
//! Cards are always returned with their tags; boards come with their lists,
//! cards and tags nested.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use visutask_shared::error::{BoardError, BoardResult};
use visutask_shared::models::{
    board::Board,
    card::Card,
    list::List,
    tag::Tag,
    user::User,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Tag as shown on a card
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub color: String,
}

impl From<Tag> for TagSummary {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardView {
    #[serde(flatten)]
    pub card: Card,
    pub tags: Vec<TagSummary>,
}

#[derive(Debug, Serialize)]
pub struct ListView {
    #[serde(flatten)]
    pub list: List,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Serialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListView>,
    pub tags: Vec<Tag>,
}

/// Attaches tags to cards, keeping the card order
pub async fn with_tags(pool: &PgPool, cards: Vec<Card>) -> BoardResult<Vec<CardView>> {
    let ids: Vec<Uuid> = cards.iter().map(|card| card.id).collect();

    let mut tags: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
    for row in Tag::list_for_cards(pool, &ids).await? {
        tags.entry(row.card_id).or_default().push(row.tag.into());
    }

    Ok(cards
        .into_iter()
        .map(|card| CardView {
            tags: tags.remove(&card.id).unwrap_or_default(),
            card,
        })
        .collect())
}

/// Loads one card with its tags
pub async fn card_view(pool: &PgPool, card_id: Uuid) -> BoardResult<CardView> {
    let card = Card::find_by_id(pool, card_id)
        .await?
        .ok_or_else(|| BoardError::missing("Card", card_id))?;

    let mut views = with_tags(pool, vec![card]).await?;
    views.pop().ok_or_else(|| BoardError::missing("Card", card_id))
}

/// Loads a list's cards in position order with their tags
pub async fn list_cards(pool: &PgPool, list_id: Uuid) -> BoardResult<Vec<CardView>> {
    let cards = Card::list_by_list(pool, list_id).await?;
    with_tags(pool, cards).await
}

/// Loads a board with everything under it
pub async fn board_detail(pool: &PgPool, board: Board) -> BoardResult<BoardDetail> {
    let lists = List::list_by_board(pool, board.id).await?;
    let list_ids: Vec<Uuid> = lists.iter().map(|list| list.id).collect();

    let cards = with_tags(pool, Card::list_by_lists(pool, &list_ids).await?).await?;
    let mut by_list: HashMap<Uuid, Vec<CardView>> = HashMap::new();
    for card in cards {
        by_list.entry(card.card.list_id).or_default().push(card);
    }

    let lists = lists
        .into_iter()
        .map(|list| ListView {
            cards: by_list.remove(&list.id).unwrap_or_default(),
            list,
        })
        .collect();
    let tags = Tag::list_by_board(pool, board.id).await?;

    Ok(BoardDetail { board, lists, tags })
}
