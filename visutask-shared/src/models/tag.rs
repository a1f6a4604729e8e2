//! Tag model and database operations
//!
//! Tags are scoped to a board. The card/tag association lives in
//! [`super::card_tag`].
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tags (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
//!     name VARCHAR(50),
//!     color VARCHAR(7) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Colored label scoped to one board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,

    /// Board the tag belongs to
    pub board_id: Uuid,

    pub name: Option<String>,

    /// `#rrggbb`
    pub color: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Tag paired with a card it is attached to
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CardTagRow {
    pub card_id: Uuid,

    #[sqlx(flatten)]
    pub tag: Tag,
}

/// Input for updating a tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTag {
    /// New name (use Some(None) to clear)
    pub name: Option<Option<String>>,

    pub color: Option<String>,
}

impl UpdateTag {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

impl Tag {
    pub async fn create<'e, E>(
        executor: E,
        board_id: Uuid,
        name: Option<String>,
        color: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (board_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, board_id, name, color, created_at, updated_at
            "#,
        )
        .bind(board_id)
        .bind(name)
        .bind(color)
        .fetch_one(executor)
        .await?;

        Ok(tag)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, board_id, name, color, created_at, updated_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(tag)
    }

    pub async fn list_by_board<'e, E>(executor: E, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, board_id, name, color, created_at, updated_at
            FROM tags
            WHERE board_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(executor)
        .await?;

        Ok(tags)
    }

    /// Loads the tags attached to each of the given cards
    pub async fn list_for_cards<'e, E>(
        executor: E,
        card_ids: &[Uuid],
    ) -> Result<Vec<CardTagRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, CardTagRow>(
            r#"
            SELECT ct.card_id, t.id, t.board_id, t.name, t.color, t.created_at, t.updated_at
            FROM card_tags ct
            JOIN tags t ON t.id = ct.tag_id
            WHERE ct.card_id = ANY($1)
            ORDER BY ct.created_at ASC, t.id ASC
            "#,
        )
        .bind(card_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Updates a tag
    ///
    /// Returns None if the tag doesn't exist.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateTag,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = String::from("UPDATE tags SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, board_id, name, color, created_at, updated_at");

        let mut q = sqlx::query_as::<_, Tag>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }

        let tag = q.fetch_optional(executor).await?;

        Ok(tag)
    }

    /// Deletes a tag and every association to it
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
