//! Card model and database operations
//!
//! Cards carry a 1-based `position` that is dense and unique within their
//! list. Nothing in this module keeps that invariant on its own: callers go
//! through [`crate::positioning`], which locks the list and applies the
//! matching shifts in the same transaction.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE cards (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     list_id UUID NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
//!     name VARCHAR(100) NOT NULL,
//!     text VARCHAR(255),
//!     is_done BOOLEAN NOT NULL DEFAULT FALSE,
//!     due_date TIMESTAMPTZ,
//!     position INTEGER NOT NULL CHECK (position >= 1),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     CONSTRAINT cards_list_position_key UNIQUE (list_id, position) DEFERRABLE INITIALLY DEFERRED
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::positioning::Shift;

/// Card inside a list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: Uuid,

    /// Containing list
    pub list_id: Uuid,

    pub name: String,

    pub text: Option<String>,

    pub is_done: bool,

    pub due_date: Option<DateTime<Utc>>,

    /// 1-based rank within the list
    pub position: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a card at a known position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    pub list_id: Uuid,
    pub name: String,
    pub text: Option<String>,
    pub is_done: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i32,
}

/// Input for updating card content
///
/// Position and list membership are not part of this; see
/// [`crate::positioning::move_card`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCard {
    pub name: Option<String>,

    /// New text (use Some(None) to clear)
    pub text: Option<Option<String>>,

    pub is_done: Option<bool>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateCard {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.text.is_none() && self.is_done.is_none() && self.due_date.is_none()
    }
}

impl Card {
    /// Inserts a card row
    ///
    /// The caller chooses the position. Use [`crate::positioning::insert_card`]
    /// to append under the list lock.
    pub async fn create<'e, E>(executor: E, data: CreateCard) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (list_id, name, text, is_done, due_date, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            "#,
        )
        .bind(data.list_id)
        .bind(data.name)
        .bind(data.text)
        .bind(data.is_done)
        .bind(data.due_date)
        .bind(data.position)
        .fetch_one(executor)
        .await?;

        Ok(card)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(card)
    }

    /// Re-reads a card and locks its row until the transaction ends
    pub async fn find_for_update<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            FROM cards
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(card)
    }

    /// Takes a shared lock on a card row; blocks while a move holds it
    ///
    /// Returns false when the card does not exist.
    pub async fn lock_for_share<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM cards WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(locked.is_some())
    }

    /// Lists the cards of a list ordered by position
    pub async fn list_by_list<'e, E>(executor: E, list_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            FROM cards
            WHERE list_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(executor)
        .await?;

        Ok(cards)
    }

    /// Lists the cards of several lists, grouped by list then ordered by position
    pub async fn list_by_lists<'e, E>(executor: E, list_ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            FROM cards
            WHERE list_id = ANY($1)
            ORDER BY list_id, position ASC
            "#,
        )
        .bind(list_ids)
        .fetch_all(executor)
        .await?;

        Ok(cards)
    }

    /// Counts the cards in a list
    pub async fn count_in_list<'e, E>(executor: E, list_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(executor)
            .await?;

        Ok(count.0)
    }

    /// Highest position in a list, 0 when the list is empty
    pub async fn max_position_in_list<'e, E>(executor: E, list_id: Uuid) -> Result<i32, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let max: (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(position), 0) FROM cards WHERE list_id = $1")
                .bind(list_id)
                .fetch_one(executor)
                .await?;

        Ok(max.0)
    }

    /// Updates card content
    ///
    /// Returns None if the card doesn't exist.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateCard,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = String::from("UPDATE cards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }
        if data.is_done.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_done = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, list_id, name, text, is_done, due_date, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Card>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(is_done) = data.is_done {
            q = q.bind(is_done);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let card = q.fetch_optional(executor).await?;

        Ok(card)
    }

    /// Deletes a card row without touching its siblings
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies one bulk position update
    ///
    /// Returns the number of cards shifted.
    pub async fn shift_positions<'e, E>(executor: E, shift: &Shift) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET position = position + $2, updated_at = NOW()
            WHERE list_id = $1
              AND position >= $3
              AND ($4::int IS NULL OR position <= $4)
              AND ($5::uuid IS NULL OR id <> $5)
            "#,
        )
        .bind(shift.list_id)
        .bind(shift.delta)
        .bind(shift.from)
        .bind(shift.through)
        .bind(shift.exclude)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Places a card at its final list and position
    pub async fn relocate<'e, E>(
        executor: E,
        id: Uuid,
        list_id: Uuid,
        position: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let card = sqlx::query_as::<_, Card>(
            r#"
            UPDATE cards
            SET list_id = $2, position = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, list_id, name, text, is_done, due_date, position, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(list_id)
        .bind(position)
        .fetch_optional(executor)
        .await?;

        Ok(card)
    }
}
