//! List model and database operations
//!
//! A list is an ordered column of cards inside a board. Lists themselves are
//! unordered; they are returned in creation order.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE lists (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
//!     name VARCHAR(100) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// List of cards inside a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    pub id: Uuid,

    /// Parent board
    pub board_id: Uuid,

    pub name: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl List {
    pub async fn create<'e, E>(executor: E, board_id: Uuid, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (board_id, name)
            VALUES ($1, $2)
            RETURNING id, board_id, name, created_at, updated_at
            "#,
        )
        .bind(board_id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(list)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let list = sqlx::query_as::<_, List>(
            r#"
            SELECT id, board_id, name, created_at, updated_at
            FROM lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(list)
    }

    /// Lists every list of a board in creation order
    pub async fn list_by_board<'e, E>(executor: E, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT id, board_id, name, created_at, updated_at
            FROM lists
            WHERE board_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(executor)
        .await?;

        Ok(lists)
    }

    /// Renames a list
    ///
    /// Returns None if the list doesn't exist.
    pub async fn rename<'e, E>(executor: E, id: Uuid, name: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let list = sqlx::query_as::<_, List>(
            r#"
            UPDATE lists
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, board_id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(executor)
        .await?;

        Ok(list)
    }

    /// Deletes a list together with its cards
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Takes row locks on the given lists for the rest of the transaction
    ///
    /// Locks are acquired in ascending id order so two transactions touching
    /// the same pair of lists cannot deadlock. Returns the ids that exist;
    /// a missing id is simply absent from the result.
    pub async fn lock_for_update<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();

        let locked: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM lists
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(executor)
        .await?;

        Ok(locked.into_iter().map(|(id,)| id).collect())
    }
}
