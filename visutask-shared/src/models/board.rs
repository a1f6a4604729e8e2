//! Board model and database operations
//!
//! A board belongs to exactly one user and owns lists and tags. Exactly one
//! board per user is the inbox: created at registration, never renamed or
//! deleted, and excluded from [`Board::list_by_user`].
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE boards (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     name VARCHAR(100) NOT NULL,
//!     description VARCHAR(255),
//!     is_inbox BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Name given to every user's inbox board
pub const INBOX_BOARD_NAME: &str = "Inbox";

/// Name of the single list created inside a new inbox
pub const INBOX_LIST_NAME: &str = "Incoming";

/// Board owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Whether this is the owner's protected inbox
    pub is_inbox: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_inbox: bool,
}

/// Input for updating a board
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoard {
    /// New board name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl UpdateBoard {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

impl Board {
    /// Creates a board
    pub async fn create<'e, E>(executor: E, data: CreateBoard) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (user_id, name, description, is_inbox)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, description, is_inbox, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.is_inbox)
        .fetch_one(executor)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID regardless of owner
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, name, description, is_inbox, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(board)
    }

    /// Finds the inbox board of a user
    pub async fn find_inbox<'e, E>(executor: E, user_id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, name, description, is_inbox, created_at, updated_at
            FROM boards
            WHERE user_id = $1 AND is_inbox = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(board)
    }

    /// Lists the non-inbox boards of a user, oldest first
    pub async fn list_by_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, name, description, is_inbox, created_at, updated_at
            FROM boards
            WHERE user_id = $1 AND is_inbox = FALSE
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(boards)
    }

    /// Updates a board
    ///
    /// Returns None if the board doesn't exist.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, name, description, is_inbox, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Board>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let board = q.fetch_optional(executor).await?;

        Ok(board)
    }

    /// Deletes a board
    ///
    /// Lists, cards, tags and card/tag links go with it through
    /// `ON DELETE CASCADE`. Returns true if the board existed.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
