//! Card/tag association set
//!
//! ```sql
//! CREATE TABLE card_tags (
//!     card_id UUID NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
//!     tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (card_id, tag_id)
//! );
//! ```
//!
//! Board scoping is checked by [`crate::tagging`] before these run.

use sqlx::PgExecutor;
use uuid::Uuid;

pub struct CardTag;

impl CardTag {
    /// Links a tag to a card
    ///
    /// Returns false when the link already existed.
    pub async fn attach<'e, E>(executor: E, card_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO card_tags (card_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (card_id, tag_id) DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(tag_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a link
    ///
    /// Returns false when the tag was not attached to the card.
    pub async fn detach<'e, E>(executor: E, card_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM card_tags WHERE card_id = $1 AND tag_id = $2")
            .bind(card_id)
            .bind(tag_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drops every tag of a card, returning how many links went away
    pub async fn detach_all<'e, E>(executor: E, card_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM card_tags WHERE card_id = $1")
            .bind(card_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn exists<'e, E>(executor: E, card_id: Uuid, tag_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let found: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM card_tags WHERE card_id = $1 AND tag_id = $2)",
        )
        .bind(card_id)
        .bind(tag_id)
        .fetch_one(executor)
        .await?;

        Ok(found.0)
    }
}
