//! Tag association manager
//!
//! Attaching is idempotent. A tag can only ever be linked to cards whose
//! list sits on the tag's own board; any other combination reads as a
//! missing tag.
//!
//! Both operations take a shared lock on the card row before reading its
//! board, so they wait for any move of that card to commit.

use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::auth::authorization::{resolve_card, CardScope};
use crate::error::{BoardError, BoardResult};
use crate::models::card::Card;
use crate::models::card_tag::CardTag;
use crate::models::tag::Tag;

/// Result of [`attach_tag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLink {
    Attached,
    AlreadyAttached,
}

/// Fails with `NotFound` unless the tag belongs to the card's board
pub fn ensure_same_board(card: &CardScope, tag: Option<&Tag>, tag_id: Uuid) -> BoardResult<()> {
    match tag {
        Some(tag) if tag.board_id == card.board_id => Ok(()),
        _ => Err(BoardError::missing("Tag", tag_id)),
    }
}

async fn lock_card(
    tx: &mut Transaction<'_, Postgres>,
    actor: Uuid,
    card_id: Uuid,
) -> BoardResult<CardScope> {
    if !Card::lock_for_share(&mut **tx, card_id).await? {
        return Err(BoardError::missing("Card", card_id));
    }

    resolve_card(&mut **tx, actor, card_id).await
}

/// Attaches a tag to a card owned by `actor`
pub async fn attach_tag(
    tx: &mut Transaction<'_, Postgres>,
    actor: Uuid,
    card_id: Uuid,
    tag_id: Uuid,
) -> BoardResult<TagLink> {
    let card = lock_card(tx, actor, card_id).await?;
    let tag = Tag::find_by_id(&mut **tx, tag_id).await?;
    ensure_same_board(&card, tag.as_ref(), tag_id)?;

    let link = if CardTag::attach(&mut **tx, card_id, tag_id).await? {
        TagLink::Attached
    } else {
        TagLink::AlreadyAttached
    };
    debug!(%card_id, %tag_id, ?link, "Tag attached");

    Ok(link)
}

/// Detaches a tag from a card owned by `actor`
///
/// Fails with `NotFound` when the tag is not currently attached.
pub async fn detach_tag(
    tx: &mut Transaction<'_, Postgres>,
    actor: Uuid,
    card_id: Uuid,
    tag_id: Uuid,
) -> BoardResult<()> {
    let card = lock_card(tx, actor, card_id).await?;
    let tag = Tag::find_by_id(&mut **tx, tag_id).await?;
    ensure_same_board(&card, tag.as_ref(), tag_id)?;

    if !CardTag::detach(&mut **tx, card_id, tag_id).await? {
        return Err(BoardError::missing("Tag", tag_id));
    }
    debug!(%card_id, %tag_id, "Tag detached");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag_on(board_id: Uuid) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            board_id,
            name: Some("urgent".to_string()),
            color: "#ff0000".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn card_on(board_id: Uuid) -> CardScope {
        CardScope {
            board_id,
            list_id: Uuid::new_v4(),
            card_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_same_board_tag_accepted() {
        let board_id = Uuid::new_v4();
        let tag = tag_on(board_id);
        assert!(ensure_same_board(&card_on(board_id), Some(&tag), tag.id).is_ok());
    }

    #[test]
    fn test_foreign_board_tag_reads_as_missing() {
        let tag = tag_on(Uuid::new_v4());
        let err = ensure_same_board(&card_on(Uuid::new_v4()), Some(&tag), tag.id).unwrap_err();
        assert_eq!(err.to_string(), "Tag not found");
    }

    #[test]
    fn test_missing_tag() {
        let err = ensure_same_board(&card_on(Uuid::new_v4()), None, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }
}
