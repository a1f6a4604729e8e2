//! Ownership and scope checks
//!
//! Every board resource hangs off the chain Card -> List -> Board -> User.
//! Nested lookups resolve the board first, so a foreign board yields
//! `Forbidden` while a list or card that does not sit under the claimed
//! parent yields `NotFound`, same as a missing one.
//!
//! Each lookup is a single query over the chain; the pure `check_*`
//! functions decide the outcome from the row it returns.
//!
//! # Example
//!
//! ```no_run
//! use visutask_shared::auth::authorization::require_card;
//! use sqlx::PgPool;
//! use uuid::Uuid;
//!
//! # async fn example(pool: PgPool, actor: Uuid, board: Uuid, list: Uuid, card: Uuid)
//! #     -> Result<(), visutask_shared::error::BoardError> {
//! let scope = require_card(&pool, actor, board, list, card).await?;
//! assert_eq!(scope.list_id, list);
//! # Ok(())
//! # }
//! ```

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::{BoardError, BoardResult};
use crate::models::board::Board;

/// A list resolved through its owning board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListScope {
    pub board_id: Uuid,
    pub list_id: Uuid,
    pub is_inbox: bool,
}

/// A card resolved through its list and board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardScope {
    pub board_id: Uuid,
    pub list_id: Uuid,
    pub card_id: Uuid,
}

/// A tag resolved through its board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagScope {
    pub board_id: Uuid,
    pub tag_id: Uuid,
}

/// Board row plus whichever children matched their claimed parent
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChainRow {
    board_id: Uuid,
    owner_id: Uuid,
    is_inbox: bool,
    list_id: Option<Uuid>,
    card_id: Option<Uuid>,
    tag_id: Option<Uuid>,
}

/// Structural changes refused on an inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxMutation {
    UpdateBoard,
    DeleteBoard,
    CreateList,
    UpdateList,
    DeleteList,
    CreateTag,
}

impl InboxMutation {
    pub fn message(&self) -> &'static str {
        match self {
            InboxMutation::UpdateBoard => "The inbox data cannot be modified.",
            InboxMutation::DeleteBoard => "The inbox cannot be deleted.",
            InboxMutation::CreateList => "You cannot create a new list in the Inbox.",
            InboxMutation::UpdateList => "The inbox list data cannot be modified.",
            InboxMutation::DeleteList => "The inbox list cannot be deleted.",
            InboxMutation::CreateTag => "You cannot create tags in the Inbox.",
        }
    }
}

/// Fails with `Forbidden` unless the actor owns the resource
pub fn check_owner(actor: Uuid, owner_id: Uuid) -> BoardResult<()> {
    if actor != owner_id {
        tracing::warn!(%actor, "Rejected access to a board owned by another user");
        return Err(BoardError::forbidden(
            "You do not have permission to modify this board.",
        ));
    }

    Ok(())
}

/// Fails with `Forbidden` when `is_inbox` is set
pub fn forbid_inbox(is_inbox: bool, mutation: InboxMutation) -> BoardResult<()> {
    if is_inbox {
        tracing::warn!(?mutation, "Rejected inbox mutation");
        return Err(BoardError::forbidden(mutation.message()));
    }

    Ok(())
}

fn check_board(actor: Uuid, board_id: Uuid, row: Option<ChainRow>) -> BoardResult<ChainRow> {
    let row = row.ok_or_else(|| BoardError::missing("Board", board_id))?;
    check_owner(actor, row.owner_id)?;
    Ok(row)
}

fn check_list(actor: Uuid, board_id: Uuid, list_id: Uuid, row: Option<ChainRow>) -> BoardResult<ListScope> {
    let row = check_board(actor, board_id, row)?;
    let list_id = row.list_id.ok_or_else(|| BoardError::missing("List", list_id))?;

    Ok(ListScope {
        board_id: row.board_id,
        list_id,
        is_inbox: row.is_inbox,
    })
}

fn check_card(
    actor: Uuid,
    ids: (Uuid, Uuid, Uuid),
    row: Option<ChainRow>,
) -> BoardResult<CardScope> {
    let (board_id, list_id, card_id) = ids;
    let row = check_board(actor, board_id, row)?;
    let list_id = row.list_id.ok_or_else(|| BoardError::missing("List", list_id))?;
    let card_id = row.card_id.ok_or_else(|| BoardError::missing("Card", card_id))?;

    Ok(CardScope {
        board_id: row.board_id,
        list_id,
        card_id,
    })
}

/// Loads a board the actor owns
pub async fn require_board<'e, E>(executor: E, actor: Uuid, board_id: Uuid) -> BoardResult<Board>
where
    E: PgExecutor<'e>,
{
    let board = Board::find_by_id(executor, board_id)
        .await?
        .ok_or_else(|| BoardError::missing("Board", board_id))?;
    check_owner(actor, board.user_id)?;

    Ok(board)
}

/// Resolves `board_id/list_id` for the actor
pub async fn require_list<'e, E>(
    executor: E,
    actor: Uuid,
    board_id: Uuid,
    list_id: Uuid,
) -> BoardResult<ListScope>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChainRow>(
        r#"
        SELECT b.id AS board_id, b.user_id AS owner_id, b.is_inbox,
               l.id AS list_id, NULL::uuid AS card_id, NULL::uuid AS tag_id
        FROM boards b
        LEFT JOIN lists l ON l.id = $2 AND l.board_id = b.id
        WHERE b.id = $1
        "#,
    )
    .bind(board_id)
    .bind(list_id)
    .fetch_optional(executor)
    .await?;

    check_list(actor, board_id, list_id, row)
}

/// Resolves `board_id/list_id/card_id` for the actor
pub async fn require_card<'e, E>(
    executor: E,
    actor: Uuid,
    board_id: Uuid,
    list_id: Uuid,
    card_id: Uuid,
) -> BoardResult<CardScope>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChainRow>(
        r#"
        SELECT b.id AS board_id, b.user_id AS owner_id, b.is_inbox,
               l.id AS list_id, c.id AS card_id, NULL::uuid AS tag_id
        FROM boards b
        LEFT JOIN lists l ON l.id = $2 AND l.board_id = b.id
        LEFT JOIN cards c ON c.id = $3 AND c.list_id = l.id
        WHERE b.id = $1
        "#,
    )
    .bind(board_id)
    .bind(list_id)
    .bind(card_id)
    .fetch_optional(executor)
    .await?;

    check_card(actor, (board_id, list_id, card_id), row)
}

/// Resolves `board_id/tag_id` for the actor
pub async fn require_tag<'e, E>(
    executor: E,
    actor: Uuid,
    board_id: Uuid,
    tag_id: Uuid,
) -> BoardResult<TagScope>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChainRow>(
        r#"
        SELECT b.id AS board_id, b.user_id AS owner_id, b.is_inbox,
               NULL::uuid AS list_id, NULL::uuid AS card_id, t.id AS tag_id
        FROM boards b
        LEFT JOIN tags t ON t.id = $2 AND t.board_id = b.id
        WHERE b.id = $1
        "#,
    )
    .bind(board_id)
    .bind(tag_id)
    .fetch_optional(executor)
    .await?;

    let row = check_board(actor, board_id, row)?;
    let tag_id = row.tag_id.ok_or_else(|| BoardError::missing("Tag", tag_id))?;

    Ok(TagScope {
        board_id: row.board_id,
        tag_id,
    })
}

/// Resolves a card by id alone: existence first, then ownership
pub async fn resolve_card<'e, E>(executor: E, actor: Uuid, card_id: Uuid) -> BoardResult<CardScope>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChainRow>(
        r#"
        SELECT b.id AS board_id, b.user_id AS owner_id, b.is_inbox,
               l.id AS list_id, c.id AS card_id, NULL::uuid AS tag_id
        FROM cards c
        JOIN lists l ON l.id = c.list_id
        JOIN boards b ON b.id = l.board_id
        WHERE c.id = $1
        "#,
    )
    .bind(card_id)
    .fetch_optional(executor)
    .await?;

    let row = row.ok_or_else(|| BoardError::missing("Card", card_id))?;
    check_owner(actor, row.owner_id)?;

    Ok(CardScope {
        board_id: row.board_id,
        list_id: row.list_id.unwrap_or_default(),
        card_id,
    })
}

/// Resolves a list by id alone: existence first, then ownership
pub async fn resolve_list<'e, E>(executor: E, actor: Uuid, list_id: Uuid) -> BoardResult<ListScope>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChainRow>(
        r#"
        SELECT b.id AS board_id, b.user_id AS owner_id, b.is_inbox,
               l.id AS list_id, NULL::uuid AS card_id, NULL::uuid AS tag_id
        FROM lists l
        JOIN boards b ON b.id = l.board_id
        WHERE l.id = $1
        "#,
    )
    .bind(list_id)
    .fetch_optional(executor)
    .await?;

    let row = row.ok_or_else(|| BoardError::missing("List", list_id))?;
    check_owner(actor, row.owner_id)?;

    Ok(ListScope {
        board_id: row.board_id,
        list_id,
        is_inbox: row.is_inbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(owner_id: Uuid, list_id: Option<Uuid>, card_id: Option<Uuid>) -> ChainRow {
        ChainRow {
            board_id: Uuid::new_v4(),
            owner_id,
            is_inbox: false,
            list_id,
            card_id,
            tag_id: None,
        }
    }

    #[test]
    fn test_check_owner() {
        let actor = Uuid::new_v4();
        assert!(check_owner(actor, actor).is_ok());
        assert!(matches!(
            check_owner(actor, Uuid::new_v4()),
            Err(BoardError::Forbidden(_))
        ));
    }

    #[test]
    fn test_missing_board_is_not_found() {
        let err = check_list(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), None).unwrap_err();
        assert_eq!(err.to_string(), "Board not found");
    }

    #[test]
    fn test_foreign_board_is_forbidden_before_list_lookup() {
        let actor = Uuid::new_v4();
        let row = chain(Uuid::new_v4(), None, None);
        let err = check_list(actor, row.board_id, Uuid::new_v4(), Some(row)).unwrap_err();
        assert!(matches!(err, BoardError::Forbidden(_)));
    }

    #[test]
    fn test_list_under_other_board_is_not_found() {
        let actor = Uuid::new_v4();
        let row = chain(actor, None, None);
        let err = check_list(actor, row.board_id, Uuid::new_v4(), Some(row)).unwrap_err();
        assert_eq!(err.to_string(), "List not found");
    }

    #[test]
    fn test_card_under_other_list_is_not_found() {
        let actor = Uuid::new_v4();
        let list_id = Uuid::new_v4();
        let row = chain(actor, Some(list_id), None);
        let ids = (row.board_id, list_id, Uuid::new_v4());
        let err = check_card(actor, ids, Some(row)).unwrap_err();
        assert_eq!(err.to_string(), "Card not found");
    }

    #[test]
    fn test_card_resolves() {
        let actor = Uuid::new_v4();
        let list_id = Uuid::new_v4();
        let card_id = Uuid::new_v4();
        let row = chain(actor, Some(list_id), Some(card_id));
        let board_id = row.board_id;

        let scope = check_card(actor, (board_id, list_id, card_id), Some(row)).unwrap();
        assert_eq!(
            scope,
            CardScope {
                board_id,
                list_id,
                card_id,
            }
        );
    }

    #[test]
    fn test_forbid_inbox() {
        assert!(forbid_inbox(false, InboxMutation::DeleteBoard).is_ok());

        let err = forbid_inbox(true, InboxMutation::DeleteBoard).unwrap_err();
        assert_eq!(err.to_string(), "Forbidden: The inbox cannot be deleted.");

        assert!(matches!(
            forbid_inbox(true, InboxMutation::CreateList),
            Err(BoardError::Forbidden(_))
        ));
    }
}
