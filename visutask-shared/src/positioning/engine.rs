//! Executes position plans against the database
//!
//! Every function here runs inside a transaction. It takes the row locks of
//! the lists involved (ascending id order) before reading counts, so
//! concurrent inserts, deletes and moves on the same list serialize.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::plan::{append_position, plan_delete, plan_move, MovePlan, Placement};
use crate::auth::authorization::{resolve_card, resolve_list};
use crate::error::{BoardError, BoardResult};
use crate::models::card::{Card, CreateCard};
use crate::models::card_tag::CardTag;
use crate::models::list::List;

/// Attempts made before a move that keeps racing gives up with `Conflict`
pub const MAX_MOVE_ATTEMPTS: u32 = 3;

/// Card content for [`insert_card`]; the position is assigned here
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub name: String,
    pub text: Option<String>,
    pub is_done: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Target of [`move_card`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub destination_list_id: Uuid,

    /// 1-based target position; None picks the list's default slot
    pub position: Option<i32>,
}

enum Attempt {
    Done(Card),
    Stale,
}

async fn lock_lists(conn: &mut PgConnection, ids: &[Uuid]) -> BoardResult<()> {
    let locked = List::lock_for_update(&mut *conn, ids).await?;

    if let Some(missing) = ids.iter().find(|id| !locked.contains(id)) {
        return Err(BoardError::missing("List", *missing));
    }

    Ok(())
}

/// Appends a card to the end of a list
pub async fn insert_card(
    tx: &mut Transaction<'_, Postgres>,
    list_id: Uuid,
    card: NewCard,
) -> BoardResult<Card> {
    lock_lists(&mut **tx, &[list_id]).await?;

    let max_position = Card::max_position_in_list(&mut **tx, list_id).await?;
    let card = Card::create(
        &mut **tx,
        CreateCard {
            list_id,
            name: card.name,
            text: card.text,
            is_done: card.is_done,
            due_date: card.due_date,
            position: append_position(max_position),
        },
    )
    .await?;

    debug!(card_id = %card.id, %list_id, position = card.position, "Card appended");

    Ok(card)
}

/// Deletes a card and closes the gap it leaves
pub async fn remove_card(
    tx: &mut Transaction<'_, Postgres>,
    list_id: Uuid,
    card_id: Uuid,
) -> BoardResult<()> {
    lock_lists(&mut **tx, &[list_id]).await?;

    let card = Card::find_for_update(&mut **tx, card_id)
        .await?
        .filter(|card| card.list_id == list_id)
        .ok_or_else(|| BoardError::missing("Card", card_id))?;

    Card::delete(&mut **tx, card.id).await?;
    let shifted = Card::shift_positions(
        &mut **tx,
        &plan_delete(Placement {
            card_id: card.id,
            list_id,
            position: card.position,
        }),
    )
    .await?;

    debug!(%card_id, %list_id, shifted, "Card removed");

    Ok(())
}

async fn try_move(
    conn: &mut PgConnection,
    actor: Uuid,
    card_id: Uuid,
    request: MoveRequest,
) -> BoardResult<Attempt> {
    let source = resolve_card(&mut *conn, actor, card_id).await?;
    let destination = resolve_list(&mut *conn, actor, request.destination_list_id).await?;

    lock_lists(conn, &[source.list_id, destination.list_id]).await?;

    let card = Card::find_for_update(&mut *conn, card_id)
        .await?
        .ok_or_else(|| BoardError::missing("Card", card_id))?;
    if card.list_id != source.list_id {
        return Ok(Attempt::Stale);
    }

    let destination_count = Card::count_in_list(&mut *conn, destination.list_id).await?;
    let destination_count = i32::try_from(destination_count)
        .map_err(|_| BoardError::Validation("List is too large".to_string()))?;

    let placement = Placement {
        card_id,
        list_id: card.list_id,
        position: card.position,
    };

    let (list_id, position) =
        match plan_move(placement, destination.list_id, destination_count, request.position)? {
            MovePlan::Unchanged => return Ok(Attempt::Done(card)),
            MovePlan::Reorder { shift, position } => {
                Card::shift_positions(&mut *conn, &shift).await?;
                (card.list_id, position)
            }
            MovePlan::Relocate {
                source,
                destination,
                list_id,
                position,
            } => {
                Card::shift_positions(&mut *conn, &source).await?;
                Card::shift_positions(&mut *conn, &destination).await?;
                (list_id, position)
            }
        };

    // Tags are board-scoped and cannot follow the card to another board
    if destination.board_id != source.board_id {
        let dropped = CardTag::detach_all(&mut *conn, card_id).await?;
        debug!(%card_id, dropped, "Dropped tags on move to another board");
    }

    let moved = Card::relocate(&mut *conn, card_id, list_id, position)
        .await?
        .ok_or_else(|| BoardError::missing("Card", card_id))?;

    Ok(Attempt::Done(moved))
}

/// Moves a card within its list or into another list the actor owns
///
/// Runs in its own transaction. If the card changes list between the
/// ownership check and the lock, the transaction is rolled back and retried
/// up to [`MAX_MOVE_ATTEMPTS`] times before failing with `Conflict`.
///
/// # Errors
///
/// Checked in order: card missing (`NotFound`), card owned by someone else
/// (`Forbidden`), destination missing (`NotFound`), destination owned by
/// someone else (`Forbidden`), position out of range (`InvalidPosition`).
pub async fn move_card(
    pool: &PgPool,
    actor: Uuid,
    card_id: Uuid,
    request: MoveRequest,
) -> BoardResult<Card> {
    for attempt in 1..=MAX_MOVE_ATTEMPTS {
        let mut tx = pool.begin().await?;

        match try_move(&mut tx, actor, card_id, request).await? {
            Attempt::Done(card) => {
                tx.commit().await?;
                info!(
                    %card_id,
                    list_id = %card.list_id,
                    position = card.position,
                    attempt,
                    "Card moved"
                );
                return Ok(card);
            }
            Attempt::Stale => {
                tx.rollback().await?;
                debug!(%card_id, attempt, "Card changed list during move, retrying");
            }
        }
    }

    Err(BoardError::Conflict(
        "The card was moved concurrently; try again.".to_string(),
    ))
}
