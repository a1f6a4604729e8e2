//! Pure position planning
//!
//! Nothing here touches the database. The planner turns a card's current
//! placement and the relevant list sizes into the [`Shift`]s and final
//! placement that keep positions dense; the engine executes them.

use uuid::Uuid;

use crate::error::{BoardError, BoardResult};

/// Bulk position update over one list
///
/// Adds `delta` to every card of `list_id` whose position lies in
/// `from..=through` (open-ended when `through` is None), skipping `exclude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub list_id: Uuid,
    pub from: i32,
    pub through: Option<i32>,
    pub delta: i32,
    pub exclude: Option<Uuid>,
}

impl Shift {
    /// Whether a card at `position` in `list_id` falls inside the shift
    pub fn covers(&self, list_id: Uuid, card_id: Uuid, position: i32) -> bool {
        list_id == self.list_id
            && position >= self.from
            && self.through.map_or(true, |through| position <= through)
            && self.exclude != Some(card_id)
    }
}

/// Where a card currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub card_id: Uuid,
    pub list_id: Uuid,
    pub position: i32,
}

/// Outcome of planning a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan {
    /// Target equals the current position; nothing to write
    Unchanged,

    /// Same-list reorder: one shift, then the card takes `position`
    Reorder { shift: Shift, position: i32 },

    /// Cross-list move: close the source gap, open the destination slot,
    /// then the card takes `list_id`/`position`
    Relocate {
        source: Shift,
        destination: Shift,
        list_id: Uuid,
        position: i32,
    },
}

/// Position for a card appended to a list whose highest position is `max_position`
pub fn append_position(max_position: i32) -> i32 {
    max_position + 1
}

fn check_range(position: i32, max: i32) -> BoardResult<()> {
    if position < 1 || position > max {
        return Err(BoardError::InvalidPosition {
            position,
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Plans a reorder inside the card's own list of `count` cards
///
/// An unset target means the bottom of the list (`count`).
pub fn plan_reorder(card: Placement, count: i32, requested: Option<i32>) -> BoardResult<MovePlan> {
    if requested == Some(card.position) {
        return Ok(MovePlan::Unchanged);
    }

    let position = requested.unwrap_or(count);
    if position == card.position {
        return Ok(MovePlan::Unchanged);
    }
    check_range(position, count)?;

    let delta = if position > card.position { -1 } else { 1 };
    let shift = Shift {
        list_id: card.list_id,
        from: position.min(card.position),
        through: Some(position.max(card.position)),
        delta,
        exclude: Some(card.card_id),
    };

    Ok(MovePlan::Reorder { shift, position })
}

/// Plans a move into another list currently holding `destination_count` cards
///
/// An unset target means after the last card (`destination_count + 1`).
pub fn plan_relocate(
    card: Placement,
    destination_list_id: Uuid,
    destination_count: i32,
    requested: Option<i32>,
) -> BoardResult<MovePlan> {
    let max = destination_count + 1;
    let position = requested.unwrap_or(max);
    check_range(position, max)?;

    Ok(MovePlan::Relocate {
        source: Shift {
            list_id: card.list_id,
            from: card.position + 1,
            through: None,
            delta: -1,
            exclude: None,
        },
        destination: Shift {
            list_id: destination_list_id,
            from: position,
            through: None,
            delta: 1,
            exclude: None,
        },
        list_id: destination_list_id,
        position,
    })
}

/// Plans a move, dispatching on whether the destination is the card's own list
///
/// `destination_count` is the number of cards currently in the destination.
pub fn plan_move(
    card: Placement,
    destination_list_id: Uuid,
    destination_count: i32,
    requested: Option<i32>,
) -> BoardResult<MovePlan> {
    if destination_list_id == card.list_id {
        plan_reorder(card, destination_count, requested)
    } else {
        plan_relocate(card, destination_list_id, destination_count, requested)
    }
}

/// Shift closing the gap left by a deleted card
pub fn plan_delete(card: Placement) -> Shift {
    Shift {
        list_id: card.list_id,
        from: card.position + 1,
        through: None,
        delta: -1,
        exclude: None,
    }
}
