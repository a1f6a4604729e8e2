//! Card positioning and cross-list moves
//!
//! Positions within a list are always `1..=N` between transactions. The
//! [`plan`] module computes the shifts that preserve this; [`engine`] locks
//! the affected lists and runs them as bulk updates.
//!
//! # Example
//!
//! ```
//! use uuid::Uuid;
//! use visutask_shared::positioning::{plan_move, MovePlan, Placement};
//!
//! let list_id = Uuid::new_v4();
//! let card = Placement { card_id: Uuid::new_v4(), list_id, position: 1 };
//!
//! // Moving the first of three cards to position 2 shifts one neighbour up
//! match plan_move(card, list_id, 3, Some(2)).unwrap() {
//!     MovePlan::Reorder { shift, position } => {
//!         assert_eq!(position, 2);
//!         assert_eq!(shift.delta, -1);
//!     }
//!     other => panic!("unexpected plan: {:?}", other),
//! }
//! ```

pub mod engine;
pub mod plan;

pub use engine::{insert_card, move_card, remove_card, MoveRequest, NewCard, MAX_MOVE_ATTEMPTS};
pub use plan::{append_position, plan_delete, plan_move, MovePlan, Placement, Shift};
