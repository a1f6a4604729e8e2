//! Entity store for the task board
//!
//! Each model exposes associated functions generic over
//! [`sqlx::PgExecutor`], so the same call works on a pool, a pooled
//! connection or an open transaction.
//!
//! # Models
//!
//! - `user`: accounts
//! - `board`: boards, including each user's inbox
//! - `list`: lists inside a board, with row locking for position changes
//! - `card`: cards and the bulk position shift primitive
//! - `tag`: board-scoped tags
//! - `card_tag`: the card/tag association set

pub mod board;
pub mod card;
pub mod card_tag;
pub mod list;
pub mod tag;
pub mod user;
