//! # VisuTask Shared Library
//!
//! Domain logic behind the VisuTask board API: users own boards, boards own
//! lists and tags, lists hold cards in a dense 1-based order.
//!
//! ## Module Organization
//!
//! - `models`: entity store over PostgreSQL
//! - `positioning`: card positioning and cross-list moves
//! - `tagging`: board-scoped card/tag associations
//! - `auth`: passwords, tokens, request authentication, ownership checks
//! - `db`: connection pool and migrations
//! - `error`: domain error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod positioning;
pub mod tagging;

/// Current version of the VisuTask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
