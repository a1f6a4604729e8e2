//! API route handlers
//!
//! - `health`: liveness and database status
//! - `auth`: register, login, token refresh
//! - `users`: the current user
//! - `inbox`: the current user's inbox board
//! - `boards`, `lists`, `cards`, `tags`: board resources
//! - `views`: response shapes shared by the handlers above

pub mod auth;
pub mod boards;
pub mod cards;
pub mod health;
pub mod inbox;
pub mod lists;
pub mod tags;
pub mod users;
pub mod views;

use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, ApiResult};

/// Deserializes a nullable PATCH field
///
/// With `#[serde(default)]`, an absent field stays `None`, an explicit `null`
/// becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Checks the character count of an optional string
pub(crate) fn check_length(field: &str, value: Option<&str>, min: usize, max: usize) -> ApiResult<()> {
    if let Some(value) = value {
        let len = value.chars().count();
        if len < min || len > max {
            return Err(ApiError::invalid(
                field,
                &format!("must be between {} and {} characters", min, max),
            ));
        }
    }

    Ok(())
}

/// Checks a `#rrggbb` color
pub(crate) fn check_color(field: &str, value: Option<&str>) -> ApiResult<()> {
    if let Some(value) = value {
        let valid = value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ApiError::invalid(field, "must be a #rrggbb color"));
        }
    }

    Ok(())
}
