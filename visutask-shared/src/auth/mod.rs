//! Authentication and authorization
//!
//! - [`password`]: Argon2id password hashing
//! - [`jwt`]: access and refresh tokens
//! - [`middleware`]: bearer token middleware resolving the [`middleware::CurrentUser`]
//! - [`authorization`]: ownership chain checks and inbox protection

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
