//! Request extractors shared by handlers.
//!
//! - [`auth::MaybeUser`] -- Optional authenticated user from a JWT Bearer token.

pub mod auth;
