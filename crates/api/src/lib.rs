//! SPA router HTTP service library.
//!
//! Exposes the building blocks (config, state, error handling, site,
//! routes) so integration tests and the binary entrypoint can both use
//! them.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod news;
pub mod response;
pub mod router;
pub mod routes;
pub mod site;
pub mod state;
pub mod views;
