//! Framework-free core of the SPA router.
//!
//! Turns a content-management menu tree into the route configuration
//! consumed by a single-page-application router, with per-route data-fetch
//! metadata so the frontend can hydrate from one JSON payload.

pub mod app_model;
pub mod builder;
pub mod content;
pub mod error;
pub mod menu;
pub mod naming;
pub mod request;
pub mod route;
pub mod settings;
pub mod types;
pub mod urls;
pub mod view;
