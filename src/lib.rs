//! Terminal dashboard for an AI news aggregation service.
//!
//! Fetches articles and category counts from the service, filters articles
//! by a keyword rule table, and exposes the result through a view model that
//! the terminal UI renders.

pub mod api;
pub mod app;
pub mod classifier;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod store;
pub mod tasks;
pub mod ui;
pub mod util;
pub mod view;
