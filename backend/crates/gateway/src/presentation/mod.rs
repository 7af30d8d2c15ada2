//! Presentation layer: axum middleware.

pub mod middleware;
