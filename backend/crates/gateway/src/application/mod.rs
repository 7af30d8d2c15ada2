//! Application layer: use cases and configuration.

pub mod config;
pub mod screen_request;
pub mod verify_token;

pub use screen_request::ScreenRequestUseCase;
pub use verify_token::{TokenStatus, VerifyTokenUseCase};
