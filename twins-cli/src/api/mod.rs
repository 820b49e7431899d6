//! Client for the twin service management data plane
//!
//! Covers token acquisition and the model catalog operations the CLI
//! needs: paged listing, batched creation, and one-at-a-time deletion.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;

pub use auth::{AuthManager, AuthMethod};
pub use client::TwinsClient;
