//! Fiordispino core - client side of the game catalog and personal library.
//!
//! This crate holds everything that talks to the backend:
//!
//! - `api`: the `ApiClient` gateway and the `ApiError` taxonomy
//! - `auth`: `TokenStore`, storage backends and the `AuthFlow`
//! - `services`: game, genre and library operations
//! - `models`: wire types
//! - `config`: base URLs, timeout and storage selection

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, CancelSignal};
pub use auth::{AuthFlow, Session, TokenStore};
pub use config::Config;
pub use services::{GameService, LibraryService};
