//! Data models for the game catalog and personal library.
//!
//! - `UserProfile` and the auth request/response bodies
//! - `Genre`, `Game`: catalog entries
//! - `GamePlayed`, `GameToPlay`: library entries owned by a user

pub mod game;
pub mod library;
pub mod user;

pub use game::{Game, Genre};
pub use library::{GamePlayed, GameToPlay, LibraryLists, Rating};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};
