//! Authentication module for managing the client session.
//!
//! This module provides:
//! - `TokenStore`: bearer token and profile snapshot persistence
//! - `Storage` backends: in-memory, JSON file, OS keychain (`KeyringStorage`)
//! - `AuthFlow`: login, registration, logout and current-user lookup
//!
//! Tokens are never expired client-side; the backend decides when a token
//! stops being valid.

pub mod credentials;
pub mod flow;
pub mod session;
pub mod storage;

pub use credentials::KeyringStorage;
pub use flow::{AuthFlow, HttpSessionMirror, SessionAction, SessionMirror, SESSION_ENDPOINT};
pub use session::{Session, TokenStore};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
