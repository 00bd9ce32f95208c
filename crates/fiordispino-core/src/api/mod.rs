//! REST API gateway module for the game catalog backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to read the catalog and manage the personal library.
//!
//! The backend uses opaque token authentication: the token issued at login
//! is sent as `Authorization: Token <token>`.

pub mod client;
pub mod error;

pub use client::{segment_path, ApiClient, CancelSignal};
pub use error::{field_errors_message, ApiError};
