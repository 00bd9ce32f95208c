//! Catalog and library operations layered on `ApiClient`.
//!
//! Reads of public data work without a session. Writes, and reads of the
//! session user's own lists, fail with `ApiError::Unauthenticated` before
//! any request is sent when no token is held.

pub mod game;
pub mod library;

pub use game::GameService;
pub use library::LibraryService;
