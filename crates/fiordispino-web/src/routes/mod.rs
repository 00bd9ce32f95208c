//! Request handlers.
//!
//! - `session`: the same-origin `/api/auth` endpoint, sole writer of the
//!   session cookie
//! - `pages`: page data for server-rendered routes

pub mod pages;
pub mod session;
