//! Server-side mirror of the session token.
//!
//! The token lives in an HTTP-only cookie, so page scripts can never read
//! it. Only request handlers see this store: it wraps the request's
//! `CookieJar`, and the jar goes back out with the response.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const COOKIE_NAME: &str = "token";

/// One day
pub const COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24;

pub struct TokenCookieStore {
    jar: CookieJar,
}

impl TokenCookieStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn set_token(&mut self, token: &str) {
        let cookie = Cookie::build((COOKIE_NAME, token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .max_age(Duration::seconds(COOKIE_MAX_AGE_SECS))
            .build();
        self.jar = self.jar.clone().add(cookie);
    }

    pub fn token(&self) -> Option<String> {
        self.jar
            .get(COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn remove_token(&mut self) {
        self.jar = self.jar.clone().remove(Cookie::build(COOKIE_NAME).path("/"));
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The jar to return with the response so changes reach the browser
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}
