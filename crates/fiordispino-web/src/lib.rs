//! Server-side request layer for fiordispino.
//!
//! Serves page data for the server-rendered routes, owns the HTTP-only
//! session cookie through `/api/auth`, and guards protected routes.
//!
//! # Session flow
//! - The client logs in against the backend and keeps the token in its own
//!   storage
//! - It then posts the token to `/api/auth`, which stores it in the `token`
//!   cookie (HttpOnly, SameSite=Strict, Secure, one day)
//! - Every request passes the route guard; protected routes without the
//!   cookie get a 303 to `/auth`
//! - Protected handlers forward the cookie token to the backend
//!
//! # Configuration
//! - `PUBLIC_API_SERVER_BASE_URL`: backend base URL
//! - `FIORDISPINO_PORT`: listen port (default 5173)
//! - `FIORDISPINO_LOG_DIR`: also write daily log files here
//! - `RUST_LOG`: log filter (default `info`)

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use fiordispino_core::auth::SESSION_ENDPOINT;
use fiordispino_core::{ApiClient, TokenStore};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod config;
pub mod cookies;
pub mod error;
pub mod guard;
pub mod routes;

use config::WebConfig;
use cookies::TokenCookieStore;
use guard::{GuardedRouter, LOGIN_PAGE};
use routes::{pages, session};

#[derive(Clone)]
pub struct AppState {
    config: Arc<WebConfig>,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: WebConfig) -> anyhow::Result<Self> {
        let http = ApiClient::http_client(&config.client)?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    fn api(&self, tokens: TokenStore) -> ApiClient {
        ApiClient::with_client(self.http.clone(), &self.config.client.api_base_url, tokens)
    }

    /// Gateway for anonymous backend reads
    pub fn public_api(&self) -> ApiClient {
        self.api(TokenStore::in_memory())
    }

    /// Gateway carrying the token from this request's session cookie
    pub fn session_api(&self, cookies: &TokenCookieStore) -> ApiClient {
        match cookies.token() {
            Some(token) => self.api(TokenStore::with_token(&token)),
            None => self.public_api(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    GuardedRouter::new()
        .public("/", get(pages::home))
        .public(LOGIN_PAGE, get(pages::login))
        .public("/games/:id", get(pages::game))
        .public("/users/:username", get(pages::profile))
        .protected("/library", get(pages::library))
        .public(SESSION_ENDPOINT, post(session::update_session))
        .into_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: WebConfig) -> anyhow::Result<()> {
    let address = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config)?;
    let app = create_app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
