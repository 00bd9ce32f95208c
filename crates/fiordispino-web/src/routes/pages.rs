//! Page data for the server-rendered routes.
//!
//! Each handler returns the data its page renders, as JSON. Public pages
//! call the backend anonymously; protected pages forward the cookie token.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use fiordispino_core::models::{Game, Genre, LibraryLists};
use fiordispino_core::{GameService, LibraryService};
use serde::Serialize;
use tracing::{error, info};

use crate::cookies::TokenCookieStore;
use crate::error::AppError;
use crate::guard::LOGIN_PAGE;
use crate::AppState;

const GAMES_ERROR: &str = "Error on loading games";

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub games: Vec<Game>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct GamePage {
    pub game: Game,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Serialize)]
pub struct LibraryPage {
    pub username: Option<String>,
    pub lists: LibraryLists,
    pub average_rating: Option<f32>,
}

/// Catalog front page. Backend failures render as an empty list with a message.
pub async fn home(State(state): State<AppState>) -> Json<HomePage> {
    match GameService::new(state.public_api()).games().await {
        Ok(games) => Json(HomePage { games, error: None }),
        Err(e) => {
            error!(error = %e, "Failed to load games");
            Json(HomePage {
                games: Vec::new(),
                error: Some(GAMES_ERROR.to_string()),
            })
        }
    }
}

pub async fn login(jar: CookieJar) -> Json<LoginPage> {
    Json(LoginPage {
        authenticated: TokenCookieStore::new(jar).is_authenticated(),
    })
}

pub async fn game(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<GamePage>, AppError> {
    let games = GameService::new(state.public_api());
    let (game, genres) = futures::try_join!(games.game(id), games.genres())?;
    let genres = genres
        .into_iter()
        .filter(|genre| game.genres.contains(&genre.id))
        .collect();
    Ok(Json(GamePage { game, genres }))
}

pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<LibraryPage>, AppError> {
    let lists = LibraryService::new(state.public_api()).lists_of(&username).await?;
    Ok(Json(LibraryPage {
        username: Some(username),
        average_rating: lists.average_rating(),
        lists,
    }))
}

/// The session user's own lists. Protected: the guard has already checked
/// that a cookie exists. If the backend no longer accepts it, the cookie is
/// dropped and the user is sent to log in again.
pub async fn library(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let mut cookies = TokenCookieStore::new(jar);
    let library = LibraryService::new(state.session_api(&cookies));

    match library.my_lists().await {
        Ok(lists) => Ok(Json(LibraryPage {
            username: None,
            average_rating: lists.average_rating(),
            lists,
        })
        .into_response()),
        Err(e) if e.is_unauthorized() => {
            info!("Backend rejected session cookie");
            cookies.remove_token();
            Ok((cookies.into_jar(), Redirect::to(LOGIN_PAGE)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
