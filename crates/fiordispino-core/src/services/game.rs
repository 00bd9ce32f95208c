use serde_json::Value;
use tracing::warn;

use crate::api::{ApiClient, ApiError, CancelSignal};
use crate::models::{Game, Genre};

const GENRES_PATH: &str = "/genre/";
const GAMES_PATH: &str = "/game/";

#[derive(Clone)]
pub struct GameService {
    api: ApiClient,
}

impl GameService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.api
            .get(GENRES_PATH, &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn genre(&self, id: u64) -> Result<Genre, ApiError> {
        self.api
            .get(&format!("{}{}", GENRES_PATH, id), &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    /// Whole catalog. A body that is not a list yields no games.
    pub async fn games(&self) -> Result<Vec<Game>, ApiError> {
        let body: Value = self
            .api
            .get(GAMES_PATH, &[], None)
            .await
            .map_err(ApiError::into_validation)?;
        Self::game_list(body)
    }

    pub async fn game(&self, id: u64) -> Result<Game, ApiError> {
        self.api
            .get(&format!("{}{}", GAMES_PATH, id), &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    /// Catalog search; pass a signal to drop superseded searches.
    pub async fn search_games(&self, term: &str, cancel: Option<CancelSignal>) -> Result<Vec<Game>, ApiError> {
        let body: Value = self
            .api
            .get(GAMES_PATH, &[("search", term)], cancel)
            .await
            .map_err(ApiError::into_validation)?;
        Self::game_list(body)
    }

    fn game_list(body: Value) -> Result<Vec<Game>, ApiError> {
        if !body.is_array() {
            warn!("Game list response is not an array");
            return Ok(Vec::new());
        }
        serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse game list: {}", e)))
    }
}
