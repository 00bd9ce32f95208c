use serde::Serialize;
use tracing::debug;

use crate::api::{segment_path, ApiClient, ApiError};
use crate::models::{GamePlayed, GameToPlay, LibraryLists, Rating};

const PLAYED_PATH: &str = "/games-played/";
const TO_PLAY_PATH: &str = "/games-to-play/";

#[derive(Serialize)]
struct AddToPlay {
    game: u64,
}

#[derive(Serialize)]
struct AddPlayed {
    game: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
}

#[derive(Serialize)]
struct RatingBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
}

/// "To play" and "played" lists.
#[derive(Clone)]
pub struct LibraryService {
    api: ApiClient,
}

impl LibraryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn require_session(&self) -> Result<(), ApiError> {
        if self.api.tokens().is_authenticated() {
            Ok(())
        } else {
            debug!("Library call refused without a session");
            Err(ApiError::Unauthenticated)
        }
    }

    // ===== Lists by owner =====

    pub async fn games_played_by(&self, username: &str) -> Result<Vec<GamePlayed>, ApiError> {
        self.api
            .get(&segment_path(&format!("{}owner/", PLAYED_PATH), username)?, &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn games_to_play_by(&self, username: &str) -> Result<Vec<GameToPlay>, ApiError> {
        self.api
            .get(&segment_path(&format!("{}owner/", TO_PLAY_PATH), username)?, &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn lists_of(&self, username: &str) -> Result<LibraryLists, ApiError> {
        let (to_play, played) =
            futures::try_join!(self.games_to_play_by(username), self.games_played_by(username))?;
        Ok(LibraryLists { to_play, played })
    }

    // ===== Lists of the session user =====

    pub async fn my_games_played(&self) -> Result<Vec<GamePlayed>, ApiError> {
        self.require_session()?;
        self.api
            .get(PLAYED_PATH, &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn my_games_to_play(&self) -> Result<Vec<GameToPlay>, ApiError> {
        self.require_session()?;
        self.api
            .get(TO_PLAY_PATH, &[], None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn my_lists(&self) -> Result<LibraryLists, ApiError> {
        let (to_play, played) = futures::try_join!(self.my_games_to_play(), self.my_games_played())?;
        Ok(LibraryLists { to_play, played })
    }

    // ===== Writes =====

    pub async fn add_game_to_play(&self, game: u64) -> Result<GameToPlay, ApiError> {
        self.require_session()?;
        self.api
            .post(TO_PLAY_PATH, &AddToPlay { game }, None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn add_game_played(&self, game: u64, rating: Option<Rating>) -> Result<GamePlayed, ApiError> {
        self.require_session()?;
        self.api
            .post(PLAYED_PATH, &AddPlayed { game, rating }, None)
            .await
            .map_err(ApiError::into_validation)
    }

    /// Move a "to play" entry into the played list, optionally rating it.
    pub async fn move_to_played(&self, to_play_id: u64, rating: Option<Rating>) -> Result<GamePlayed, ApiError> {
        self.require_session()?;
        self.api
            .post(
                &format!("{}{}/move-in-played/", TO_PLAY_PATH, to_play_id),
                &RatingBody { rating },
                None,
            )
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn move_to_play(&self, played_id: u64) -> Result<GameToPlay, ApiError> {
        self.require_session()?;
        self.api
            .post_empty(&format!("{}{}/move-in-to-play/", PLAYED_PATH, played_id), None)
            .await
            .map_err(ApiError::into_validation)
    }

    pub async fn rate_played(&self, played_id: u64, rating: Rating) -> Result<GamePlayed, ApiError> {
        self.require_session()?;
        self.api
            .patch(
                &format!("{}{}/", PLAYED_PATH, played_id),
                &RatingBody { rating: Some(rating) },
                None,
            )
            .await
            .map_err(ApiError::into_validation)
    }
}
