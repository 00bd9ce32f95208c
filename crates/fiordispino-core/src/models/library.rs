use serde::{Deserialize, Serialize};

/// Score a user gives a played game; range is validated by the backend.
pub type Rating = u8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GamePlayed {
    pub id: u64,
    /// Game id
    pub game: u64,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GameToPlay {
    pub id: u64,
    /// Game id
    pub game: u64,
    #[serde(default)]
    pub owner: Option<String>,
}

/// Both lists of one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LibraryLists {
    pub to_play: Vec<GameToPlay>,
    pub played: Vec<GamePlayed>,
}

impl LibraryLists {
    pub fn average_rating(&self) -> Option<f32> {
        let ratings: Vec<f32> = self
            .played
            .iter()
            .filter_map(|p| p.rating.map(f32::from))
            .collect();
        if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f32>() / ratings.len() as f32)
        }
    }
}
