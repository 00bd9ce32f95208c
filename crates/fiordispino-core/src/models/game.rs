use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Genre {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Game {
    pub id: u64,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Genre ids
    #[serde(default)]
    pub genres: Vec<u64>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

impl Game {
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_game() {
        let game: Game = serde_json::from_str(r#"{"id": 3, "name": "Hollow Knight"}"#).unwrap();
        assert_eq!(game.id, 3);
        assert!(game.genres.is_empty());
        assert_eq!(game.release_year(), None);
    }

    #[test]
    fn test_parse_full_game() {
        let json = r#"{"id": 1, "title": "Celeste", "description": "Climb", "genres": [2, 5], "cover": null, "release_date": "2018-01-25", "developer": "EXOK"}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.name, "Celeste");
        assert_eq!(game.genres, vec![2, 5]);
        assert_eq!(game.release_year(), Some(2018));
    }
}
