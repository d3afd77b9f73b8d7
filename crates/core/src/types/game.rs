//! Catalog records as served by the catalog API.
//!
//! Field names follow the API's camelCase JSON. The cart stores a full copy of
//! a [`Game`] so it survives catalog changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::id::GameId;

/// An immutable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique catalog identifier.
    pub id: GameId,
    pub genre: String,
    /// Image URL or path.
    pub image: String,
    pub name: String,
    pub description: String,
    /// Unit price in the store currency. Accepts a JSON number or string;
    /// negative prices are rejected.
    #[serde(deserialize_with = "non_negative_price")]
    pub price: Decimal,
    #[serde(default)]
    pub is_new: bool,
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = <Decimal as Deserialize>::deserialize(deserializer)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(de::Error::custom(format!("price must not be negative, got {price}")));
    }
    Ok(price)
}

/// One page of the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesPage {
    pub games: Vec<Game>,
    /// Genres the catalog can be filtered by.
    #[serde(default)]
    pub available_filters: Vec<String>,
    pub total_pages: u32,
    pub current_page: u32,
}

impl GamesPage {
    /// Whether another page can be requested after this one.
    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Find a game on this page by ID.
    #[must_use]
    pub fn find(&self, id: &GameId) -> Option<&Game> {
        self.games.iter().find(|game| &game.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const API_RESPONSE: &str = r#"{
        "games": [
            {
                "id": "1",
                "genre": "Action",
                "image": "/game-images/cyberpunk2077.jpeg",
                "name": "Cyberpunk 2077",
                "description": "An open-world, action-adventure story.",
                "price": 59.99,
                "isNew": true
            },
            {
                "id": "2",
                "genre": "RPG",
                "image": "/game-images/elden-ring.jpeg",
                "name": "Elden Ring",
                "description": "A fantasy action-RPG adventure.",
                "price": "39.99",
                "isNew": false
            }
        ],
        "availableFilters": ["Action", "RPG"],
        "totalPages": 3,
        "currentPage": 1
    }"#;

    #[test]
    fn test_deserialize_api_response() {
        let page: GamesPage = serde_json::from_str(API_RESPONSE).unwrap();
        assert_eq!(page.games.len(), 2);
        assert_eq!(page.available_filters, vec!["Action", "RPG"]);
        assert_eq!(page.games[0].price, Decimal::from_str("59.99").unwrap());
        assert_eq!(page.games[1].price, Decimal::from_str("39.99").unwrap());
        assert!(page.games[0].is_new);
        assert!(page.has_more_pages());
    }

    #[test]
    fn test_missing_available_filters_defaults_to_empty() {
        let page: GamesPage =
            serde_json::from_str(r#"{"games": [], "totalPages": 1, "currentPage": 1}"#).unwrap();
        assert!(page.available_filters.is_empty());
        assert!(!page.has_more_pages());
    }

    #[test]
    fn test_missing_games_is_rejected() {
        let result = serde_json::from_str::<GamesPage>(r#"{"totalPages": 1, "currentPage": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let json = r#"{"id": "1", "genre": "Action", "image": "x.jpg", "name": "Bad",
            "description": "d", "price": -59.99}"#;
        let err = serde_json::from_str::<Game>(json).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));

        let as_string = json.replace("-59.99", "\"-1\"");
        assert!(serde_json::from_str::<Game>(&as_string).is_err());
    }

    #[test]
    fn test_zero_price_is_accepted() {
        let json = r#"{"id": "1", "genre": "Action", "image": "x.jpg", "name": "Free",
            "description": "d", "price": 0}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.price, Decimal::ZERO);
    }

    #[test]
    fn test_find_by_id() {
        let page: GamesPage = serde_json::from_str(API_RESPONSE).unwrap();
        let found = page.find(&GameId::new("2")).unwrap();
        assert_eq!(found.name, "Elden Ring");
        assert!(page.find(&GameId::new("99")).is_none());
    }
}
