use serde::{Deserialize, Serialize};

use super::models::LangOverride;

fn default_board_lang() -> String {
    "en".to_string()
}

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct RoomCreateRequest {
    pub name: String,
    #[serde(default = "default_board_lang")]
    pub default_board_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardLangRequest {
    pub board_lang: String,
}

/// Full replacement set of overrides for a room
#[derive(Debug, Deserialize)]
pub struct UpdateOverridesRequest {
    #[serde(default)]
    pub overrides: Vec<LangOverride>,
}

/// Response for room creation and room information
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub default_board_lang: String,
    pub overrides: Vec<LangOverride>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_board_lang() {
        let request: RoomCreateRequest = serde_json::from_str(r#"{"name":"standup"}"#).unwrap();
        assert_eq!(request.default_board_lang, "en");
    }

    #[test]
    fn test_overrides_request_defaults_to_empty() {
        let request: UpdateOverridesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.overrides.is_empty());
    }
}
