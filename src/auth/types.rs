use serde::{Deserialize, Serialize};

/// JWT claims; `sub` is the user id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub sub: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

fn default_preferred_lang() -> String {
    "zh-TW".to_string()
}

/// Request payload for guest login
#[derive(Debug, Deserialize)]
pub struct GuestLoginRequest {
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_preferred_lang")]
    pub preferred_lang: String,
    pub input_lang: Option<String>,
    pub output_lang: Option<String>,
}

/// Response for guest login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
    pub display_name: String,
    pub preferred_lang: String,
}
