use async_trait::async_trait;
use tracing::debug;

use super::token::TokenConfig;

/// Checks that a credential belongs to the user it is presented for
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str, claimed_user_id: &str) -> bool;
}

/// Verifies guest JWTs: the token must decode and its subject must match
pub struct JwtAuthVerifier {
    token_config: TokenConfig,
}

impl JwtAuthVerifier {
    pub fn new(token_config: TokenConfig) -> Self {
        Self { token_config }
    }
}

#[async_trait]
impl AuthVerifier for JwtAuthVerifier {
    async fn verify(&self, token: &str, claimed_user_id: &str) -> bool {
        match self.token_config.validate_token(token) {
            Ok(claims) => {
                let matches = claims.sub == claimed_user_id;
                if !matches {
                    debug!(
                        claimed_user_id = %claimed_user_id,
                        token_subject = %claims.sub,
                        "Token subject does not match claimed user"
                    );
                }
                matches
            }
            Err(_) => false,
        }
    }
}
