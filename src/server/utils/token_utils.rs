use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::server::error::{AppResult, Error};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user id from the auth provider
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct TokenUtil {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenUtil {
    pub fn new(secret: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// HS256 token for `user_id` that stops working at `expiry` (unix seconds)
    pub fn generate_token(&self, user_id: &str, expiry: i64) -> AppResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiry,
            iat: Utc::now().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            Error::InternalServerErrorWithContext(format!("failed to sign token: {}", e))
        })
    }

    /// the user id the token was issued for, None if it's forged, malformed or expired
    pub fn verify_token(&self, token: &str) -> Option<String> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) if !data.claims.sub.is_empty() => Some(data.claims.sub),
            Ok(_) => None,
            Err(e) => {
                debug!("token rejected: {}", e);
                None
            }
        }
    }

    pub fn generate_expiry(hours: i64) -> i64 {
        Utc::now().timestamp() + (hours * 3600)
    }
}
