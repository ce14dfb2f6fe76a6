use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JWTConfig;

/// The Identity struct represents an authenticated principal.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    /// Unix timestamp of account creation, as reported by the auth provider.
    pub created_at: i64,
    /// Arbitrary profile metadata (display name, locale, ...).
    pub metadata: HashMap<String, String>,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    jti: String,
    exp: i64,
    iat: i64,

    email: String,
    created_at: i64,
    metadata: HashMap<String, String>,
}

impl Identity {
    /// Construct a new Identity with optional metadata.
    pub fn new(id: String, email: String, metadata: Option<HashMap<String, String>>) -> Self {
        Identity {
            id,
            email,
            created_at: Utc::now().timestamp(),
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Convert an Identity into a signed session token, using the config
    /// from `JWTConfig`. The `jti` claim carries the session id.
    pub fn to_session_jwt(&self, session_id: &str, jwtconfig: &JWTConfig) -> Result<String, String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: self.id.clone(),
            iss: jwtconfig.iss.clone(),
            jti: session_id.to_string(),
            exp: now + jwtconfig.exp,
            iat: now,
            email: self.email.clone(),
            created_at: self.created_at,
            metadata: self.metadata.clone(),
        };

        let encoding_key = EncodingKey::from_secret(jwtconfig.secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| format!("Failed to encode session token: {}", e))
    }

    /// Validate a session token and rebuild the Identity it carries.
    /// Expiry and issuer are checked; an expired or foreign token is an error.
    pub fn from_session_jwt(token: &str, jwtconfig: &JWTConfig) -> Result<Identity, String> {
        let mut validation = Validation::default();
        validation.validate_aud = false;
        validation.set_issuer(&[&jwtconfig.iss]);

        let decoding_key = DecodingKey::from_secret(jwtconfig.secret.as_ref());
        let data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Invalid session token: {}", e))?;

        Ok(Identity {
            id: data.claims.sub,
            email: data.claims.email,
            created_at: data.claims.created_at,
            metadata: data.claims.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_jwt_config() -> JWTConfig {
        JWTConfig {
            iss: "test_issuer".to_string(),
            exp: 3600,
            secret: "secretkey".to_string(),
        }
    }

    /// Converting an Identity to a session token and back yields the same identity.
    #[test]
    fn test_session_jwt_round_trip() {
        let mut metadata = HashMap::new();
        metadata.insert("display_name".to_string(), "Test User".to_string());
        let identity = Identity::new(
            "u1".to_string(),
            "user@example.com".to_string(),
            Some(metadata),
        );

        let jwt_config = default_jwt_config();
        let token = identity
            .to_session_jwt("session-1", &jwt_config)
            .expect("token should encode");

        let restored =
            Identity::from_session_jwt(&token, &jwt_config).expect("token should decode");
        assert_eq!(restored, identity);
    }

    /// A token signed with a different secret does not validate.
    #[test]
    fn test_session_jwt_wrong_secret_rejected() {
        let identity = Identity::new("u1".to_string(), "user@example.com".to_string(), None);
        let token = identity
            .to_session_jwt("session-1", &default_jwt_config())
            .expect("token should encode");

        let other = JWTConfig {
            iss: "test_issuer".to_string(),
            exp: 3600,
            secret: "a-different-secret".to_string(),
        };
        assert!(Identity::from_session_jwt(&token, &other).is_err());
    }

    /// A token from a different issuer does not validate.
    #[test]
    fn test_session_jwt_wrong_issuer_rejected() {
        let identity = Identity::new("u1".to_string(), "user@example.com".to_string(), None);
        let mut config = default_jwt_config();
        config.iss = "someone-else".to_string();
        let token = identity
            .to_session_jwt("session-1", &config)
            .expect("token should encode");

        assert!(Identity::from_session_jwt(&token, &default_jwt_config()).is_err());
    }
}
