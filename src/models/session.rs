use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::JWTConfig;
use crate::models::identity::Identity;

/// A live session: a signed token paired with the Identity it belongs to.
/// At most one session is current within a running app instance.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    /// Session id, also embedded in the token as the `jti` claim.
    pub id: String,
    pub token: String,
    pub identity: Identity,
    /// Unix timestamp after which the session is no longer valid.
    pub expires_at: i64,
}

impl Session {
    /// Issue a fresh session for an identity. The token is a signed JWT
    /// whose expiry comes from the `JWTConfig`.
    pub fn issue(identity: Identity, jwtconfig: &JWTConfig) -> Result<Self, String> {
        let id = uuid::Uuid::new_v4().to_string();
        let token = identity.to_session_jwt(&id, jwtconfig)?;
        Ok(Session {
            id,
            token,
            identity,
            expires_at: Utc::now().timestamp() + jwtconfig.exp,
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

    #[test]
    fn test_issue_produces_validating_token() {
        let identity = Identity::new("u1".to_string(), "user@example.com".to_string(), None);
        let config = default_jwt_config();
        let session = Session::issue(identity.clone(), &config).expect("issue should succeed");

        let restored =
            Identity::from_session_jwt(&session.token, &config).expect("token should validate");
        assert_eq!(restored, identity);
        assert!(session.expires_at > Utc::now().timestamp());
    }

    #[test]
    fn test_issued_sessions_have_distinct_ids() {
        let identity = Identity::new("u1".to_string(), "user@example.com".to_string(), None);
        let config = default_jwt_config();
        let a = Session::issue(identity.clone(), &config).expect("issue should succeed");
        let b = Session::issue(identity, &config).expect("issue should succeed");
        assert_ne!(a.id, b.id);
    }
}
