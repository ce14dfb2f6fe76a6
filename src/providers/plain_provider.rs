use std::collections::HashMap;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Identity;
use crate::providers::{AuthError, CredentialProvider};

/// PlainProviderConfig defines a fixed list of accounts, for development
/// setups and tests.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainProviderConfig {
    /// A friendly name for logs.
    pub name: String,
    /// The account list.
    pub users: Vec<PlainUserEntry>,
}

/// Represents a single account entry.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainUserEntry {
    /// Stable identity id; defaults to the email when omitted.
    pub id: Option<String>,
    pub email: String,
    pub password: String,
    /// Accounts that have not verified their email cannot sign in.
    #[serde(default = "default_verified")]
    pub verified: bool,
    pub metadata: Option<HashMap<String, String>>,
}

fn default_verified() -> bool {
    true
}

/// A `PlainProvider` that checks credentials against the account list in
/// `PlainProviderConfig`.
pub struct PlainProvider {
    pub config: PlainProviderConfig,
}

impl PlainProvider {
    /// Create a new `PlainProvider` from the config struct.
    pub fn new(config: &PlainProviderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl CredentialProvider for PlainProvider {
    /// The display name for logs/debug.
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "plain"
    }

    /// Compare the credentials with the account list. Emails compare
    /// case-insensitively, passwords exactly.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        debug!("Plain sign-in attempt for '{}'", email);
        for entry in &self.config.users {
            if !entry.email.eq_ignore_ascii_case(email) {
                continue;
            }
            if entry.password != password {
                return Err(AuthError::invalid_credentials());
            }
            if !entry.verified {
                return Err(AuthError::email_not_verified());
            }
            let id = entry.id.clone().unwrap_or_else(|| entry.email.clone());
            return Ok(Identity::new(
                id,
                entry.email.clone(),
                entry.metadata.clone(),
            ));
        }

        Err(AuthError::invalid_credentials())
    }
}
