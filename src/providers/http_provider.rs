use std::collections::HashMap;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Identity;
use crate::providers::{AuthError, CredentialProvider};

/// HttpProviderConfig points at a remote auth backend exposing a JSON
/// sign-in endpoint.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct HttpProviderConfig {
    /// A friendly name for logs.
    pub name: String,
    /// Base URI of the auth backend; the provider POSTs to `{uri}/sign-in`.
    pub uri: String,
}

/// A provider that delegates credential checks to a remote auth backend.
///
/// The backend answers 200 with the identity payload, or an error status
/// with a machine-readable `code` field. Only that code is interpreted;
/// error messages are carried along for diagnostics but never matched on.
pub struct HttpProvider {
    pub config: HttpProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SignInResponse {
    id: String,
    email: String,
    created_at: Option<i64>,
    metadata: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    code: Option<String>,
    message: Option<String>,
}

impl HttpProvider {
    /// Create a new `HttpProvider` from the config struct.
    pub fn new(config: &HttpProviderConfig) -> Self {
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CredentialProvider for HttpProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "http"
    }

    /// POST the credentials to the backend and translate the response.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/sign-in", self.config.uri.trim_end_matches('/'));
        debug!("HTTP sign-in attempt for '{}' via {}", email, url);

        let response = self
            .client
            .post(&url)
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::unknown(format!("auth backend unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let payload: SignInResponse = response
                .json()
                .await
                .map_err(|e| AuthError::unknown(format!("malformed identity payload: {}", e)))?;
            let mut identity =
                Identity::new(payload.id, payload.email, payload.metadata);
            if let Some(created_at) = payload.created_at {
                identity.created_at = created_at;
            }
            return Ok(identity);
        }

        // Read the error body for its stable code; tolerate bodies that
        // don't parse.
        let error: ErrorResponse = response.json().await.unwrap_or(ErrorResponse {
            code: None,
            message: None,
        });

        match error.code.as_deref() {
            Some("invalid_credentials") => Err(AuthError::invalid_credentials()),
            Some("email_not_verified") => Err(AuthError::email_not_verified()),
            other => {
                warn!(
                    "Auth backend '{}' returned status {} with code {:?}",
                    self.config.name, status, other
                );
                Err(AuthError::unknown(format!(
                    "auth backend status {}: {}",
                    status,
                    error.message.unwrap_or_default()
                )))
            }
        }
    }
}
