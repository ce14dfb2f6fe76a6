use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::http_provider::{HttpProvider, HttpProviderConfig};
use super::plain_provider::{PlainProvider, PlainProviderConfig};
use crate::models::Identity;

/// Stable error taxonomy for sign-in failures. Providers translate their
/// backend's machine-readable codes into these kinds at the boundary;
/// nothing downstream ever inspects provider error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    EmailNotVerified,
    Unknown,
}

/// A sign-in failure with a stable kind and an optional diagnostic detail.
/// The detail is for logs only; user-facing text comes from `user_message`.
#[derive(Debug, Clone)]
pub struct AuthError {
    kind: AuthErrorKind,
    detail: Option<String>,
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError {
            kind: AuthErrorKind::InvalidCredentials,
            detail: None,
        }
    }

    pub fn email_not_verified() -> Self {
        AuthError {
            kind: AuthErrorKind::EmailNotVerified,
            detail: None,
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        AuthError {
            kind: AuthErrorKind::Unknown,
            detail: Some(detail.into()),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::InvalidCredentials => "invalid_credentials",
            AuthErrorKind::EmailNotVerified => "email_not_verified",
            AuthErrorKind::Unknown => "unknown",
        }
    }

    /// The message shown to the user for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::InvalidCredentials => "Invalid email or password.",
            AuthErrorKind::EmailNotVerified => {
                "Please verify your email address before signing in."
            }
            AuthErrorKind::Unknown => "Sign-in failed. Please try again.",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.code(), detail),
            None => write!(f, "{}", self.code()),
        }
    }
}

impl std::error::Error for AuthError {}

/// Configuration options for each credential provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "plain")]
    Plain(PlainProviderConfig),

    #[serde(rename = "http")]
    Http(HttpProviderConfig),
}

/// A credential provider validates an email/password pair and returns the
/// authenticated Identity or a typed AuthError.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_type(&self) -> &str;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Create a credential provider from a given config.
pub fn create_credential_provider(config: &ProviderConfig) -> Box<dyn CredentialProvider> {
    match config {
        ProviderConfig::Plain(cfg) => Box::new(PlainProvider::new(cfg)),
        ProviderConfig::Http(cfg) => Box::new(HttpProvider::new(cfg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_fixed_per_kind() {
        assert_eq!(
            AuthError::invalid_credentials().user_message(),
            "Invalid email or password."
        );
        assert_eq!(
            AuthError::email_not_verified().user_message(),
            "Please verify your email address before signing in."
        );
        // The detail never leaks into the user-facing message.
        let err = AuthError::unknown("backend exploded");
        assert_eq!(err.user_message(), "Sign-in failed. Please try again.");
        assert!(err.to_string().contains("backend exploded"));
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            AuthError::invalid_credentials().code(),
            "invalid_credentials"
        );
        assert_eq!(AuthError::email_not_verified().code(), "email_not_verified");
        assert_eq!(AuthError::unknown("x").code(), "unknown");
    }
}
