pub mod base;
pub mod http_provider;
pub mod plain_provider;

pub use base::{
    create_credential_provider, AuthError, AuthErrorKind, CredentialProvider, ProviderConfig,
};
