use super::CredentialMode;
use crate::settings::SettingKey;
use thiserror::Error;

/// Errors raised by a [`TokenProviderFactory`](super::TokenProviderFactory)
/// when the supplied credential arguments cannot produce a provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenProviderError {
    #[error("'{key}' is required for this credential mode")]
    MissingArgument { key: SettingKey },

    #[error("'{key}' is invalid: {reason}")]
    InvalidArgument { key: SettingKey, reason: String },

    #[error("{mode} credentials require at least one StsEndpoint")]
    MissingStsEndpoint { mode: CredentialMode },
}

impl TokenProviderError {
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingArgument { key } | Self::InvalidArgument { key, .. } => Some(key.as_str()),
            Self::MissingStsEndpoint { .. } => Some(SettingKey::StsEndpoint.as_str()),
        }
    }
}
