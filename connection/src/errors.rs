use crate::credentials::TokenProviderError;
use crate::settings::SettingKey;
use thiserror::Error;

/// Errors raised while parsing a connection string or assembling a client
/// configuration from it.
///
/// Messages name the offending key or a structural fragment of the input.
/// Secret values (keys, passwords) never appear in a message.
///
/// # Error Categories
///
/// ## Parse-time
/// - [`MalformedInput`] - the string does not decompose into clean pairs
/// - [`DuplicateKey`] - the same key was supplied more than once
///
/// ## Build-time
/// - [`MissingRequiredField`] - `Endpoint` is absent or blank
/// - [`InvalidConnectionString`] - a value could not become a URI or was
///   rejected by the credential-provider factory
///
/// [`MalformedInput`]: ConnectionStringError::MalformedInput
/// [`DuplicateKey`]: ConnectionStringError::DuplicateKey
/// [`MissingRequiredField`]: ConnectionStringError::MissingRequiredField
/// [`InvalidConnectionString`]: ConnectionStringError::InvalidConnectionString
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("Malformed connection string: {reason}")]
    MalformedInput { reason: String },

    #[error("Connection string contains the key '{key}' more than once")]
    DuplicateKey { key: SettingKey },

    #[error("Connection string is missing the required '{key}' setting")]
    MissingRequiredField { key: SettingKey },

    #[error("Invalid connection string value for '{key}': {message}")]
    InvalidConnectionString { key: String, message: String },
}

impl ConnectionStringError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConnectionString {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Key the error is about, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::DuplicateKey { key } | Self::MissingRequiredField { key } => Some(key.as_str()),
            Self::InvalidConnectionString { key, .. } => Some(key),
            Self::MalformedInput { .. } => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput { reason } => format!(
                "The connection string could not be read.\n\n\
                {reason}\n\n\
                Expected format: 'Endpoint=sb://your-namespace.servicebus.windows.net/;SharedAccessKeyName=...;SharedAccessKey=...'"
            ),
            Self::DuplicateKey { key } => format!(
                "The connection string sets '{key}' more than once.\n\n\
                Remove the duplicate entry and try again."
            ),
            Self::MissingRequiredField { key } => format!(
                "The connection string has no '{key}'.\n\n\
                Add '{key}=sb://your-namespace.servicebus.windows.net/' to the connection string."
            ),
            Self::InvalidConnectionString { key, message } => format!(
                "The value of '{key}' cannot be used.\n\n\
                {message}"
            ),
        }
    }
}

impl From<TokenProviderError> for ConnectionStringError {
    fn from(err: TokenProviderError) -> Self {
        let key = err.key().map_or_else(|| "credentials".to_string(), str::to_string);
        ConnectionStringError::InvalidConnectionString {
            key,
            message: err.to_string(),
        }
    }
}

pub type ConnectionResult<T> = Result<T, ConnectionStringError>;
