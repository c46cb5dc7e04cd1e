use crate::errors::ConnectionResult;
use crate::settings::ConnectionSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable holder for a connection string, as read from a configuration
/// file or environment.
///
/// # Connection String Format
///
/// ```text
/// Endpoint=sb://my-namespace.servicebus.windows.net/;SharedAccessKeyName=RootManageSharedAccessKey;SharedAccessKey=abcd1234...
/// ```
///
/// # Security Considerations
///
/// - `Debug` never prints the value
/// - Prefer environment variables or a key vault over committing the value
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConnectionStringConfig {
    /// The connection string (REQUIRED)
    pub value: String,
}

impl ConnectionStringConfig {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Parses `value` into validated settings.
    pub fn settings(&self) -> ConnectionResult<ConnectionSettings> {
        ConnectionSettings::parse(&self.value)
    }
}

impl fmt::Debug for ConnectionStringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionStringConfig")
            .field("value", &"***")
            .finish()
    }
}

impl Drop for ConnectionStringConfig {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.value);
    }
}
