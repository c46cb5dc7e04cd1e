use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recognized connection string key.
///
/// The set of variants is the whitelist: anything else in a connection string
/// is rejected by the parser before it reaches the manager builder. Input
/// matching is case-insensitive; [`SettingKey::as_str`] is the canonical
/// spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    Endpoint,
    SharedAccessKeyName,
    EntityPath,
    SharedAccessKey,
    OperationTimeout,
    SharedSecretIssuer,
    SharedSecretValue,
    RuntimePort,
    ManagementPort,
    StsEndpoint,
    WindowsDomain,
    WindowsUsername,
    WindowsPassword,
    OAuthDomain,
    OAuthUsername,
    OAuthPassword,
}

impl SettingKey {
    pub const ALL: [SettingKey; 16] = [
        SettingKey::Endpoint,
        SettingKey::SharedAccessKeyName,
        SettingKey::EntityPath,
        SettingKey::SharedAccessKey,
        SettingKey::OperationTimeout,
        SettingKey::SharedSecretIssuer,
        SettingKey::SharedSecretValue,
        SettingKey::RuntimePort,
        SettingKey::ManagementPort,
        SettingKey::StsEndpoint,
        SettingKey::WindowsDomain,
        SettingKey::WindowsUsername,
        SettingKey::WindowsPassword,
        SettingKey::OAuthDomain,
        SettingKey::OAuthUsername,
        SettingKey::OAuthPassword,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SettingKey::Endpoint => "Endpoint",
            SettingKey::SharedAccessKeyName => "SharedAccessKeyName",
            SettingKey::EntityPath => "EntityPath",
            SettingKey::SharedAccessKey => "SharedAccessKey",
            SettingKey::OperationTimeout => "OperationTimeout",
            SettingKey::SharedSecretIssuer => "SharedSecretIssuer",
            SettingKey::SharedSecretValue => "SharedSecretValue",
            SettingKey::RuntimePort => "RuntimePort",
            SettingKey::ManagementPort => "ManagementPort",
            SettingKey::StsEndpoint => "StsEndpoint",
            SettingKey::WindowsDomain => "WindowsDomain",
            SettingKey::WindowsUsername => "WindowsUsername",
            SettingKey::WindowsPassword => "WindowsPassword",
            SettingKey::OAuthDomain => "OAuthDomain",
            SettingKey::OAuthUsername => "OAuthUsername",
            SettingKey::OAuthPassword => "OAuthPassword",
        }
    }

    /// Whether the value of this key is a credential and must be masked
    /// whenever settings are displayed or logged.
    pub const fn is_secret(self) -> bool {
        matches!(
            self,
            SettingKey::SharedAccessKey
                | SettingKey::SharedSecretValue
                | SettingKey::WindowsPassword
                | SettingKey::OAuthPassword
        )
    }

    /// Case-insensitive whitelist lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a whitelisted key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognized connection string key")]
pub struct UnknownSettingKey(pub String);

impl FromStr for SettingKey {
    type Err = UnknownSettingKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownSettingKey(s.to_string()))
    }
}
