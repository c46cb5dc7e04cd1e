use crate::secure::SecurePassword;
use crate::settings::{ConnectionSettings, SettingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use zeroize::Zeroizing;

/// Authentication modes a connection string can configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    /// `SharedAccessKeyName` + `SharedAccessKey`
    SharedAccessSignature,
    /// `SharedSecretIssuer` + `SharedSecretValue`
    SharedSecret,
    /// `WindowsDomain` + `WindowsUsername` + `WindowsPassword`
    Windows,
    /// `OAuthDomain` + `OAuthUsername` + `OAuthPassword`
    OAuth,
}

impl CredentialMode {
    /// Highest precedence first.
    pub const PRECEDENCE: [CredentialMode; 4] = [
        CredentialMode::SharedAccessSignature,
        CredentialMode::SharedSecret,
        CredentialMode::Windows,
        CredentialMode::OAuth,
    ];
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CredentialMode::SharedAccessSignature => "Shared access signature",
            CredentialMode::SharedSecret => "Shared secret",
            CredentialMode::Windows => "Windows",
            CredentialMode::OAuth => "OAuth",
        })
    }
}

/// Key name and key for shared access signature credentials.
pub struct SharedAccessSignatureArguments {
    pub key_name: Option<String>,
    pub key: Option<Zeroizing<String>>,
}

/// Issuer name and secret for legacy shared secret credentials.
pub struct SharedSecretArguments {
    pub issuer: Option<String>,
    pub secret: Option<Zeroizing<String>>,
}

/// Domain login for either Windows or OAuth credentials.
pub struct LoginArguments {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecurePassword>,
}

impl LoginArguments {
    fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// Every credential tuple a connection string configures, together with the
/// secure token service endpoints, as handed to a
/// [`TokenProviderFactory`](super::TokenProviderFactory).
///
/// Tuples are extracted independently; a tuple is `Some` when any of its keys
/// is present. Nothing here decides which one wins.
pub struct CredentialRequest {
    pub sts_endpoints: Vec<Url>,
    pub shared_access_signature: Option<SharedAccessSignatureArguments>,
    pub shared_secret: Option<SharedSecretArguments>,
    pub windows: Option<LoginArguments>,
    pub oauth: Option<LoginArguments>,
}

impl CredentialRequest {
    pub fn from_settings(settings: &ConnectionSettings, sts_endpoints: Vec<Url>) -> Self {
        let owned = |key| settings.get(key).map(str::to_string);
        let secret = |key| settings.get(key).map(|v| Zeroizing::new(v.to_string()));
        let any = |keys: &[SettingKey]| keys.iter().any(|k| settings.contains(*k));

        let shared_access_signature = any(&[
            SettingKey::SharedAccessKeyName,
            SettingKey::SharedAccessKey,
        ])
        .then(|| SharedAccessSignatureArguments {
            key_name: owned(SettingKey::SharedAccessKeyName),
            key: secret(SettingKey::SharedAccessKey),
        });

        let shared_secret = any(&[SettingKey::SharedSecretIssuer, SettingKey::SharedSecretValue])
            .then(|| SharedSecretArguments {
                issuer: owned(SettingKey::SharedSecretIssuer),
                secret: secret(SettingKey::SharedSecretValue),
            });

        let windows = any(&[
            SettingKey::WindowsDomain,
            SettingKey::WindowsUsername,
            SettingKey::WindowsPassword,
        ])
        .then(|| LoginArguments {
            domain: owned(SettingKey::WindowsDomain),
            username: owned(SettingKey::WindowsUsername),
            password: settings.secure(SettingKey::WindowsPassword),
        });

        let oauth = any(&[
            SettingKey::OAuthDomain,
            SettingKey::OAuthUsername,
            SettingKey::OAuthPassword,
        ])
        .then(|| LoginArguments {
            domain: owned(SettingKey::OAuthDomain),
            username: owned(SettingKey::OAuthUsername),
            password: settings.secure(SettingKey::OAuthPassword),
        });

        Self {
            sts_endpoints,
            shared_access_signature,
            shared_secret,
            windows,
            oauth,
        }
    }

    /// Whether the identifying part of `mode` is set: the SAS key, the
    /// shared secret issuer, or a username with a non-empty password.
    pub fn is_configured(&self, mode: CredentialMode) -> bool {
        match mode {
            CredentialMode::SharedAccessSignature => self
                .shared_access_signature
                .as_ref()
                .is_some_and(|a| a.key.is_some()),
            CredentialMode::SharedSecret => {
                self.shared_secret.as_ref().is_some_and(|a| a.issuer.is_some())
            }
            CredentialMode::Windows => self.windows.as_ref().is_some_and(LoginArguments::is_complete),
            CredentialMode::OAuth => self.oauth.as_ref().is_some_and(LoginArguments::is_complete),
        }
    }

    /// Configured modes in precedence order.
    pub fn configured_modes(&self) -> Vec<CredentialMode> {
        CredentialMode::PRECEDENCE
            .into_iter()
            .filter(|mode| self.is_configured(*mode))
            .collect()
    }

    /// Whether any key of `mode` is present, configured or not.
    pub fn is_present(&self, mode: CredentialMode) -> bool {
        match mode {
            CredentialMode::SharedAccessSignature => self.shared_access_signature.is_some(),
            CredentialMode::SharedSecret => self.shared_secret.is_some(),
            CredentialMode::Windows => self.windows.is_some(),
            CredentialMode::OAuth => self.oauth.is_some(),
        }
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present: Vec<_> = CredentialMode::PRECEDENCE
            .into_iter()
            .filter(|mode| self.is_present(*mode))
            .collect();
        f.debug_struct("CredentialRequest")
            .field("sts_endpoints", &self.sts_endpoints)
            .field("present", &present)
            .finish_non_exhaustive()
    }
}
