use super::errors::TokenProviderError;
use super::types::{
    CredentialMode, CredentialRequest, LoginArguments, SharedAccessSignatureArguments,
    SharedSecretArguments,
};
use crate::secure::SecurePassword;
use crate::settings::SettingKey;
use std::fmt;
use url::Url;
use zeroize::Zeroizing;

/// Longest accepted shared access key name and key.
pub const MAX_SHARED_ACCESS_KEY_LENGTH: usize = 256;

/// Builds the credential provider for a connection string.
///
/// Implementations receive every configured credential tuple and decide
/// which one to use. Returning `Ok(None)` means no credentials are configured
/// and the caller runs unauthenticated or supplies its own provider.
///
/// # Examples
///
/// ```no_run
/// use connection::credentials::{CredentialRequest, TokenProviderError, TokenProviderFactory};
///
/// struct KeyNameOnly;
///
/// impl TokenProviderFactory for KeyNameOnly {
///     type Provider = String;
///
///     fn create(&self, request: CredentialRequest) -> Result<Option<String>, TokenProviderError> {
///         Ok(request.shared_access_signature.and_then(|sas| sas.key_name))
///     }
/// }
/// ```
pub trait TokenProviderFactory {
    type Provider;

    /// # Errors
    ///
    /// Returns [`TokenProviderError`] when the configured arguments are
    /// incomplete or rejected.
    fn create(
        &self,
        request: CredentialRequest,
    ) -> Result<Option<Self::Provider>, TokenProviderError>;
}

/// Validated credential provider description.
///
/// Carries the arguments a token-issuing implementation needs for one mode.
/// Secret parts stay in erasable buffers and are masked in `Debug`.
pub enum TokenProvider {
    SharedAccessSignature {
        key_name: String,
        key: Zeroizing<String>,
    },
    SharedSecret {
        issuer: String,
        secret: Zeroizing<String>,
        sts_endpoint: Option<Url>,
    },
    Windows {
        sts_endpoints: Vec<Url>,
        credential: LoginCredential,
    },
    OAuth {
        sts_endpoints: Vec<Url>,
        credential: LoginCredential,
    },
}

impl TokenProvider {
    pub fn mode(&self) -> CredentialMode {
        match self {
            TokenProvider::SharedAccessSignature { .. } => CredentialMode::SharedAccessSignature,
            TokenProvider::SharedSecret { .. } => CredentialMode::SharedSecret,
            TokenProvider::Windows { .. } => CredentialMode::Windows,
            TokenProvider::OAuth { .. } => CredentialMode::OAuth,
        }
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenProvider::SharedAccessSignature { key_name, .. } => f
                .debug_struct("SharedAccessSignature")
                .field("key_name", key_name)
                .field("key", &"***")
                .finish(),
            TokenProvider::SharedSecret {
                issuer,
                sts_endpoint,
                ..
            } => f
                .debug_struct("SharedSecret")
                .field("issuer", issuer)
                .field("secret", &"***")
                .field("sts_endpoint", sts_endpoint)
                .finish(),
            TokenProvider::Windows {
                sts_endpoints,
                credential,
            } => f
                .debug_struct("Windows")
                .field("sts_endpoints", sts_endpoints)
                .field("credential", credential)
                .finish(),
            TokenProvider::OAuth {
                sts_endpoints,
                credential,
            } => f
                .debug_struct("OAuth")
                .field("sts_endpoints", sts_endpoints)
                .field("credential", credential)
                .finish(),
        }
    }
}

/// Username, optional domain, and password for a login-based mode.
#[derive(Debug)]
pub struct LoginCredential {
    pub domain: Option<String>,
    pub username: String,
    pub password: SecurePassword,
}

/// Factory used when the caller has no provider implementation of its own.
///
/// Picks the first configured mode in [`CredentialMode::PRECEDENCE`]:
/// shared access signature, then shared secret, then Windows, then OAuth.
/// Lower-precedence tuples are dropped. If nothing is configured but some
/// credential keys are present, the incomplete tuple is reported instead of
/// silently running without credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTokenProviderFactory;

impl TokenProviderFactory for DefaultTokenProviderFactory {
    type Provider = TokenProvider;

    fn create(
        &self,
        request: CredentialRequest,
    ) -> Result<Option<TokenProvider>, TokenProviderError> {
        let configured = request.configured_modes();
        let selected = configured
            .first()
            .copied()
            .or_else(|| {
                CredentialMode::PRECEDENCE
                    .into_iter()
                    .find(|mode| request.is_present(*mode))
            });

        let Some(mode) = selected else {
            log::debug!("No credentials configured");
            return Ok(None);
        };

        if configured.len() > 1 {
            log::warn!(
                "Several credential modes configured ({}); using {}",
                configured
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                mode
            );
        }

        let CredentialRequest {
            sts_endpoints,
            shared_access_signature,
            shared_secret,
            windows,
            oauth,
        } = request;

        let provider = match mode {
            CredentialMode::SharedAccessSignature => {
                shared_access_signature_provider(shared_access_signature)?
            }
            CredentialMode::SharedSecret => shared_secret_provider(shared_secret, &sts_endpoints)?,
            CredentialMode::Windows => TokenProvider::Windows {
                credential: login_credential(windows, WINDOWS_KEYS)?,
                sts_endpoints: require_sts(mode, sts_endpoints)?,
            },
            CredentialMode::OAuth => TokenProvider::OAuth {
                credential: login_credential(oauth, OAUTH_KEYS)?,
                sts_endpoints: require_sts(mode, sts_endpoints)?,
            },
        };

        log::debug!("Selected {mode} credentials");
        Ok(Some(provider))
    }
}

struct LoginKeys {
    username: SettingKey,
    password: SettingKey,
}

const WINDOWS_KEYS: LoginKeys = LoginKeys {
    username: SettingKey::WindowsUsername,
    password: SettingKey::WindowsPassword,
};

const OAUTH_KEYS: LoginKeys = LoginKeys {
    username: SettingKey::OAuthUsername,
    password: SettingKey::OAuthPassword,
};

fn shared_access_signature_provider(
    args: Option<SharedAccessSignatureArguments>,
) -> Result<TokenProvider, TokenProviderError> {
    let SharedAccessSignatureArguments { key_name, key } =
        args.ok_or(TokenProviderError::MissingArgument {
            key: SettingKey::SharedAccessKey,
        })?;

    let key_name = key_name.ok_or(TokenProviderError::MissingArgument {
        key: SettingKey::SharedAccessKeyName,
    })?;
    let key = key.ok_or(TokenProviderError::MissingArgument {
        key: SettingKey::SharedAccessKey,
    })?;

    if key_name.len() > MAX_SHARED_ACCESS_KEY_LENGTH {
        return Err(TokenProviderError::InvalidArgument {
            key: SettingKey::SharedAccessKeyName,
            reason: format!("longer than {MAX_SHARED_ACCESS_KEY_LENGTH} characters"),
        });
    }
    if key.len() > MAX_SHARED_ACCESS_KEY_LENGTH {
        return Err(TokenProviderError::InvalidArgument {
            key: SettingKey::SharedAccessKey,
            reason: format!("longer than {MAX_SHARED_ACCESS_KEY_LENGTH} characters"),
        });
    }

    Ok(TokenProvider::SharedAccessSignature { key_name, key })
}

fn shared_secret_provider(
    args: Option<SharedSecretArguments>,
    sts_endpoints: &[Url],
) -> Result<TokenProvider, TokenProviderError> {
    let SharedSecretArguments { issuer, secret } =
        args.ok_or(TokenProviderError::MissingArgument {
            key: SettingKey::SharedSecretIssuer,
        })?;

    let issuer = issuer.ok_or(TokenProviderError::MissingArgument {
        key: SettingKey::SharedSecretIssuer,
    })?;
    let secret = secret.ok_or(TokenProviderError::MissingArgument {
        key: SettingKey::SharedSecretValue,
    })?;

    Ok(TokenProvider::SharedSecret {
        issuer,
        secret,
        sts_endpoint: sts_endpoints.first().cloned(),
    })
}

fn login_credential(
    args: Option<LoginArguments>,
    keys: LoginKeys,
) -> Result<LoginCredential, TokenProviderError> {
    let LoginArguments {
        domain,
        username,
        password,
    } = args.ok_or(TokenProviderError::MissingArgument { key: keys.username })?;

    let username = username.ok_or(TokenProviderError::MissingArgument { key: keys.username })?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or(TokenProviderError::MissingArgument { key: keys.password })?;

    Ok(LoginCredential {
        domain,
        username,
        password,
    })
}

fn require_sts(mode: CredentialMode, sts_endpoints: Vec<Url>) -> Result<Vec<Url>, TokenProviderError> {
    if sts_endpoints.is_empty() {
        return Err(TokenProviderError::MissingStsEndpoint { mode });
    }
    Ok(sts_endpoints)
}
