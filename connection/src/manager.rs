//! Turns parsed settings into endpoint lists and a credential provider.

use crate::config::ConnectionStringConfig;
use crate::credentials::{CredentialRequest, TokenProviderFactory};
use crate::endpoints::{EndpointRole, resolve_endpoints};
use crate::errors::{ConnectionResult, ConnectionStringError};
use crate::settings::{ConnectionSettings, SettingKey};
use url::Url;

/// Everything a network client needs to connect: where to connect, where to
/// obtain tokens, which credential provider to use, and the optional timeout.
#[derive(Debug)]
pub struct ManagerConfiguration<P> {
    /// Surface the endpoints were resolved for
    pub role: EndpointRole,
    /// Service endpoints in connection string order, port override applied
    pub endpoints: Vec<Url>,
    /// Secure token service endpoints; empty when `StsEndpoint` is not set
    pub sts_endpoints: Vec<Url>,
    /// Provider built by the factory; `None` when no credentials are configured
    pub token_provider: Option<P>,
    /// Raw `OperationTimeout`; `None` leaves the client's default in place
    pub operation_timeout: Option<String>,
}

/// Validates connection settings and assembles [`ManagerConfiguration`]s.
///
/// Each call is a single pass over the immutable settings: nothing is cached,
/// and fresh secret buffers are created for every build.
///
/// # Examples
///
/// ```no_run
/// use connection::{DefaultTokenProviderFactory, ManagerBuilder};
///
/// let builder = ManagerBuilder::from_connection_string(
///     "Endpoint=sb://ns.servicebus.windows.net/;SharedAccessKeyName=Root;SharedAccessKey=abc=",
/// )?;
/// let config = builder.build(&DefaultTokenProviderFactory)?;
/// assert_eq!(config.endpoints.len(), 1);
/// ```
#[derive(Debug)]
pub struct ManagerBuilder {
    settings: ConnectionSettings,
}

impl ManagerBuilder {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    pub fn from_connection_string(connection_string: &str) -> ConnectionResult<Self> {
        ConnectionSettings::parse(connection_string).map(Self::new)
    }

    pub fn from_config(config: &ConnectionStringConfig) -> ConnectionResult<Self> {
        config.settings().map(Self::new)
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Checks that `Endpoint` is present and non-blank. Every other key is
    /// optional.
    pub fn validate(&self) -> ConnectionResult<()> {
        match self.settings.get(SettingKey::Endpoint) {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(()),
            _ => Err(ConnectionStringError::MissingRequiredField {
                key: SettingKey::Endpoint,
            }),
        }
    }

    /// `Endpoint` URIs with `ManagementPort` applied.
    pub fn management_endpoints(&self) -> ConnectionResult<Vec<Url>> {
        self.endpoints(EndpointRole::Management)
    }

    /// `Endpoint` URIs with `RuntimePort` applied.
    pub fn runtime_endpoints(&self) -> ConnectionResult<Vec<Url>> {
        self.endpoints(EndpointRole::Runtime)
    }

    /// `StsEndpoint` URIs, no port override.
    pub fn sts_endpoints(&self) -> ConnectionResult<Vec<Url>> {
        resolve_endpoints(&self.settings, EndpointRole::SecureTokenService)
    }

    /// All configured credential tuples plus the STS endpoints.
    pub fn credential_request(&self) -> ConnectionResult<CredentialRequest> {
        Ok(CredentialRequest::from_settings(
            &self.settings,
            self.sts_endpoints()?,
        ))
    }

    /// Builds the management-facing configuration.
    ///
    /// # Errors
    ///
    /// - [`ConnectionStringError::MissingRequiredField`] without `Endpoint`
    /// - [`ConnectionStringError::InvalidConnectionString`] when a URI or port
    ///   cannot be built, or the factory rejects the credentials
    pub fn build<F: TokenProviderFactory>(
        &self,
        factory: &F,
    ) -> ConnectionResult<ManagerConfiguration<F::Provider>> {
        self.build_for(EndpointRole::Management, factory)
    }

    /// Builds the runtime-facing configuration. Same errors as [`build`].
    ///
    /// [`build`]: ManagerBuilder::build
    pub fn build_runtime<F: TokenProviderFactory>(
        &self,
        factory: &F,
    ) -> ConnectionResult<ManagerConfiguration<F::Provider>> {
        self.build_for(EndpointRole::Runtime, factory)
    }

    fn endpoints(&self, role: EndpointRole) -> ConnectionResult<Vec<Url>> {
        self.validate()?;
        let endpoints = resolve_endpoints(&self.settings, role)?;
        if endpoints.is_empty() {
            return Err(ConnectionStringError::invalid(
                SettingKey::Endpoint.as_str(),
                "no endpoint URI in the value",
            ));
        }
        Ok(endpoints)
    }

    fn build_for<F: TokenProviderFactory>(
        &self,
        role: EndpointRole,
        factory: &F,
    ) -> ConnectionResult<ManagerConfiguration<F::Provider>> {
        let endpoints = self.endpoints(role)?;
        let sts_endpoints = self.sts_endpoints()?;

        let request = CredentialRequest::from_settings(&self.settings, sts_endpoints.clone());
        let token_provider = factory.create(request)?;

        let operation_timeout = self.settings.operation_timeout().map(str::to_string);

        log::debug!(
            "Built {:?} configuration: {} endpoint(s), {} STS endpoint(s), credentials {}, timeout {}",
            role,
            endpoints.len(),
            sts_endpoints.len(),
            if token_provider.is_some() { "configured" } else { "none" },
            if operation_timeout.is_some() { "set" } else { "default" },
        );

        Ok(ManagerConfiguration {
            role,
            endpoints,
            sts_endpoints,
            token_provider,
            operation_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{
        CredentialMode, DefaultTokenProviderFactory, TokenProvider, TokenProviderError,
    };
    use claims::{assert_err, assert_ok};

    /// Records what it was given instead of building anything.
    struct RecordingFactory;

    impl TokenProviderFactory for RecordingFactory {
        type Provider = Vec<CredentialMode>;

        fn create(
            &self,
            request: CredentialRequest,
        ) -> Result<Option<Self::Provider>, TokenProviderError> {
            Ok(Some(
                CredentialMode::PRECEDENCE
                    .into_iter()
                    .filter(|m| request.is_present(*m))
                    .collect(),
            ))
        }
    }

    struct RejectingFactory;

    impl TokenProviderFactory for RejectingFactory {
        type Provider = ();

        fn create(&self, _: CredentialRequest) -> Result<Option<()>, TokenProviderError> {
            Err(TokenProviderError::InvalidArgument {
                key: SettingKey::SharedAccessKey,
                reason: "not base64".to_string(),
            })
        }
    }

    fn builder(input: &str) -> ManagerBuilder {
        assert_ok!(ManagerBuilder::from_connection_string(input))
    }

    #[test]
    fn test_build_with_management_port() {
        let config = assert_ok!(
            builder("Endpoint=sb://ns.example.net/;ManagementPort=9999")
                .build(&DefaultTokenProviderFactory)
        );
        assert_eq!(config.role, EndpointRole::Management);
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].port(), Some(9999));
        assert_eq!(config.endpoints[0].host_str(), Some("ns.example.net"));
        assert!(config.sts_endpoints.is_empty());
        assert!(config.token_provider.is_none());
        assert!(config.operation_timeout.is_none());
    }

    #[test]
    fn test_missing_endpoint_even_with_credentials() {
        let err = assert_err!(
            builder("SharedAccessKeyName=Root;SharedAccessKey=abc=").build(&DefaultTokenProviderFactory)
        );
        assert_eq!(
            err,
            ConnectionStringError::MissingRequiredField {
                key: SettingKey::Endpoint
            }
        );
    }

    #[test]
    fn test_empty_connection_string_reports_missing_endpoint() {
        assert!(matches!(
            builder("").build(&DefaultTokenProviderFactory),
            Err(ConnectionStringError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_separator_only_endpoint_is_invalid() {
        assert!(matches!(
            builder("Endpoint=,,").management_endpoints(),
            Err(ConnectionStringError::InvalidConnectionString { .. })
        ));
    }

    #[test]
    fn test_runtime_build_uses_runtime_port() {
        let config = assert_ok!(
            builder("Endpoint=sb://ns.example.net/;ManagementPort=9999;RuntimePort=9354")
                .build_runtime(&DefaultTokenProviderFactory)
        );
        assert_eq!(config.role, EndpointRole::Runtime);
        assert_eq!(config.endpoints[0].port(), Some(9354));
    }

    #[test]
    fn test_factory_receives_every_present_tuple() {
        let config = assert_ok!(
            builder(
                "Endpoint=sb://a/;SharedAccessKey=k;SharedSecretIssuer=i;WindowsUsername=w;OAuthDomain=d"
            )
            .build(&RecordingFactory)
        );
        assert_eq!(config.token_provider, Some(CredentialMode::PRECEDENCE.to_vec()));
    }

    #[test]
    fn test_factory_error_is_wrapped() {
        let err = assert_err!(builder("Endpoint=sb://a/;SharedAccessKey=k").build(&RejectingFactory));
        match err {
            ConnectionStringError::InvalidConnectionString { key, message } => {
                assert_eq!(key, "SharedAccessKey");
                assert!(message.contains("not base64"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_operation_timeout_passes_through() {
        let config = assert_ok!(
            builder("Endpoint=sb://a/;OperationTimeout=00:00:30").build(&DefaultTokenProviderFactory)
        );
        assert_eq!(config.operation_timeout.as_deref(), Some("00:00:30"));
    }

    #[test]
    fn test_sas_provider_end_to_end() {
        let config = assert_ok!(
            builder("Endpoint=sb://ns.servicebus.windows.net/;SharedAccessKeyName=Root;SharedAccessKey=abc=")
                .build(&DefaultTokenProviderFactory)
        );
        assert!(matches!(
            config.token_provider,
            Some(TokenProvider::SharedAccessSignature { .. })
        ));
    }
}
