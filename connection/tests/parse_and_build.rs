use claims::{assert_err, assert_ok, assert_some};
use connection::{
    ConnectionSettings, ConnectionStringConfig, ConnectionStringError, CredentialMode,
    DefaultTokenProviderFactory, EndpointRole, ManagerBuilder, SettingKey, TokenProvider,
};

// Helper module for building connection strings in tests
mod helpers {
    pub const NAMESPACE_ENDPOINT: &str = "sb://ns.example.net/";

    pub fn sas_connection_string() -> String {
        format!(
            "Endpoint={NAMESPACE_ENDPOINT};SharedAccessKeyName=RootManageSharedAccessKey;SharedAccessKey=c2VjcmV0a2V5PQ==;EntityPath=orders"
        )
    }
}

#[test]
fn test_portal_style_connection_string() {
    let settings = assert_ok!(ConnectionSettings::parse(&format!(
        "{};",
        helpers::sas_connection_string()
    )));

    assert_eq!(settings.len(), 4);
    assert_eq!(settings.entity_path(), Some("orders"));
    assert_eq!(
        settings.get(SettingKey::SharedAccessKey),
        Some("c2VjcmV0a2V5PQ==")
    );
}

#[test]
fn test_management_port_round_trip() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "Endpoint=sb://ns.example.net/;ManagementPort=9999"
    ));

    let config = assert_ok!(builder.build(&DefaultTokenProviderFactory));
    assert_eq!(config.endpoints.len(), 1);

    let endpoint = &config.endpoints[0];
    assert_eq!(endpoint.scheme(), "sb");
    assert_eq!(endpoint.host_str(), Some("ns.example.net"));
    assert_eq!(endpoint.port(), Some(9999));
    assert_eq!(endpoint.path(), "/");
    assert!(config.sts_endpoints.is_empty());
}

#[test]
fn test_two_endpoints_in_input_order() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "Endpoint=sb://a.example.net/,sb://b.example.net/"
    ));

    let endpoints = assert_ok!(builder.management_endpoints());
    assert_eq!(
        endpoints.iter().map(|u| u.as_str()).collect::<Vec<_>>(),
        vec!["sb://a.example.net/", "sb://b.example.net/"]
    );
}

#[test]
fn test_missing_endpoint_with_full_sas() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "SharedAccessKeyName=RootManageSharedAccessKey;SharedAccessKey=abc="
    ));

    let err = assert_err!(builder.build(&DefaultTokenProviderFactory));
    assert_eq!(
        err,
        ConnectionStringError::MissingRequiredField {
            key: SettingKey::Endpoint
        }
    );
    assert!(err.user_message().contains("Endpoint"));
}

#[test]
fn test_oauth_with_sts_endpoints() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "Endpoint=sb://ns.example.net/;StsEndpoint=https://sts1.example.net:9355/,https://sts2.example.net:9355/;\
         OAuthDomain=corp;OAuthUsername=svc;OAuthPassword=Pa55w0rd"
    ));

    let config = assert_ok!(builder.build(&DefaultTokenProviderFactory));
    assert_eq!(config.sts_endpoints.len(), 2);

    match assert_some!(config.token_provider) {
        TokenProvider::OAuth {
            sts_endpoints,
            credential,
        } => {
            assert_eq!(sts_endpoints.len(), 2);
            assert_eq!(sts_endpoints[0].port(), Some(9355));
            assert_eq!(credential.username, "svc");
            assert_eq!(credential.password.expose(), b"Pa55w0rd");
        }
        other => panic!("unexpected provider: {other:?}"),
    }
}

#[test]
fn test_login_without_sts_is_invalid_connection_string() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "Endpoint=sb://ns.example.net/;WindowsUsername=svc;WindowsPassword=pw"
    ));

    let err = assert_err!(builder.build(&DefaultTokenProviderFactory));
    assert_eq!(err.key(), Some("StsEndpoint"));
    assert!(!err.to_string().contains("pw"));
}

#[test]
fn test_error_messages_never_contain_secrets() {
    let secret = "SuperSecretKeyValue";
    let too_long_name = "n".repeat(300);
    let builder = assert_ok!(ManagerBuilder::from_connection_string(&format!(
        "Endpoint=sb://ns.example.net/;SharedAccessKeyName={too_long_name};SharedAccessKey={secret}"
    )));

    let err = assert_err!(builder.build(&DefaultTokenProviderFactory));
    assert!(matches!(
        err,
        ConnectionStringError::InvalidConnectionString { .. }
    ));
    assert!(!err.to_string().contains(secret));
    assert!(!err.user_message().contains(secret));
}

#[test]
fn test_config_round_trip_through_serde_fields() {
    let config = ConnectionStringConfig::new(helpers::sas_connection_string());
    let builder = assert_ok!(ManagerBuilder::from_config(&config));

    let request = assert_ok!(builder.credential_request());
    assert_eq!(
        request.configured_modes(),
        vec![CredentialMode::SharedAccessSignature]
    );
    assert!(!format!("{config:?}").contains("c2VjcmV0a2V5PQ=="));
}

#[test]
fn test_runtime_and_management_are_independent() {
    let builder = assert_ok!(ManagerBuilder::from_connection_string(
        "Endpoint=sb://ns.example.net/;RuntimePort=5671"
    ));

    let runtime = assert_ok!(builder.build_runtime(&DefaultTokenProviderFactory));
    let management = assert_ok!(builder.build(&DefaultTokenProviderFactory));

    assert_eq!(runtime.role, EndpointRole::Runtime);
    assert_eq!(runtime.endpoints[0].port(), Some(5671));
    assert_eq!(management.endpoints[0].port(), None);
}
