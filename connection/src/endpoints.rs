use crate::errors::{ConnectionResult, ConnectionStringError};
use crate::settings::{ConnectionSettings, SettingKey};
use serde::{Deserialize, Serialize};
use url::Url;

const VALUE_SEPARATOR: char = ',';

/// Which service surface an endpoint list is resolved for.
///
/// Each role reads its URIs from one key and may apply the port override
/// configured for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    /// Namespace management surface, `Endpoint` with `ManagementPort`
    Management,
    /// Messaging runtime surface, `Endpoint` with `RuntimePort`
    Runtime,
    /// Secure token service, `StsEndpoint` without any port override
    SecureTokenService,
}

impl EndpointRole {
    pub const fn source_key(self) -> SettingKey {
        match self {
            EndpointRole::Management | EndpointRole::Runtime => SettingKey::Endpoint,
            EndpointRole::SecureTokenService => SettingKey::StsEndpoint,
        }
    }

    pub const fn port_key(self) -> Option<SettingKey> {
        match self {
            EndpointRole::Management => Some(SettingKey::ManagementPort),
            EndpointRole::Runtime => Some(SettingKey::RuntimePort),
            EndpointRole::SecureTokenService => None,
        }
    }
}

/// Resolves the ordered URI list for `role`.
///
/// An absent source key yields an empty list; requiring `Endpoint` is the
/// manager builder's job.
///
/// # Errors
///
/// Returns [`ConnectionStringError::InvalidConnectionString`] when an entry is
/// not a URI, or the port override is out of range or cannot be applied.
pub fn resolve_endpoints(
    settings: &ConnectionSettings,
    role: EndpointRole,
) -> ConnectionResult<Vec<Url>> {
    let source_key = role.source_key();
    let Some(raw) = settings.get(source_key) else {
        return Ok(Vec::new());
    };

    let port = match role.port_key() {
        Some(port_key) => port_override(port_key, settings.get(port_key))?,
        None => None,
    };

    let endpoints = raw
        .split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| build_uri(source_key, entry, port))
        .collect::<ConnectionResult<Vec<_>>>()?;

    log::debug!(
        "Resolved {} {:?} endpoint(s){}",
        endpoints.len(),
        role,
        port.map(|p| format!(" with port {p}")).unwrap_or_default()
    );

    Ok(endpoints)
}

/// Interprets a port override. Non-numeric and non-positive values mean no
/// override; positive values past the port range are rejected.
fn port_override(key: SettingKey, value: Option<&str>) -> ConnectionResult<Option<u16>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().parse::<i64>() {
        Ok(port) if port > 0 => u16::try_from(port).map(Some).map_err(|_| {
            ConnectionStringError::invalid(
                key.as_str(),
                format!("port {port} is outside the range 1-{}", u16::MAX),
            )
        }),
        Ok(_) | Err(_) => {
            log::debug!("Ignoring {key} override that is not a positive number");
            Ok(None)
        }
    }
}

fn build_uri(key: SettingKey, entry: &str, port: Option<u16>) -> ConnectionResult<Url> {
    let mut uri = Url::parse(entry).map_err(|e| {
        ConnectionStringError::invalid(key.as_str(), format!("'{entry}' is not a valid URI: {e}"))
    })?;

    if let Some(port) = port {
        uri.set_port(Some(port)).map_err(|()| {
            ConnectionStringError::invalid(
                key.as_str(),
                format!("cannot set port {port} on '{entry}'"),
            )
        })?;
    }

    Ok(uri)
}
