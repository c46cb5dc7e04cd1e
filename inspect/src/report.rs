use connection::{ConnectionResult, CredentialMode, DefaultTokenProviderFactory, ManagerBuilder, Url};
use serde::Serialize;
use std::fmt;

/// What a connection string resolves to, safe to print.
#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub settings: String,
    pub entity_path: Option<String>,
    pub management_endpoints: Vec<String>,
    pub runtime_endpoints: Vec<String>,
    pub sts_endpoints: Vec<String>,
    pub configured_modes: Vec<CredentialMode>,
    pub credential_mode: Option<CredentialMode>,
    pub operation_timeout: Option<String>,
}

/// Runs the full parse and build for both surfaces.
pub fn inspect(connection_string: &str) -> ConnectionResult<InspectionReport> {
    let builder = ManagerBuilder::from_connection_string(connection_string)?;

    let management = builder.build(&DefaultTokenProviderFactory)?;
    let runtime_endpoints = builder.runtime_endpoints()?;
    let configured_modes = builder.credential_request()?.configured_modes();

    let settings = builder.settings();
    Ok(InspectionReport {
        settings: settings.redacted(),
        entity_path: settings.entity_path().map(str::to_string),
        management_endpoints: to_strings(&management.endpoints),
        runtime_endpoints: to_strings(&runtime_endpoints),
        sts_endpoints: to_strings(&management.sts_endpoints),
        configured_modes,
        credential_mode: management.token_provider.as_ref().map(|p| p.mode()),
        operation_timeout: management.operation_timeout.clone(),
    })
}

fn to_strings(urls: &[Url]) -> Vec<String> {
    urls.iter().map(Url::to_string).collect()
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings:             {}", self.settings)?;
        if let Some(entity_path) = &self.entity_path {
            writeln!(f, "Entity path:          {entity_path}")?;
        }
        write_list(f, "Management endpoints", &self.management_endpoints)?;
        write_list(f, "Runtime endpoints", &self.runtime_endpoints)?;
        write_list(f, "STS endpoints", &self.sts_endpoints)?;
        match self.credential_mode {
            Some(mode) => writeln!(f, "Credentials:          {mode}")?,
            None => writeln!(f, "Credentials:          none")?,
        }
        if self.configured_modes.len() > 1 {
            let ignored: Vec<_> = self
                .configured_modes
                .iter()
                .skip(1)
                .map(ToString::to_string)
                .collect();
            writeln!(f, "Ignored credentials:  {}", ignored.join(", "))?;
        }
        write!(
            f,
            "Operation timeout:    {}",
            self.operation_timeout.as_deref().unwrap_or("default")
        )
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "{label:<21} none");
    }
    writeln!(f, "{label:<21} {}", items.join(", "))
}
