//! # Service Bus Connection Core
//!
//! Parses Service Bus connection strings into validated settings and turns
//! them into endpoint lists and a credential provider for a network client.
//!
//! ## Modules
//!
//! - [`settings`] - Connection string tokenizer and the key whitelist
//! - [`manager`] - Validation and assembly of client configurations
//! - [`endpoints`] - Endpoint list resolution with port overrides
//! - [`credentials`] - Credential tuples and the provider factory seam
//! - [`secure`] - Erasable password buffer
//! - [`config`] - Serializable connection string configuration
//! - [`errors`] - Error types

pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod errors;
pub mod manager;
pub mod secure;
pub mod settings;

pub use config::ConnectionStringConfig;
pub use credentials::{
    CredentialMode, CredentialRequest, DefaultTokenProviderFactory, TokenProvider,
    TokenProviderError, TokenProviderFactory,
};
pub use endpoints::EndpointRole;
pub use errors::{ConnectionResult, ConnectionStringError};
pub use manager::{ManagerBuilder, ManagerConfiguration};
pub use secure::SecurePassword;
pub use settings::{ConnectionSettings, SettingKey};
pub use url::Url;
