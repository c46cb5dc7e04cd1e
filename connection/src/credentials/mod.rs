//! Credential tuples and the credential-provider seam.
//!
//! The manager builder extracts every configured tuple into a
//! [`CredentialRequest`] and hands it to a [`TokenProviderFactory`]. The
//! factory owns the precedence decision.

pub mod errors;
pub mod provider;
pub mod types;

pub use errors::TokenProviderError;
pub use provider::{
    DefaultTokenProviderFactory, LoginCredential, MAX_SHARED_ACCESS_KEY_LENGTH, TokenProvider,
    TokenProviderFactory,
};
pub use types::{
    CredentialMode, CredentialRequest, LoginArguments, SharedAccessSignatureArguments,
    SharedSecretArguments,
};
