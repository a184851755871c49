//! Error types for the capability registry.
//!
//! Two categories exist. [`ConfigError`] is raised while the registry is being
//! built and is fatal to startup. [`RequestError`] is raised while validating
//! an inbound request and is surfaced to the remote caller as a rejection.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Identity field of a driver registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Name,
    NodeId,
    Version,
    InstanceId,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "driver name"),
            Self::NodeId => write!(f, "node id"),
            Self::Version => write!(f, "version"),
            Self::InstanceId => write!(f, "instance id"),
        }
    }
}

/// Errors raised while building a registry or loading its declaration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required identity field was empty.
    #[error("{0} missing")]
    MissingIdentity(IdentityField),

    /// A capability kind name or wire value is not part of its domain.
    #[error("unknown {domain} kind: {value}")]
    UnknownKind { domain: &'static str, value: String },

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The declaration file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while validating an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The requested capability is not registered. Carries the protocol name
    /// of the requested kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RequestError {
    /// Diagnostic text for the rejection response.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidArgument(detail) => detail,
        }
    }
}

#[cfg(feature = "grpc")]
impl From<RequestError> for tonic::Status {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidArgument(detail) => tonic::Status::invalid_argument(detail),
        }
    }
}
