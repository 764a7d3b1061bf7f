//! Error types for network synthesis.

use thiserror::Error;

/// Every failure aborts the whole synthesis; there is no partial document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed, with the failing key path
    #[error("cannot parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Semantic config problems, all of them at once
    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Malformed or out-of-range CIDR arithmetic
    #[error("cidr error: {0}")]
    Cidr(String),

    /// Subnet slot planning failed
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Two resources declared with the same logical name
    #[error("resource '{0}' declared twice")]
    DuplicateResource(String),

    /// A declaration references a resource that was never declared
    #[error("resource '{resource}' references undeclared '{reference}'")]
    UnresolvedReference { resource: String, reference: String },

    /// Builder misuse such as a second association for one subnet
    #[error("invalid declaration: {0}")]
    Declaration(String),

    /// Document rendering failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a report failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a cidr error with the given message
    pub fn cidr(msg: impl Into<String>) -> Self {
        Self::Cidr(msg.into())
    }

    /// Create an allocation error with the given message
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Create a declaration error with the given message
    pub fn declaration(msg: impl Into<String>) -> Self {
        Self::Declaration(msg.into())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_problem() {
        let err = Error::Validation(vec![
            "availability_zones is empty".to_string(),
            "fedramp_boundary is empty".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid config: availability_zones is empty; fedramp_boundary is empty"
        );
    }

    #[test]
    fn unresolved_reference_names_both_sides() {
        let err = Error::UnresolvedReference {
            resource: "platform-k8s-vpc-ig-dev".to_string(),
            reference: "platform-k8s-vpc-dev".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("platform-k8s-vpc-ig-dev"));
        assert!(msg.contains("undeclared 'platform-k8s-vpc-dev'"));
    }

    #[test]
    fn helpers_pick_variant() {
        assert!(matches!(Error::cidr("x"), Error::Cidr(_)));
        assert!(matches!(Error::allocation("x"), Error::Allocation(_)));
        assert!(matches!(Error::declaration("x"), Error::Declaration(_)));
    }
}
