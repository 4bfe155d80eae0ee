//! Error types for network inspection
//!
//! Two layers: [`SourceError`] is what a capability object reports, and
//! [`InspectError`] is the single failure kind a caller of
//! [`NetworkInspector::inspect`](crate::NetworkInspector::inspect) ever sees.

use thiserror::Error;

/// Failure of a whole inspection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// Unexpected fault while reading OS network state (permission denial,
    /// unreadable kernel table, anything unclassified)
    #[error("{0}")]
    QueryFailure(String),
}

impl InspectError {
    /// Human-readable cause
    pub fn message(&self) -> &str {
        match self {
            InspectError::QueryFailure(msg) => msg,
        }
    }
}

/// Error reported by a single OS subsystem query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The subsystem does not exist on this host. Absorbed into absent fields.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The subsystem exists but could not be read. Escalated to a query failure.
    #[error("{0}")]
    Fault(String),
}

impl SourceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::Unavailable(err.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                SourceError::Fault(format!("permission denied: {}", err))
            }
            _ => SourceError::Fault(format!("IO error: {}", err)),
        }
    }
}

impl From<SourceError> for InspectError {
    fn from(err: SourceError) -> Self {
        InspectError::QueryFailure(err.to_string())
    }
}

/// Result type for capability object queries
pub type SourceResult<T> = Result<T, SourceError>;
