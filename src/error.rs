use thiserror::Error;

use crate::network::HardwareId;

/// Errors surfaced by the scan and join pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("WiFi scanning requires permission to access nearby networks")]
    PermissionDenied,

    #[error("Failed to scan WiFi networks")]
    ScanFailed(#[source] anyhow::Error),

    #[error("Scanning in progress")]
    ScanInProgress,

    #[error("Failed to connect to {0}, network not found")]
    TargetNotFound(HardwareId),

    #[error("Failed to connect to {target}")]
    JoinFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to get the connected network")]
    AssociationQueryFailed(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
