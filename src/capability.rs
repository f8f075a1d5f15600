// Seams between the pipeline and whatever actually drives the radio

use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;

use crate::network::{HardwareId, RawNetwork};

/// How the OS should secure and look for the network being joined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOptions {
    pub wep: bool,
    /// WPA3 personal without a WPA2 fallback
    pub sae: bool,
    pub hidden: bool,
}

#[async_trait]
pub trait ScanCapability: Send + Sync {
    async fn set_radio_enabled(&self, enabled: bool) -> Result<()>;

    async fn list_networks(&self) -> Result<Vec<RawNetwork>>;

    async fn connect_to_network(
        &self,
        ssid: &str,
        credential: Option<&SecretString>,
        options: JoinOptions,
    ) -> Result<()>;

    /// BSSID of the access point the radio is associated with, if any.
    async fn current_association_id(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait ConnectivityCapability: Send + Sync {
    /// Ask the OS to bring up a connection locked to `hardware_id`.
    ///
    /// Returning `Ok` only means the request was accepted; association is
    /// observed afterwards through [`ScanCapability::current_association_id`].
    async fn request_targeted_connection(
        &self,
        hardware_id: &HardwareId,
        ssid: &str,
        credential: Option<&SecretString>,
        options: JoinOptions,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait]
pub trait PermissionCapability: Send + Sync {
    async fn request_location_access(&self) -> Result<PermissionStatus>;
}

#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    /// `None` when the user cancelled.
    async fn ask(&self, ssid: &str) -> Option<SecretString>;
}
