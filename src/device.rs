use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::capability::{
    ConnectivityCapability, JoinOptions, PermissionCapability, PermissionStatus, ScanCapability,
};
use crate::config::ScanConfig;
use crate::network::{HardwareId, RawNetwork};
use crate::nm::{NMClient, wifi::wireless_settings};

/// The wireless device every scan and join goes through
#[derive(Clone)]
pub struct Device {
    client: Arc<NMClient>,
    pub device_path: String,
    pub name: String,
    pub address: String,
    results_timeout: Duration,
    poll_interval: Duration,
}

impl Device {
    pub async fn new(client: Arc<NMClient>, scan: &ScanConfig) -> Result<Self> {
        let device_path = client
            .get_wifi_device()
            .await
            .context("No WiFi device found")?;
        let device_path = device_path.as_str().to_string();

        let name = client.get_device_interface(&device_path).await?;
        let address = client.get_device_hw_address(&device_path).await?;
        log::info!("using wireless device {name} ({address})");

        Ok(Self {
            client,
            device_path,
            name,
            address,
            results_timeout: Duration::from_millis(scan.results_timeout_ms),
            poll_interval: Duration::from_millis(scan.poll_interval_ms),
        })
    }
}

#[async_trait]
impl ScanCapability for Device {
    async fn set_radio_enabled(&self, enabled: bool) -> Result<()> {
        if self.client.is_wireless_enabled().await? == enabled {
            return Ok(());
        }

        log::info!("switching wireless {}", if enabled { "on" } else { "off" });
        self.client
            .set_wireless_enabled(enabled)
            .await
            .context("Failed to switch the wireless radio")
    }

    async fn list_networks(&self) -> Result<Vec<RawNetwork>> {
        self.client
            .scan_and_wait(&self.device_path, self.results_timeout, self.poll_interval)
            .await?;
        self.client.get_networks(&self.device_path).await
    }

    async fn connect_to_network(
        &self,
        ssid: &str,
        credential: Option<&SecretString>,
        options: JoinOptions,
    ) -> Result<()> {
        let settings = wireless_settings(ssid, None, credential, options)?;
        self.client
            .add_and_activate_connection(&self.device_path, settings)
            .await?;
        Ok(())
    }

    async fn current_association_id(&self) -> Result<Option<String>> {
        self.client.get_connected_bssid(&self.device_path).await
    }
}

#[async_trait]
impl ConnectivityCapability for Device {
    async fn request_targeted_connection(
        &self,
        hardware_id: &HardwareId,
        ssid: &str,
        credential: Option<&SecretString>,
        options: JoinOptions,
    ) -> Result<()> {
        let settings = wireless_settings(ssid, Some(hardware_id), credential, options)?;
        let active = self
            .client
            .add_and_activate_connection(&self.device_path, settings)
            .await?;
        log::debug!("activation requested: {}", active.as_str());
        Ok(())
    }
}

#[async_trait]
impl PermissionCapability for Device {
    async fn request_location_access(&self) -> Result<PermissionStatus> {
        if self.client.can_scan().await? {
            Ok(PermissionStatus::Granted)
        } else {
            Ok(PermissionStatus::Denied)
        }
    }
}
