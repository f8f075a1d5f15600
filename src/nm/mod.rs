// NetworkManager D-Bus abstraction layer

use anyhow::{Context, Result};
use std::collections::HashMap;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, Value};
use zbus::{Connection, Proxy};

pub mod types;
pub mod wifi;

pub use types::*;

const NM_BUS_NAME: &str = "org.freedesktop.NetworkManager";
const NM_PATH: &str = "/org/freedesktop/NetworkManager";

const PERMISSION_WIFI_SCAN: &str = "org.freedesktop.NetworkManager.wifi.scan";
const PERMISSION_NETWORK_CONTROL: &str = "org.freedesktop.NetworkManager.network-control";

/// Connection settings as `AddAndActivateConnection` takes them
pub type ConnectionSettings<'a> = HashMap<&'static str, HashMap<&'static str, Value<'a>>>;

/// Main NetworkManager client
#[derive(Clone, Debug)]
pub struct NMClient {
    connection: Connection,
}

impl NMClient {
    /// Create a new NetworkManager client
    pub async fn new() -> Result<Self> {
        let connection = Connection::system()
            .await
            .context("Failed to connect to system D-Bus")?;

        let proxy = Proxy::new(
            &connection,
            NM_BUS_NAME,
            NM_PATH,
            "org.freedesktop.NetworkManager",
        )
        .await?;

        // Try to get version to verify NM is accessible
        let version: String = proxy.get_property("Version").await.context(
            "NetworkManager is not running or not accessible. Please ensure NetworkManager service is active.",
        )?;
        log::info!("connected to NetworkManager {version}");

        Ok(Self { connection })
    }

    async fn manager_proxy(&self) -> Result<Proxy<'_>> {
        Ok(Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            NM_PATH,
            "org.freedesktop.NetworkManager",
        )
        .await?)
    }

    /// Get all WiFi devices
    pub async fn get_wifi_devices(&self) -> Result<Vec<OwnedObjectPath>> {
        let proxy = self.manager_proxy().await?;

        let devices: Vec<OwnedObjectPath> = proxy.call("GetDevices", &()).await?;

        let mut wifi_devices = Vec::new();
        for device_path in devices {
            let device_proxy = Proxy::new(
                &self.connection,
                NM_BUS_NAME,
                device_path.as_str(),
                "org.freedesktop.NetworkManager.Device",
            )
            .await?;

            // DeviceType 2 = WiFi
            let device_type: u32 = device_proxy.get_property("DeviceType").await?;
            if device_type == 2 {
                wifi_devices.push(device_path);
            }
        }

        Ok(wifi_devices)
    }

    /// Get the first WiFi device
    pub async fn get_wifi_device(&self) -> Result<OwnedObjectPath> {
        let devices = self.get_wifi_devices().await?;
        devices.into_iter().next().context("No WiFi device found")
    }

    /// Get device interface name
    pub async fn get_device_interface(&self, device_path: &str) -> Result<String> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device",
        )
        .await?;

        Ok(proxy.get_property("Interface").await?)
    }

    /// Get device hardware address
    pub async fn get_device_hw_address(&self, device_path: &str) -> Result<String> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device",
        )
        .await?;

        Ok(proxy.get_property("HwAddress").await?)
    }

    pub async fn is_wireless_enabled(&self) -> Result<bool> {
        let proxy = self.manager_proxy().await?;
        Ok(proxy.get_property("WirelessEnabled").await?)
    }

    pub async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        let proxy = self.manager_proxy().await?;
        proxy.set_property("WirelessEnabled", enabled).await?;
        Ok(())
    }

    /// Whether the caller may scan, as reported by `GetPermissions`
    pub async fn can_scan(&self) -> Result<bool> {
        let proxy = self.manager_proxy().await?;
        let permissions: HashMap<String, String> = proxy.call("GetPermissions", &()).await?;

        let result = permissions
            .get(PERMISSION_WIFI_SCAN)
            .or_else(|| permissions.get(PERMISSION_NETWORK_CONTROL))
            .map(|v| PermissionResult::from(v.as_str()))
            .unwrap_or(PermissionResult::Unknown);

        log::debug!("scan permission: {result:?}");
        Ok(result.is_granted())
    }

    /// Request a WiFi scan on a device
    pub async fn request_scan(&self, device_path: &str) -> Result<()> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device.Wireless",
        )
        .await?;

        // Empty options map for scan
        let options: HashMap<&str, Value> = HashMap::new();
        let _: () = proxy.call("RequestScan", &(options,)).await?;
        Ok(())
    }

    /// Time of the last completed scan, in CLOCK_BOOTTIME milliseconds
    pub async fn get_last_scan(&self, device_path: &str) -> Result<i64> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device.Wireless",
        )
        .await?;

        Ok(proxy.get_property("LastScan").await?)
    }

    /// Get all access points (scanned networks)
    pub async fn get_access_points(&self, device_path: &str) -> Result<Vec<OwnedObjectPath>> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device.Wireless",
        )
        .await?;

        Ok(proxy.call("GetAllAccessPoints", &()).await?)
    }

    /// Get current active access point
    pub async fn get_active_access_point(
        &self,
        device_path: &str,
    ) -> Result<Option<OwnedObjectPath>> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            device_path,
            "org.freedesktop.NetworkManager.Device.Wireless",
        )
        .await?;

        let ap_path: OwnedObjectPath = proxy.get_property("ActiveAccessPoint").await?;
        if ap_path.as_str() == "/" {
            Ok(None)
        } else {
            Ok(Some(ap_path))
        }
    }

    /// Get access point details
    pub async fn get_access_point_info(&self, ap_path: &str) -> Result<AccessPointInfo> {
        let proxy = Proxy::new(
            &self.connection,
            NM_BUS_NAME,
            ap_path,
            "org.freedesktop.NetworkManager.AccessPoint",
        )
        .await?;

        let ssid_bytes: Vec<u8> = proxy.get_property("Ssid").await?;
        let ssid = String::from_utf8_lossy(&ssid_bytes).to_string();
        let strength: u8 = proxy.get_property("Strength").await?;
        let frequency: u32 = proxy.get_property("Frequency").await?;
        let hw_address: String = proxy.get_property("HwAddress").await?;
        let flags: u32 = proxy.get_property("Flags").await?;
        let wpa_flags: u32 = proxy.get_property("WpaFlags").await?;
        let rsn_flags: u32 = proxy.get_property("RsnFlags").await?;
        let mode: u32 = proxy.get_property("Mode").await?;

        Ok(AccessPointInfo {
            ssid,
            strength,
            frequency,
            hw_address,
            security: SecurityFlags {
                flags,
                wpa_flags,
                rsn_flags,
            },
            mode: WifiMode::from(mode),
        })
    }

    /// Create a connection profile and activate it on the device
    pub async fn add_and_activate_connection(
        &self,
        device_path: &str,
        settings: ConnectionSettings<'_>,
    ) -> Result<OwnedObjectPath> {
        let proxy = self.manager_proxy().await?;

        let result: (OwnedObjectPath, OwnedObjectPath) = proxy
            .call(
                "AddAndActivateConnection",
                &(
                    settings,
                    ObjectPath::try_from(device_path)?,
                    ObjectPath::try_from("/")?,
                ),
            )
            .await?;

        Ok(result.1) // Return active connection path
    }
}
