// WiFi-specific helpers for NetworkManager

use super::{ConnectionSettings, NMClient};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use zbus::zvariant::Value;

use crate::capability::JoinOptions;
use crate::network::{HardwareId, RawNetwork};

impl NMClient {
    /// Get every access point the device currently sees
    pub async fn get_networks(&self, device_path: &str) -> Result<Vec<RawNetwork>> {
        let aps = self.get_access_points(device_path).await?;
        let mut networks = Vec::with_capacity(aps.len());

        for ap_path in aps {
            // APs can vanish between listing and reading them
            match self.get_access_point_info(ap_path.as_str()).await {
                Ok(ap_info) => networks.push(RawNetwork::from(ap_info)),
                Err(e) => log::debug!("skipping {}: {e}", ap_path.as_str()),
            }
        }

        Ok(networks)
    }

    /// Request a scan and wait until NetworkManager reports a newer one.
    ///
    /// Gives up quietly after `timeout`, the cached results are used then.
    pub async fn scan_and_wait(
        &self,
        device_path: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<()> {
        let before = self.get_last_scan(device_path).await.unwrap_or(-1);

        if let Err(e) = self.request_scan(device_path).await {
            let msg = e.to_string();
            if msg.contains("Scanning not allowed") {
                log::debug!("scan already running, waiting for it");
            } else {
                return Err(e).context("Failed to request a scan");
            }
        }

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            tokio::time::sleep(poll_interval).await;
            if self.get_last_scan(device_path).await.unwrap_or(-1) > before {
                return Ok(());
            }
        }

        log::warn!(
            "no scan results after {}ms, using cached access points",
            timeout.as_millis()
        );
        Ok(())
    }

    /// Get the BSSID of the access point the device is associated with
    pub async fn get_connected_bssid(&self, device_path: &str) -> Result<Option<String>> {
        if let Some(ap_path) = self.get_active_access_point(device_path).await? {
            let ap_info = self.get_access_point_info(ap_path.as_str()).await?;
            Ok(Some(ap_info.hw_address))
        } else {
            Ok(None)
        }
    }
}

/// Build the settings for a new wireless connection profile.
///
/// `bssid` locks the profile to one access point.
pub fn wireless_settings<'a>(
    ssid: &str,
    bssid: Option<&HardwareId>,
    credential: Option<&'a SecretString>,
    options: JoinOptions,
) -> Result<ConnectionSettings<'a>> {
    let mut settings: ConnectionSettings = HashMap::new();

    // Connection section
    let mut conn: HashMap<&str, Value> = HashMap::new();
    conn.insert("type", Value::from("802-11-wireless"));
    conn.insert("id", Value::from(ssid.to_string()));
    settings.insert("connection", conn);

    // Wireless section
    let mut wireless: HashMap<&str, Value> = HashMap::new();
    wireless.insert("ssid", Value::from(ssid.as_bytes().to_vec()));
    if let Some(bssid) = bssid {
        let bytes = bssid
            .to_bytes()
            .with_context(|| format!("Invalid BSSID {bssid}"))?;
        wireless.insert("bssid", Value::from(bytes));
    }
    if options.hidden {
        wireless.insert("hidden", Value::from(true));
    }
    settings.insert("802-11-wireless", wireless);

    // Security section (if needed)
    if let Some(credential) = credential {
        let mut security: HashMap<&str, Value> = HashMap::new();
        if options.wep {
            security.insert("key-mgmt", Value::from("none"));
            security.insert("wep-key0", Value::from(credential.expose_secret()));
        } else if options.sae {
            security.insert("key-mgmt", Value::from("sae"));
            security.insert("psk", Value::from(credential.expose_secret()));
        } else {
            security.insert("key-mgmt", Value::from("wpa-psk"));
            security.insert("psk", Value::from(credential.expose_secret()));
        }
        settings.insert("802-11-wireless-security", security);
    }

    // IPv4 section (auto)
    let mut ipv4: HashMap<&str, Value> = HashMap::new();
    ipv4.insert("method", Value::from("auto"));
    settings.insert("ipv4", ipv4);

    // IPv6 section (auto)
    let mut ipv6: HashMap<&str, Value> = HashMap::new();
    ipv6.insert("method", Value::from("auto"));
    settings.insert("ipv6", ipv6);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_settings() {
        let settings =
            wireless_settings("cafe", None, None, JoinOptions::default()).unwrap();

        assert!(!settings.contains_key("802-11-wireless-security"));
        let wireless = &settings["802-11-wireless"];
        assert!(!wireless.contains_key("bssid"));
        assert!(!wireless.contains_key("hidden"));
    }

    #[test]
    fn test_targeted_psk_settings() {
        let bssid = HardwareId::new("00:11:22:33:44:55");
        let credential = SecretString::from("hunter22".to_string());
        let settings = wireless_settings(
            "home",
            Some(&bssid),
            Some(&credential),
            JoinOptions::default(),
        )
        .unwrap();

        let wireless = &settings["802-11-wireless"];
        assert_eq!(
            wireless["bssid"],
            Value::from(vec![0x00u8, 0x11, 0x22, 0x33, 0x44, 0x55])
        );

        let security = &settings["802-11-wireless-security"];
        assert_eq!(security["key-mgmt"], Value::from("wpa-psk"));
        assert_eq!(security["psk"], Value::from("hunter22"));
    }

    #[test]
    fn test_hidden_wep_settings() {
        let credential = SecretString::from("abcde".to_string());
        let options = JoinOptions {
            wep: true,
            sae: false,
            hidden: true,
        };
        let settings = wireless_settings("", None, Some(&credential), options).unwrap();

        assert_eq!(settings["802-11-wireless"]["hidden"], Value::from(true));
        assert_eq!(settings["802-11-wireless"]["ssid"], Value::from(Vec::<u8>::new()));
        let security = &settings["802-11-wireless-security"];
        assert_eq!(security["key-mgmt"], Value::from("none"));
        assert_eq!(security["wep-key0"], Value::from("abcde"));
    }

    #[test]
    fn test_targeted_sae_settings() {
        let bssid = HardwareId::new("00:11:22:33:44:55");
        let credential = SecretString::from("wpa3-only".to_string());
        let options = JoinOptions {
            sae: true,
            ..Default::default()
        };
        let settings = wireless_settings("lab", Some(&bssid), Some(&credential), options).unwrap();

        let security = &settings["802-11-wireless-security"];
        assert_eq!(security["key-mgmt"], Value::from("sae"));
        assert_eq!(security["psk"], Value::from("wpa3-only"));
    }

    #[test]
    fn test_invalid_bssid() {
        let bssid = HardwareId::new("zz:zz");
        assert!(wireless_settings("x", Some(&bssid), None, JoinOptions::default()).is_err());
    }
}
