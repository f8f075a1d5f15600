use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::classify::{self, SignalQuality};

/// Access point hardware address (BSSID).
///
/// Normalized to upper case when it enters the crate so comparisons
/// never need to care about the case the OS reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HardwareId(String);

impl HardwareId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw address bytes, as NetworkManager expects them in settings.
    pub fn to_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(self.0.replace(':', ""))
    }
}

impl From<&str> for HardwareId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scan result as the scan capability reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNetwork {
    pub ssid: String,
    pub hardware_id: String,
    pub signal_level: i32,
    pub frequency_mhz: u32,
    pub capabilities: String,
}

/// A scan result enriched with its channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirelessNetwork {
    pub ssid: String,
    pub hardware_id: HardwareId,
    pub signal_level: i32,
    pub frequency_mhz: u32,
    pub capabilities: String,
    pub channel: u32,
}

impl WirelessNetwork {
    pub fn from_raw(raw: RawNetwork) -> Self {
        Self {
            channel: classify::channel_of(raw.frequency_mhz),
            hardware_id: HardwareId::new(&raw.hardware_id),
            ssid: raw.ssid,
            signal_level: raw.signal_level,
            frequency_mhz: raw.frequency_mhz,
            capabilities: raw.capabilities,
        }
    }

    pub fn signal(&self) -> SignalQuality {
        classify::classify(self.signal_level)
    }

    pub fn is_secured(&self) -> bool {
        classify::is_secured(&self.capabilities)
    }

    pub fn is_wep(&self) -> bool {
        self.capabilities.contains("WEP")
    }

    pub fn is_sae_only(&self) -> bool {
        self.capabilities.contains("SAE") && !self.capabilities.contains("PSK")
    }

    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }

    /// Name used in notifications: the SSID, or the BSSID for hidden networks.
    pub fn label(&self) -> String {
        if self.is_hidden() {
            self.hardware_id.to_string()
        } else {
            self.ssid.clone()
        }
    }
}

/// One scan's worth of networks, strongest first.
#[derive(Debug, Clone, Default)]
pub struct ScanSnapshot {
    networks: Arc<Vec<WirelessNetwork>>,
    taken_at: Option<DateTime<Local>>,
}

impl ScanSnapshot {
    pub fn from_raw(raw: Vec<RawNetwork>, taken_at: DateTime<Local>) -> Self {
        let mut networks: Vec<WirelessNetwork> =
            raw.into_iter().map(WirelessNetwork::from_raw).collect();

        networks.sort_by(|a, b| b.signal_level.cmp(&a.signal_level));

        // BSSIDs key the list, keep the strongest report of each
        let mut seen = HashSet::new();
        networks.retain(|net| seen.insert(net.hardware_id.clone()));

        Self {
            networks: Arc::new(networks),
            taken_at: Some(taken_at),
        }
    }

    pub fn networks(&self) -> &[WirelessNetwork] {
        &self.networks
    }

    pub fn taken_at(&self) -> Option<DateTime<Local>> {
        self.taken_at
    }

    pub fn find(&self, hardware_id: &HardwareId) -> Option<&WirelessNetwork> {
        self.networks.iter().find(|n| &n.hardware_id == hardware_id)
    }

    pub fn position(&self, hardware_id: &HardwareId) -> Option<usize> {
        self.networks.iter().position(|n| &n.hardware_id == hardware_id)
    }

    pub fn get(&self, index: usize) -> Option<&WirelessNetwork> {
        self.networks.get(index)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bssid: &str, level: i32, frequency: u32) -> RawNetwork {
        RawNetwork {
            ssid: format!("net-{bssid}"),
            hardware_id: bssid.to_string(),
            signal_level: level,
            frequency_mhz: frequency,
            capabilities: "[ESS]".to_string(),
        }
    }

    #[test]
    fn test_hardware_id_normalized() {
        let id = HardwareId::new(" aa:bb:cc:dd:ee:0f ");
        assert_eq!(id.as_str(), "AA:BB:CC:DD:EE:0F");
        assert_eq!(id, HardwareId::from("AA:BB:CC:DD:EE:0F"));
        assert_eq!(id.to_bytes().unwrap(), vec![0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0x0f]);
    }

    #[test]
    fn test_hardware_id_bad_bytes() {
        assert!(HardwareId::new("not-a-mac").to_bytes().is_err());
    }

    #[test]
    fn test_security_kinds() {
        let mut net = WirelessNetwork::from_raw(raw("00:11:22:33:44:55", -48, 2437));

        net.capabilities = "[WEP][ESS]".to_string();
        assert!(net.is_wep() && !net.is_sae_only());

        net.capabilities = "[WPA3-SAE][ESS]".to_string();
        assert!(net.is_sae_only());

        net.capabilities = "[WPA2-PSK][WPA3-SAE][ESS]".to_string();
        assert!(!net.is_sae_only());
    }

    #[test]
    fn test_enrichment() {
        let net = WirelessNetwork::from_raw(raw("00:11:22:33:44:55", -48, 2437));
        assert_eq!(net.channel, 6);

        let net = WirelessNetwork::from_raw(raw("00:11:22:33:44:56", -48, 3000));
        assert_eq!(net.channel, 0);
    }

    #[test]
    fn test_snapshot_sorted_by_level() {
        let snapshot = ScanSnapshot::from_raw(
            vec![
                raw("00:00:00:00:00:01", -70, 2412),
                raw("00:00:00:00:00:02", -40, 2412),
                raw("00:00:00:00:00:03", -55, 5180),
            ],
            Local::now(),
        );

        let levels: Vec<i32> = snapshot.networks().iter().map(|n| n.signal_level).collect();
        assert_eq!(levels, vec![-40, -55, -70]);
        assert_eq!(snapshot.get(2).map(|n| n.channel), Some(1));
    }

    #[test]
    fn test_snapshot_collapses_duplicate_bssids() {
        let snapshot = ScanSnapshot::from_raw(
            vec![
                raw("aa:aa:aa:aa:aa:aa", -80, 2412),
                raw("AA:AA:AA:AA:AA:AA", -45, 2412),
                raw("bb:bb:bb:bb:bb:bb", -60, 2412),
            ],
            Local::now(),
        );

        assert_eq!(snapshot.len(), 2);
        let id = HardwareId::new("aa:aa:aa:aa:aa:aa");
        assert_eq!(snapshot.find(&id).map(|n| n.signal_level), Some(-45));
        assert_eq!(snapshot.position(&id), Some(0));
    }

    #[test]
    fn test_hidden_label() {
        let mut r = raw("de:ad:be:ef:00:01", -50, 2412);
        r.ssid = String::new();
        let net = WirelessNetwork::from_raw(r);
        assert!(net.is_hidden());
        assert_eq!(net.label(), "DE:AD:BE:EF:00:01");
        assert_eq!(net.ssid, "");
    }
}
