// NetworkManager types and enums

use crate::network::RawNetwork;

// NM_802_11_AP_FLAGS_PRIVACY
const AP_FLAGS_PRIVACY: u32 = 0x1;
// NM_802_11_AP_SEC_KEY_MGMT_PSK
const AP_SEC_KEY_MGMT_PSK: u32 = 0x100;
// NM_802_11_AP_SEC_KEY_MGMT_802_1X
const AP_SEC_KEY_MGMT_802_1X: u32 = 0x200;
// NM_802_11_AP_SEC_KEY_MGMT_SAE
const AP_SEC_KEY_MGMT_SAE: u32 = 0x400;

/// WiFi access point mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    Unknown,
    Adhoc,
    Infrastructure,
    Ap,
    Mesh,
}

impl From<u32> for WifiMode {
    fn from(value: u32) -> Self {
        match value {
            0 => WifiMode::Unknown,
            1 => WifiMode::Adhoc,
            2 => WifiMode::Infrastructure,
            3 => WifiMode::Ap,
            4 => WifiMode::Mesh,
            _ => WifiMode::Unknown,
        }
    }
}

/// Answer to one entry of `GetPermissions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResult {
    Yes,
    Auth,
    No,
    Unknown,
}

impl From<&str> for PermissionResult {
    fn from(value: &str) -> Self {
        match value {
            "yes" => PermissionResult::Yes,
            "auth" => PermissionResult::Auth,
            "no" => PermissionResult::No,
            _ => PermissionResult::Unknown,
        }
    }
}

impl PermissionResult {
    /// `auth` means polkit will ask, which is as good as a grant here.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionResult::Yes | PermissionResult::Auth)
    }
}

/// Raw security flags of an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityFlags {
    pub flags: u32,
    pub wpa_flags: u32,
    pub rsn_flags: u32,
}

impl SecurityFlags {
    fn key_mgmt(sec_flags: u32) -> &'static str {
        if sec_flags & AP_SEC_KEY_MGMT_802_1X != 0 {
            "EAP"
        } else if sec_flags & AP_SEC_KEY_MGMT_SAE != 0 {
            "SAE"
        } else if sec_flags & AP_SEC_KEY_MGMT_PSK != 0 {
            "PSK"
        } else {
            "NONE"
        }
    }

    /// Render the flags as a bracketed descriptor, e.g. `[WPA2-PSK][ESS]`.
    pub fn descriptor(&self, mode: WifiMode) -> String {
        let mut descriptor = String::new();

        if self.wpa_flags != 0 {
            descriptor.push_str(&format!("[WPA-{}]", Self::key_mgmt(self.wpa_flags)));
        }

        if self.rsn_flags != 0 {
            let key_mgmt = Self::key_mgmt(self.rsn_flags);
            if key_mgmt == "SAE" {
                descriptor.push_str("[WPA3-SAE]");
            } else {
                descriptor.push_str(&format!("[WPA2-{key_mgmt}]"));
            }
        }

        if self.wpa_flags == 0 && self.rsn_flags == 0 && self.flags & AP_FLAGS_PRIVACY != 0 {
            descriptor.push_str("[WEP]");
        }

        match mode {
            WifiMode::Infrastructure => descriptor.push_str("[ESS]"),
            WifiMode::Adhoc => descriptor.push_str("[IBSS]"),
            WifiMode::Mesh => descriptor.push_str("[MESH]"),
            _ => {}
        }

        descriptor
    }
}

/// Map NetworkManager's 0-100 strength back to dBm.
///
/// NetworkManager clamps levels to -100..=-40 dBm and scales linearly, so
/// this is the inverse of that mapping.
pub fn level_from_strength(strength: u8) -> i32 {
    i32::from(strength.min(100)) * 60 / 100 - 100
}

/// Scanned access point information
#[derive(Debug, Clone)]
pub struct AccessPointInfo {
    pub ssid: String,
    pub strength: u8,
    pub frequency: u32,
    pub hw_address: String,
    pub security: SecurityFlags,
    pub mode: WifiMode,
}

impl From<AccessPointInfo> for RawNetwork {
    fn from(ap: AccessPointInfo) -> Self {
        RawNetwork {
            capabilities: ap.security.descriptor(ap.mode),
            signal_level: level_from_strength(ap.strength),
            ssid: ap.ssid,
            hardware_id: ap.hw_address,
            frequency_mhz: ap.frequency,
        }
    }
}
