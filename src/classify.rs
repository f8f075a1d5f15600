// Pure helpers turning raw scan values into something a user can read

use std::fmt;
use strum::Display;

/// Channel value for frequencies outside the 2.4 and 5 GHz ranges.
pub const UNKNOWN_CHANNEL: u32 = 0;

const SECURITY_MARKERS: [&str; 3] = ["WPA", "WEP", "PSK"];

/// Map a frequency in MHz to its channel number.
pub fn channel_of(frequency_mhz: u32) -> u32 {
    match frequency_mhz {
        2412..=2484 => (frequency_mhz - 2412) / 5 + 1,
        5170..=5825 => (frequency_mhz - 5170) / 5 + 34,
        _ => UNKNOWN_CHANNEL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    TwoPointFour,
    Five,
    Unknown,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::TwoPointFour => write!(f, "2.4 GHz"),
            Band::Five => write!(f, "5 GHz"),
            Band::Unknown => write!(f, "-"),
        }
    }
}

pub fn band_of(frequency_mhz: u32) -> Band {
    match frequency_mhz {
        2412..=2484 => Band::TwoPointFour,
        5170..=5825 => Band::Five,
        _ => Band::Unknown,
    }
}

/// Qualitative signal bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SignalBucket {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// How the UI should colour a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Positive,
    Warning,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalQuality {
    pub bucket: SignalBucket,
    pub severity: Severity,
}

/// Classify a signal level in dBm. Thresholds are inclusive lower bounds.
pub fn classify(level_dbm: i32) -> SignalQuality {
    let (bucket, severity) = if level_dbm >= -50 {
        (SignalBucket::Excellent, Severity::Positive)
    } else if level_dbm >= -60 {
        (SignalBucket::Good, Severity::Positive)
    } else if level_dbm >= -70 {
        (SignalBucket::Fair, Severity::Warning)
    } else {
        (SignalBucket::Poor, Severity::Negative)
    };

    SignalQuality { bucket, severity }
}

/// True if the capability descriptor carries any known security marker.
pub fn is_secured(capabilities: &str) -> bool {
    SECURITY_MARKERS
        .iter()
        .any(|marker| capabilities.contains(marker))
}
