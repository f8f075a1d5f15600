use anyhow::anyhow;
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};

use crate::capability::{ConnectivityCapability, CredentialPrompt, JoinOptions, ScanCapability};
use crate::error::{Error, Result};
use crate::network::{HardwareId, ScanSnapshot, WirelessNetwork};
use crate::reconcile::ConnectionReconciler;

/// How a selected network is handed to the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JoinMode {
    /// Connection request locked to the access point's BSSID
    #[default]
    Bssid,
    /// Connection by network name, the OS picks the access point
    Ssid,
}

#[derive(Debug, Clone, Copy)]
pub struct JoinSettings {
    pub mode: JoinMode,
    pub confirm_attempts: u32,
    pub confirm_interval: Duration,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            mode: JoinMode::default(),
            confirm_attempts: 10,
            confirm_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(HardwareId),
    Cancelled,
}

#[derive(Clone)]
pub struct JoinCoordinator {
    scanner: Arc<dyn ScanCapability>,
    connectivity: Arc<dyn ConnectivityCapability>,
    prompt: Arc<dyn CredentialPrompt>,
    reconciler: ConnectionReconciler,
    settings: JoinSettings,
}

impl JoinCoordinator {
    pub fn new(
        scanner: Arc<dyn ScanCapability>,
        connectivity: Arc<dyn ConnectivityCapability>,
        prompt: Arc<dyn CredentialPrompt>,
        reconciler: ConnectionReconciler,
        settings: JoinSettings,
    ) -> Self {
        Self {
            scanner,
            connectivity,
            prompt,
            reconciler,
            settings,
        }
    }

    pub fn settings(&self) -> JoinSettings {
        self.settings
    }

    pub async fn join(
        &self,
        snapshot: &ScanSnapshot,
        target: &HardwareId,
        credential: Option<SecretString>,
    ) -> Result<JoinOutcome> {
        let network = snapshot
            .find(target)
            .ok_or_else(|| Error::TargetNotFound(target.clone()))?;

        let credential = if network.is_secured() {
            match credential {
                Some(credential) => Some(credential),
                None => match self.prompt.ask(&network.ssid).await {
                    Some(credential) => Some(credential),
                    None => {
                        log::info!("credential prompt for {} cancelled", network.label());
                        self.reconciler.current_association().await;
                        return Ok(JoinOutcome::Cancelled);
                    }
                },
            }
        } else {
            None
        };

        log::info!(
            "joining {} ({}) by {}",
            network.label(),
            network.hardware_id,
            self.settings.mode
        );

        let options = JoinOptions {
            wep: network.is_wep(),
            sae: network.is_sae_only(),
            hidden: network.is_hidden(),
        };

        let request = match self.settings.mode {
            JoinMode::Bssid => {
                self.connectivity
                    .request_targeted_connection(
                        &network.hardware_id,
                        &network.ssid,
                        credential.as_ref(),
                        options,
                    )
                    .await
            }
            JoinMode::Ssid => {
                self.scanner
                    .connect_to_network(&network.ssid, credential.as_ref(), options)
                    .await
            }
        };

        if let Err(source) = request {
            self.reconciler.current_association().await;
            return Err(Error::JoinFailed {
                target: network.label(),
                source,
            });
        }

        self.confirm(snapshot, network).await
    }

    /// Wait for the association to show up, within the configured budget.
    async fn confirm(
        &self,
        snapshot: &ScanSnapshot,
        network: &WirelessNetwork,
    ) -> Result<JoinOutcome> {
        if self.settings.confirm_attempts == 0 {
            self.reconciler.current_association().await;
            return Ok(JoinOutcome::Joined(network.hardware_id.clone()));
        }

        for attempt in 1..=self.settings.confirm_attempts {
            if let Some(associated) = self.reconciler.current_association().await {
                if self.matches(snapshot, network, &associated) {
                    log::info!("associated with {associated} after {attempt} checks");
                    return Ok(JoinOutcome::Joined(associated));
                }
            }

            if attempt < self.settings.confirm_attempts {
                tokio::time::sleep(self.settings.confirm_interval).await;
            }
        }

        Err(Error::JoinFailed {
            target: network.label(),
            source: anyhow!(
                "association not observed after {} checks",
                self.settings.confirm_attempts
            ),
        })
    }

    fn matches(
        &self,
        snapshot: &ScanSnapshot,
        network: &WirelessNetwork,
        associated: &HardwareId,
    ) -> bool {
        match self.settings.mode {
            JoinMode::Bssid => *associated == network.hardware_id,
            JoinMode::Ssid => snapshot
                .networks()
                .iter()
                .any(|n| n.ssid == network.ssid && n.hardware_id == *associated),
        }
    }
}
