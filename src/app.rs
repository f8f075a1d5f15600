use anyhow::{Result, anyhow};
use ratatui::widgets::TableState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    agent::AuthAgent,
    auth::Psk,
    config::Config,
    device::Device,
    error::Error,
    event::Event,
    join::{JoinCoordinator, JoinMode, JoinOutcome},
    network::{HardwareId, ScanSnapshot, WirelessNetwork},
    nm::NMClient,
    notification::{Notification, NotificationLevel},
    reconcile::ConnectionReconciler,
    scan::ScanOrchestrator,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusedBlock {
    Networks,
    PskAuthKey,
}

pub struct App {
    pub running: bool,
    pub focused_block: FocusedBlock,
    pub notifications: Vec<Notification>,
    pub config: Arc<Config>,
    pub device: Arc<Device>,
    pub agent: AuthAgent,
    pub psk: Psk,
    pub network_name_requiring_auth: Option<String>,
    pub orchestrator: ScanOrchestrator,
    pub reconciler: ConnectionReconciler,
    pub coordinator: JoinCoordinator,
    pub snapshot: ScanSnapshot,
    pub networks_state: TableState,
    pub joining: Option<HardwareId>,
}

impl App {
    pub async fn new(
        sender: UnboundedSender<Event>,
        config: Arc<Config>,
        join_mode: Option<JoinMode>,
    ) -> Result<Self> {
        let client = {
            match NMClient::new().await {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    return Err(anyhow!(
                        "Can not access the NetworkManager service.
Error: {}",
                        e
                    ));
                }
            }
        };

        let device = Arc::new(Device::new(client, &config.scan).await?);
        let agent = AuthAgent::new(sender);

        let orchestrator = ScanOrchestrator::new(device.clone(), device.clone());
        let reconciler = ConnectionReconciler::new(device.clone());

        let mut settings = config.join.settings();
        if let Some(mode) = join_mode {
            settings.mode = mode;
        }
        log::info!("joining networks by {}", settings.mode);

        let coordinator = JoinCoordinator::new(
            device.clone(),
            device.clone(),
            Arc::new(agent.clone()),
            reconciler.clone(),
            settings,
        );

        Ok(Self {
            running: true,
            focused_block: FocusedBlock::Networks,
            notifications: Vec::new(),
            config,
            device,
            agent,
            psk: Psk::default(),
            network_name_requiring_auth: None,
            orchestrator,
            reconciler,
            coordinator,
            snapshot: ScanSnapshot::default(),
            networks_state: TableState::default(),
            joining: None,
        })
    }

    /// Ask for permission, scan, and look up the current association.
    pub fn start(&self, sender: UnboundedSender<Event>) {
        self.refresh_association();
        self.scan(sender);
    }

    pub fn scan(&self, sender: UnboundedSender<Event>) {
        if self.orchestrator.is_scanning() {
            let _ = Notification::send(
                Error::ScanInProgress.to_string(),
                NotificationLevel::Info,
                &sender,
            );
            return;
        }

        let orchestrator = self.orchestrator.clone();
        let reconciler = self.reconciler.clone();
        tokio::spawn(async move {
            match orchestrator.scan().await {
                Ok(snapshot) => {
                    log::debug!("scan returned {} networks", snapshot.len());
                }
                Err(Error::ScanInProgress) => {
                    let _ = Notification::send(
                        Error::ScanInProgress.to_string(),
                        NotificationLevel::Info,
                        &sender,
                    );
                }
                Err(Error::PermissionDenied) => {
                    let _ = Notification::send(
                        "Scanning for nearby WiFi networks requires location access.\nAllow wifi.scan in NetworkManager's policy and try again.".to_string(),
                        NotificationLevel::Error,
                        &sender,
                    );
                }
                Err(e) => {
                    let message = e.to_string();
                    log::debug!("{:#}", anyhow::Error::from(e));
                    let _ = Notification::send(message, NotificationLevel::Error, &sender);
                }
            }

            reconciler.current_association().await;
            let _ = sender.send(Event::ScanFinished);
        });
    }

    pub fn refresh_association(&self) {
        let reconciler = self.reconciler.clone();
        tokio::spawn(async move {
            reconciler.current_association().await;
        });
    }

    /// Pull the latest snapshot, keeping the selection on the same access point.
    pub fn sync_snapshot(&mut self) {
        let selected = self
            .networks_state
            .selected()
            .and_then(|i| self.snapshot.get(i))
            .map(|net| net.hardware_id.clone());

        self.snapshot = self.orchestrator.snapshot();

        let index = match selected {
            Some(id) => self.snapshot.position(&id),
            None => None,
        }
        .or(if self.snapshot.is_empty() {
            None
        } else {
            Some(0)
        });
        self.networks_state.select(index);
    }

    pub fn selected_network(&self) -> Option<&WirelessNetwork> {
        self.networks_state
            .selected()
            .and_then(|i| self.snapshot.get(i))
    }

    pub fn join_selected(&mut self, sender: UnboundedSender<Event>) {
        if let Some(target) = &self.joining {
            let _ = Notification::send(
                format!("Already connecting to {target}"),
                NotificationLevel::Info,
                &sender,
            );
            return;
        }

        let Some(network) = self.selected_network() else {
            return;
        };
        let target = network.hardware_id.clone();
        let label = network.label();

        self.joining = Some(target.clone());

        let coordinator = self.coordinator.clone();
        let snapshot = self.snapshot.clone();
        tokio::spawn(async move {
            match coordinator.join(&snapshot, &target, None).await {
                Ok(JoinOutcome::Joined(_)) => {
                    let _ = Notification::send(
                        format!("Connected to {label}"),
                        NotificationLevel::Info,
                        &sender,
                    );
                }
                Ok(JoinOutcome::Cancelled) => {
                    log::info!("join of {label} cancelled");
                }
                Err(e) => {
                    let message = e.to_string();
                    log::debug!("{:#}", anyhow::Error::from(e));
                    let _ = Notification::send(message, NotificationLevel::Error, &sender);
                }
            }
            let _ = sender.send(Event::JoinFinished);
        });
    }

    pub fn scroll_down(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        let i = match self.networks_state.selected() {
            Some(i) if i + 1 < self.snapshot.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.networks_state.select(Some(i));
    }

    pub fn scroll_up(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        let i = match self.networks_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.networks_state.select(Some(i));
    }

    pub fn tick(&mut self) {
        self.notifications.retain(|n| n.ttl > 0);
        self.notifications.iter_mut().for_each(|n| n.ttl -= 1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
