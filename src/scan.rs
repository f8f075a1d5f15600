use chrono::Local;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, watch};

use crate::capability::{PermissionCapability, PermissionStatus, ScanCapability};
use crate::error::{Error, Result};
use crate::network::ScanSnapshot;

/// Runs scans and owns the published snapshot.
///
/// Cloning is cheap; clones share the snapshot, the permission grant and
/// the in-flight guard, so a clone can be moved into a spawned task.
#[derive(Clone)]
pub struct ScanOrchestrator {
    scanner: Arc<dyn ScanCapability>,
    permission: Arc<dyn PermissionCapability>,
    granted: Arc<AtomicBool>,
    in_flight: Arc<Mutex<()>>,
    snapshot: Arc<watch::Sender<ScanSnapshot>>,
}

impl ScanOrchestrator {
    pub fn new(
        scanner: Arc<dyn ScanCapability>,
        permission: Arc<dyn PermissionCapability>,
    ) -> Self {
        let (snapshot, _) = watch::channel(ScanSnapshot::default());
        Self {
            scanner,
            permission,
            granted: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(Mutex::new(())),
            snapshot: Arc::new(snapshot),
        }
    }

    /// The last successfully published snapshot.
    pub fn snapshot(&self) -> ScanSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn is_scanning(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub fn is_permission_granted(&self) -> bool {
        self.granted.load(Ordering::Relaxed)
    }

    /// Ask for scan permission unless it was already granted.
    pub async fn ensure_permission(&self) -> Result<()> {
        if self.is_permission_granted() {
            return Ok(());
        }

        match self.permission.request_location_access().await {
            Ok(PermissionStatus::Granted) => {
                self.granted.store(true, Ordering::Relaxed);
                Ok(())
            }
            Ok(PermissionStatus::Denied) => {
                log::warn!("scan permission denied");
                Err(Error::PermissionDenied)
            }
            Err(e) => {
                log::error!("permission request failed: {e:#}");
                Err(Error::ScanFailed(e))
            }
        }
    }

    pub async fn scan(&self) -> Result<ScanSnapshot> {
        let _guard = self.in_flight.try_lock().map_err(|_| Error::ScanInProgress)?;

        self.ensure_permission().await?;

        self.scanner
            .set_radio_enabled(true)
            .await
            .map_err(Error::ScanFailed)?;

        let raw = self
            .scanner
            .list_networks()
            .await
            .map_err(Error::ScanFailed)?;

        let snapshot = ScanSnapshot::from_raw(raw, Local::now());
        log::info!("scan found {} networks", snapshot.len());

        self.snapshot.send_replace(snapshot.clone());
        Ok(snapshot)
    }
}
