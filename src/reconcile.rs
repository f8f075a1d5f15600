use std::sync::Arc;
use tokio::sync::watch;

use crate::capability::ScanCapability;
use crate::error::Error;
use crate::network::{HardwareId, WirelessNetwork};

/// Tracks which access point the radio is associated with.
#[derive(Clone)]
pub struct ConnectionReconciler {
    scanner: Arc<dyn ScanCapability>,
    current: Arc<watch::Sender<Option<HardwareId>>>,
}

impl ConnectionReconciler {
    pub fn new(scanner: Arc<dyn ScanCapability>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            scanner,
            current: Arc::new(current),
        }
    }

    /// Query the association and store the result.
    ///
    /// A failed query is logged and leaves no known association.
    pub async fn current_association(&self) -> Option<HardwareId> {
        let association = match self.scanner.current_association_id().await {
            Ok(Some(id)) if !id.trim().is_empty() => Some(HardwareId::new(&id)),
            Ok(_) => None,
            Err(e) => {
                log::error!("{:#}", anyhow::Error::from(Error::AssociationQueryFailed(e)));
                None
            }
        };

        log::debug!("associated with {association:?}");
        self.current.send_replace(association.clone());
        association
    }

    /// The last stored association, without querying.
    pub fn current(&self) -> Option<HardwareId> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<HardwareId>> {
        self.current.subscribe()
    }

    pub fn is_associated(&self, network: &WirelessNetwork) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|id| *id == network.hardware_id)
    }
}
