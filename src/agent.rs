use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;

use crate::capability::CredentialPrompt;
use crate::event::Event;

/// Bridges credential requests from the join pipeline to the UI.
///
/// The pipeline asks through [`CredentialPrompt`], the UI is told to show
/// the password popup and answers on the passphrase or cancel channel.
#[derive(Debug, Clone)]
pub struct AuthAgent {
    pub tx_cancel: Sender<()>,
    pub rx_cancel: Receiver<()>,
    pub tx_passphrase: Sender<String>,
    pub rx_passphrase: Receiver<String>,
    pub psk_required: Arc<AtomicBool>,
    pub event_sender: UnboundedSender<Event>,
}

impl AuthAgent {
    pub fn new(sender: UnboundedSender<Event>) -> Self {
        let (tx_passphrase, rx_passphrase) = async_channel::unbounded();
        let (tx_cancel, rx_cancel) = async_channel::unbounded();

        Self {
            tx_cancel,
            rx_cancel,
            tx_passphrase,
            rx_passphrase,
            psk_required: Arc::new(AtomicBool::new(false)),
            event_sender: sender,
        }
    }

    /// Request PSK passphrase from user
    pub fn request_passphrase(&self, network_name: String) -> anyhow::Result<()> {
        self.psk_required.store(true, Ordering::Relaxed);

        self.event_sender
            .send(Event::Auth(network_name))
            .map_err(|e| anyhow::anyhow!("Failed to send auth event: {}", e))?;

        Ok(())
    }

    /// Wait for passphrase response with cancellation support
    pub async fn wait_for_passphrase(&self) -> Option<String> {
        tokio::select! {
            r = self.rx_passphrase.recv() => {
                r.ok()
            }
            _ = self.rx_cancel.recv() => {
                None
            }
        }
    }

    pub async fn submit(&self, passphrase: String) -> anyhow::Result<()> {
        self.tx_passphrase.send(passphrase).await?;
        Ok(())
    }

    /// Cancel any pending credential request
    pub async fn cancel(&self) {
        let _ = self.tx_cancel.send(()).await;
    }

    pub fn is_waiting(&self) -> bool {
        self.psk_required.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.psk_required.store(false, Ordering::Relaxed);
    }
}

#[async_trait]
impl CredentialPrompt for AuthAgent {
    async fn ask(&self, ssid: &str) -> Option<SecretString> {
        if let Err(e) = self.request_passphrase(ssid.to_string()) {
            log::error!("{e}");
            return None;
        }

        let passphrase = self.wait_for_passphrase().await;
        self.reset();

        passphrase
            .filter(|p| !p.is_empty())
            .map(SecretString::from)
    }
}
