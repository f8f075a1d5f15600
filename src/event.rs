use anyhow::{Result, anyhow};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::notification::Notification;

#[derive(Debug)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    Notification(Notification),
    /// A credential is needed to join the named network
    Auth(String),
    ScanFinished,
    JoinFinished,
}

pub struct EventHandler {
    pub sender: UnboundedSender<Event>,
    receiver: UnboundedReceiver<Event>,
    handler: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::unbounded_channel();
        let event_sender = sender.clone();

        let handler = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);
            loop {
                let tick_delay = tick.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    _ = event_sender.closed() => {
                        break;
                    }
                    _ = tick_delay => {
                        if event_sender.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        let sent = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                event_sender.send(Event::Key(key))
                            }
                            CrosstermEvent::Resize(x, y) => event_sender.send(Event::Resize(x, y)),
                            _ => Ok(()),
                        };
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| anyhow!("Event channel closed"))
    }

    pub fn stop(&self) {
        self.handler.abort();
    }
}
