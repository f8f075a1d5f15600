use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{App, FocusedBlock};
use crate::event::Event;

pub async fn handle_key_events(
    key_event: KeyEvent,
    app: &mut App,
    sender: UnboundedSender<Event>,
) -> Result<()> {
    match app.focused_block {
        FocusedBlock::PskAuthKey => match key_event.code {
            KeyCode::Enter => {
                app.psk.submit(&app.agent).await?;
                app.network_name_requiring_auth = None;
                app.focused_block = FocusedBlock::Networks;
            }

            KeyCode::Esc => {
                app.psk.cancel(&app.agent).await?;
                app.network_name_requiring_auth = None;
                app.focused_block = FocusedBlock::Networks;
            }

            KeyCode::Tab => {
                app.psk.show_password = !app.psk.show_password;
            }

            _ => {
                app.psk
                    .passphrase
                    .handle_event(&crossterm::event::Event::Key(key_event));
            }
        },

        FocusedBlock::Networks => match key_event.code {
            KeyCode::Char('q') => app.quit(),

            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                app.quit()
            }

            KeyCode::Esc if app.config.esc_quit => app.quit(),

            KeyCode::Char(c) if c == app.config.station.start_scanning => {
                app.scan(sender);
            }

            KeyCode::Char(c) if c == app.config.station.refresh => {
                app.refresh_association();
            }

            KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),

            KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),

            KeyCode::Enter | KeyCode::Char(' ') => app.join_selected(sender),

            _ => {}
        },
    }

    Ok(())
}
