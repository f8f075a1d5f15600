use anyhow::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, path::PathBuf, str::FromStr, sync::Arc};
use wlscan::{
    app::{App, FocusedBlock},
    cli,
    config::Config,
    event::{Event, EventHandler},
    handler::handle_key_events,
    join::JoinMode,
    logging,
    tui::{self, Tui},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::cli().get_matches();

    let config = Config::new(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let log_path = logging::init(&config.log)?;
    log::info!("wlscan {} started, logging to {}", env!("CARGO_PKG_VERSION"), log_path.display());

    let join_mode = args
        .get_one::<String>("join-mode")
        .map(|mode| JoinMode::from_str(mode))
        .transpose()?;

    let config = Arc::new(config);

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(1_000);
    let mut tui = Tui::new(terminal, events);

    let mut app = App::new(tui.events.sender.clone(), config, join_mode).await?;

    tui.init()?;
    app.start(tui.events.sender.clone());

    let result = run(&mut app, &mut tui).await;
    tui::restore_after(result, || tui.exit())?;

    log::info!("wlscan exited");
    Ok(())
}

async fn run(app: &mut App, tui: &mut Tui) -> Result<()> {
    while app.running {
        tui.draw(app)?;
        match tui.events.next().await? {
            Event::Tick => app.tick(),
            Event::Key(key_event) => {
                handle_key_events(key_event, app, tui.events.sender.clone()).await?
            }
            Event::Notification(notification) => {
                app.notifications.push(notification);
            }
            Event::Auth(network_name) => {
                app.network_name_requiring_auth = Some(network_name);
                app.focused_block = FocusedBlock::PskAuthKey;
            }
            Event::ScanFinished => app.sync_snapshot(),
            Event::JoinFinished => {
                app.joining = None;
                if app.focused_block == FocusedBlock::PskAuthKey && !app.agent.is_waiting() {
                    app.focused_block = FocusedBlock::Networks;
                }
            }
            Event::Resize(_, _) => {}
        }
    }

    Ok(())
}
