use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Row, Table},
};

use crate::{
    app::{App, FocusedBlock},
    classify::{Severity, band_of},
    network::WirelessNetwork,
};

pub fn render(app: &mut App, frame: &mut Frame) {
    let (header_block, networks_block, help_block) = {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .margin(1)
            .split(frame.area());
        (chunks[0], chunks[1], chunks[2])
    };

    render_header(app, frame, header_block);
    render_networks(app, frame, networks_block);
    render_help(app, frame, help_block);

    if app.focused_block == FocusedBlock::PskAuthKey {
        let name = app
            .network_name_requiring_auth
            .as_deref()
            .unwrap_or_default();
        app.psk.render(frame, name);
    }

    for (index, notification) in app.notifications.iter().enumerate() {
        notification.render(index, frame);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let state = if app.orchestrator.is_scanning() {
        Span::raw("󰑓 Scanning").fg(Color::Yellow)
    } else if let Some(target) = &app.joining {
        Span::raw(format!("󱚾 Connecting to {target}")).fg(Color::Yellow)
    } else {
        Span::raw("Idle").dim()
    };

    let last_scan = match app.snapshot.taken_at() {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => "never".to_string(),
    };

    let connected = match app.reconciler.current() {
        Some(id) => match app.snapshot.find(&id) {
            Some(net) => format!("{} ({id})", net.label()),
            None => id.to_string(),
        },
        None => "-".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Device ").bold(),
            Span::raw(format!("{} {}", app.device.name, app.device.address)),
            Span::raw("   "),
            state,
        ]),
        Line::from(vec![
            Span::raw("Connected ").bold(),
            Span::raw(connected),
            Span::raw("   Last scan ").bold(),
            Span::raw(last_scan),
            Span::raw("   Join by ").bold(),
            Span::raw(app.coordinator.settings().mode.to_string()),
        ]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .title(" Station ")
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(header, area);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Positive => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Negative => Color::Red,
    }
}

fn network_row(net: &WirelessNetwork, connected: bool) -> Row<'static> {
    let signal = net.signal();

    let name = if net.is_hidden() {
        Line::from("Hidden Network").italic().dim()
    } else {
        Line::from(net.ssid.clone())
    };

    Row::new(vec![
        if connected {
            Line::from("󰖩 ").centered()
        } else {
            Line::from("")
        },
        name,
        Line::from(net.hardware_id.to_string()).centered(),
        Line::from(net.channel.to_string()).centered(),
        Line::from(band_of(net.frequency_mhz).to_string()).centered(),
        Line::from(format!("{} MHz", net.frequency_mhz)).centered(),
        Line::from(format!("{} dBm", net.signal_level)).centered(),
        Line::from(signal.bucket.to_string())
            .fg(severity_color(signal.severity))
            .centered(),
        if net.is_secured() {
            Line::from("").centered()
        } else {
            Line::from("")
        },
    ])
}

fn render_networks(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focused_block == FocusedBlock::Networks;

    let block = Block::default()
        .title(" Networks ")
        .title_style(if focused {
            Style::default().bold()
        } else {
            Style::default()
        })
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        })
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::default()
        })
        .padding(Padding::horizontal(1));

    if app.snapshot.is_empty() {
        let message = if app.orchestrator.is_scanning() {
            "Scanning for WiFi networks..."
        } else {
            "No WiFi networks found"
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(message).bold(),
            Line::from(format!(
                "Press {} to scan again",
                app.config.station.start_scanning
            ))
            .dim(),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let connected = app.reconciler.current();
    let rows: Vec<Row> = app
        .snapshot
        .networks()
        .iter()
        .map(|net| network_row(net, connected.as_ref() == Some(&net.hardware_id)))
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(25),
        Constraint::Length(17),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(2),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                Line::from(""),
                Line::from("Name").yellow(),
                Line::from("BSSID").yellow().centered(),
                Line::from("Channel").yellow().centered(),
                Line::from("Band").yellow().centered(),
                Line::from("Frequency").yellow().centered(),
                Line::from("Level").yellow().centered(),
                Line::from("Signal").yellow().centered(),
                Line::from(""),
            ])
            .style(Style::new().bold())
            .bottom_margin(1),
        )
        .block(block)
        .column_spacing(1)
        .flex(Flex::SpaceAround)
        .row_highlight_style(if focused {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default()
        });

    frame.render_stateful_widget(table, area, &mut app.networks_state);
}

fn render_help(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.focused_block {
        FocusedBlock::Networks => Line::from(vec![
            Span::raw("k,").bold(),
            Span::raw("  Up"),
            Span::raw(" | "),
            Span::raw("j,").bold(),
            Span::raw("  Down"),
            Span::raw(" | "),
            Span::raw("󱁐  or ↵ ").bold(),
            Span::raw(" Connect"),
            Span::raw(" | "),
            Span::raw(app.config.station.start_scanning.to_string()).bold(),
            Span::raw(" Scan"),
            Span::raw(" | "),
            Span::raw(app.config.station.refresh.to_string()).bold(),
            Span::raw(" Refresh"),
            Span::raw(" | "),
            Span::raw("q").bold(),
            Span::raw(" Quit"),
        ]),
        FocusedBlock::PskAuthKey => Line::from(vec![
            Span::raw("↵ ").bold(),
            Span::raw(" Submit"),
            Span::raw(" | "),
            Span::raw("⇄").bold(),
            Span::raw(" Show password"),
            Span::raw(" | "),
            Span::raw("󱊷 ").bold(),
            Span::raw(" Cancel"),
        ]),
    };

    frame.render_widget(Paragraph::new(help).centered().blue(), area);
}
