use anyhow::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};
use tui_input::Input;

use crate::agent::AuthAgent;

/// Password popup shown while a join waits for a credential
#[derive(Debug, Default)]
pub struct Psk {
    pub passphrase: Input,
    pub show_password: bool,
}

impl Psk {
    pub async fn submit(&mut self, agent: &AuthAgent) -> Result<()> {
        let passphrase: String = self.passphrase.value().into();
        agent.submit(passphrase).await?;
        self.reset();
        Ok(())
    }

    pub async fn cancel(&mut self, agent: &AuthAgent) -> Result<()> {
        agent.cancel().await;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.passphrase.reset();
        self.show_password = false;
    }

    pub fn render(&self, frame: &mut Frame, network_name: &str) {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(9),
                Constraint::Fill(1),
            ])
            .flex(Flex::SpaceBetween)
            .split(frame.area());

        let area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(60),
                Constraint::Fill(1),
            ])
            .flex(Flex::SpaceBetween)
            .split(popup_layout[1])[1];

        frame.render_widget(Clear, area);

        frame.render_widget(
            Block::new()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .title(format!(" Password for {network_name} "))
                .title_style(Style::default().bold().fg(Color::White))
                .border_style(Style::default().fg(Color::Green)),
            area,
        );

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // password input
                Constraint::Length(1),
                Constraint::Length(1), // visibility toggle
                Constraint::Length(1),
                Constraint::Length(1), // hints
            ])
            .split(Block::new().padding(Padding::new(3, 3, 2, 0)).inner(area));

        let password_str = if self.show_password {
            self.passphrase.value().to_string()
        } else {
            "*".repeat(self.passphrase.value().chars().count())
        };

        let password_input = Paragraph::new(if password_str.is_empty() {
            Line::from(Span::raw("Enter password").dim())
        } else {
            Line::from(password_str.clone())
        })
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(password_input, inner[0]);

        let toggle = Paragraph::new(Line::from(vec![
            if self.show_password {
                Span::raw("󰈈 Visible")
            } else {
                Span::raw("󰈉 Hidden")
            },
            Span::raw("  (Tab to toggle)").dim(),
        ]));
        frame.render_widget(toggle, inner[2]);

        let hints = Paragraph::new(
            Line::from(vec![
                Span::raw("Enter").bold(),
                Span::raw(" Connect  "),
                Span::raw("Esc").bold(),
                Span::raw(" Cancel"),
            ])
            .centered(),
        )
        .dim();
        frame.render_widget(hints, inner[4]);

        let cursor_x = inner[0].x
            + self
                .passphrase
                .visual_cursor()
                .min(password_str.chars().count()) as u16;
        frame.set_cursor_position((cursor_x, inner[0].y));
    }
}
