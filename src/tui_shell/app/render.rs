use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::validate::is_valid_url;

use super::*;

const STATUS_LINES: usize = 4;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(STATUS_LINES as u16 + 1),
            Constraint::Length(2),
        ])
        .split(area);

    // Header
    let editing = app.controller.is_editing();
    let state_style = if app.controller.save_pending() {
        Style::default().fg(Color::Yellow)
    } else if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Green)
    };
    let mut spans = vec![
        Span::styled(
            "Linkdeck",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(app.status_label(), state_style),
        Span::raw("  "),
        Span::raw(app.remote_label.as_str()),
    ];
    if let Some(rev) = app.controller.last_revision() {
        spans.push(Span::styled(
            format!("  rev {}", rev),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        format!("  policy {}", app.controller.policy()),
        Style::default().fg(Color::Gray),
    ));
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    draw_entries(frame, chunks[1], app);

    // Status
    {
        let start = app.log.len().saturating_sub(STATUS_LINES);
        let lines: Vec<Line> = app.log[start..]
            .iter()
            .map(|l| {
                let style = match l.kind {
                    LogKind::Info => Style::default().fg(Color::White),
                    LogKind::Warn => Style::default().fg(Color::Yellow),
                    LogKind::Error => Style::default().fg(Color::Red),
                };
                Line::from(vec![
                    Span::styled(format!("{} ", fmt_clock(l.at)), Style::default().fg(Color::Gray)),
                    Span::styled(l.text.as_str(), style),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::TOP).title("Status")),
            chunks[2],
        );
    }

    // Prompt or key help
    let bottom = chunks[3];
    if let Some(prompt) = &app.prompt {
        let label = prompt.label();
        let line = Line::from(vec![
            Span::styled(label.as_str(), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::raw(app.input.buf.as_str()),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
            bottom,
        );
        let x = bottom.x + label.chars().count() as u16 + 1 + app.input.cursor as u16;
        frame.set_cursor_position((x.min(bottom.right().saturating_sub(1)), bottom.y + 1));
    } else {
        let help = if editing {
            "space toggle  Enter url  p path  a add  r reset  s save  Esc discard  P policy"
        } else {
            "e edit  r reset  P policy  j/k move  q quit"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray)))
                .block(Block::default().borders(Borders::TOP)),
            bottom,
        );
    }
}

fn draw_entries(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &App) {
    let entries = app.controller.view();
    let editing = app.controller.is_editing();
    let width = entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(key, e)| {
            let active = e.is_active();
            let marker = if active { "[x]" } else { "[ ]" };
            // Invalid urls are only flagged while they can still be fixed.
            let url_style = if !active {
                Style::default().fg(Color::DarkGray)
            } else if editing && !is_valid_url(&e.url) {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let url = if e.url.is_empty() { "-" } else { e.url.as_str() };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {:<width$}  ", marker, key, width = width)),
                Span::styled(url, url_style),
                Span::styled(format!("  -> {}", e.path), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let title = if entries.is_empty() {
        "Entries (none)".to_string()
    } else {
        format!("Entries ({})", entries.len())
    };

    let mut state = ListState::default();
    if !entries.is_empty() {
        state.select(Some(app.selected.min(entries.len() - 1)));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut state);
}

fn fmt_clock(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}Z", at.hour(), at.minute(), at.second())
}
