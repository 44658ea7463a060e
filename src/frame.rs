use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::ThemeTokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardAreas {
    pub header: Rect,
    pub top_rule: Rect,
    pub body: Rect,
    pub bottom_rule: Rect,
    pub footer: Rect,
    pub status: Rect,
}

#[must_use]
pub fn split_dashboard(area: Rect) -> DashboardAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    DashboardAreas {
        header: rows[0],
        top_rule: rows[1],
        body: rows[3],
        bottom_rule: rows[4],
        footer: rows[5],
        status: rows[6],
    }
}

pub fn render_header(title: &str, version: &str, area: Rect, theme: &ThemeTokens, f: &mut Frame) {
    let style = Style::default()
        .fg(theme.title)
        .add_modifier(Modifier::BOLD);
    let header = Paragraph::new(vec![
        Line::from(title.to_string()),
        Line::from(format!("Version {version}")),
    ])
    .style(style)
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

pub fn render_rule(area: Rect, theme: &ThemeTokens, f: &mut Frame) {
    let rule = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));
    f.render_widget(rule, area);
}

pub fn render_status_bar(spans: Line, area: Rect, f: &mut Frame) {
    let status_para = Paragraph::new(spans);
    f.render_widget(Clear, area);
    f.render_widget(status_para, area);
}

/// Full-screen text page: a bold title, its underline, then `body` lines.
pub fn render_page(title: &str, body: Vec<Line<'static>>, area: Rect, theme: &ThemeTokens, f: &mut Frame) {
    let underline = "=".repeat(title.chars().count());
    let mut lines: Vec<Line> = vec![
        Line::styled(
            title.to_string(),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(underline, Style::default().fg(theme.title)),
        Line::from(""),
    ];
    lines.extend(body);
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Press any key to continue...",
        Style::default().fg(theme.muted),
    ));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).style(Style::default().fg(theme.text)), area);
}
