use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{HighlightSpacing, List, ListItem, ListState, Paragraph};

use crate::catalog::ActionItem;
use crate::frame;
use crate::theme::ThemeTokens;

pub const SELECTED_MARKER: &str = "► ";
pub const KEY_HINTS: &str = "↑/↓ j/k: Navigate  Enter/Space: Execute  h/?: Help  q: Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Problem,
}

/// Status line content and how it is colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    #[must_use]
    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Neutral,
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    #[must_use]
    pub fn problem(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Problem,
        }
    }

    #[must_use]
    pub fn is_problem(&self) -> bool {
        self.tone == Tone::Problem
    }
}

/// Everything one dashboard frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub title: &'a str,
    pub version: &'a str,
    pub catalog: &'a [ActionItem],
    pub selected: usize,
    pub status: &'a StatusLine,
    pub theme: &'a ThemeTokens,
}

pub fn render(f: &mut Frame, area: Rect, view: &DashboardView) {
    let theme = view.theme;
    let areas = frame::split_dashboard(area);

    frame::render_header(view.title, view.version, areas.header, theme, f);
    frame::render_rule(areas.top_rule, theme, f);
    render_body(f, areas.body, view);
    frame::render_rule(areas.bottom_rule, theme, f);

    let footer = Paragraph::new(Line::styled(KEY_HINTS, Style::default().fg(theme.footer)));
    f.render_widget(footer, areas.footer.inner(Margin::new(2, 0)));

    let status_color = match view.status.tone {
        Tone::Neutral => theme.status,
        Tone::Success => theme.accent_success,
        Tone::Problem => theme.accent_danger,
    };
    frame::render_status_bar(
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("Status: {}", view.status.text),
                Style::default().fg(status_color),
            ),
        ]),
        areas.status,
        f,
    );
}

fn render_body(f: &mut Frame, body: Rect, view: &DashboardView) {
    let theme = view.theme;
    let count = view.catalog.len();
    let body = body.inner(Margin::new(2, 0));

    // Description only when the whole list plus a blank row fits.
    let (list_area, desc_area) = if usize::from(body.height) >= count + 2 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(count as u16),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(body);
        (rows[0], Some(rows[2]))
    } else {
        (body, None)
    };

    let items: Vec<ListItem> = view
        .catalog
        .iter()
        .map(|it| ListItem::new(Line::from(it.title.clone())).style(Style::default().fg(theme.text)))
        .collect();
    let list = List::new(items)
        .highlight_symbol(SELECTED_MARKER)
        .highlight_spacing(HighlightSpacing::Always)
        .highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );
    let selected = (count > 0).then(|| view.selected.min(count - 1));
    f.render_stateful_widget(list, list_area, &mut ListState::default().with_selected(selected));

    if let (Some(area), Some(idx)) = (desc_area, selected) {
        let desc = Paragraph::new(Line::styled(
            format!("Description: {}", view.catalog[idx].description),
            Style::default().fg(theme.description),
        ));
        f.render_widget(desc, area);
    }
}
