use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::catalog::ActionItem;
use crate::frame;
use crate::theme::ThemeTokens;

pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("↑/↓ or k/j", "Move up/down in menu"),
    ("Home/End", "Jump to first/last entry"),
    ("Enter/Space", "Execute selected command"),
    ("h or ?", "Show this help screen"),
    ("q or Q", "Quit the menu"),
    ("Ctrl+C", "Emergency exit"),
];

pub fn render(f: &mut Frame, area: Rect, app_title: &str, catalog: &[ActionItem], theme: &ThemeTokens) {
    frame::render_page(&format!("{app_title} - Help"), body(catalog, theme), area, theme, f);
}

fn heading(text: &str, theme: &ThemeTokens) -> Line<'static> {
    Line::styled(
        text.to_string(),
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    )
}

fn help_line(key: &str, desc: &str, theme: &ThemeTokens) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<14}"), Style::default().fg(theme.title)),
        Span::styled(format!("- {desc}"), Style::default().fg(theme.text)),
    ])
}

#[must_use]
pub fn body(catalog: &[ActionItem], theme: &ThemeTokens) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Navigation:", theme)];
    lines.extend(KEY_BINDINGS.iter().map(|(k, d)| help_line(k, d, theme)));

    let (builtins, external): (Vec<&ActionItem>, Vec<&ActionItem>) =
        catalog.iter().partition(|it| it.action.is_builtin());
    if !external.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Commands:", theme));
        lines.extend(external.iter().map(|it| help_line(&it.title, &it.description, theme)));
    }
    if !builtins.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Built-in:", theme));
        lines.extend(builtins.iter().map(|it| help_line(&it.title, &it.description, theme)));
    }
    lines
}
