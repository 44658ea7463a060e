use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::frame;
use crate::report::SystemReport;
use crate::theme::ThemeTokens;

pub fn render(f: &mut Frame, area: Rect, app_title: &str, report: Option<&SystemReport>, theme: &ThemeTokens) {
    let body: Vec<Line<'static>> = match report {
        Some(r) => r.lines().into_iter().map(Line::from).collect(),
        None => vec![Line::from("System information unavailable")],
    };
    frame::render_page(&format!("{app_title} - System Information"), body, area, theme, f);
}
