use ratatui::style::Color;
use std::collections::HashMap;

pub const THEME_NAMES: &[&str] = &["dark", "light"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTokens {
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,

    pub selection_fg: Color,
    pub selection_bg: Color,

    pub description: Color,
    pub footer: Color,
    pub status: Color,

    pub accent_success: Color,
    pub accent_danger: Color,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        Self::builtin_dark()
    }
}

impl ThemeTokens {
    #[must_use]
    pub fn builtin_dark() -> Self {
        Self {
            title: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
            border: Color::DarkGray,

            selection_fg: Color::Black,
            selection_bg: Color::White,

            description: Color::Green,
            footer: Color::Green,
            status: Color::Yellow,

            accent_success: Color::Green,
            accent_danger: Color::Red,
        }
    }

    #[must_use]
    pub fn builtin_light() -> Self {
        Self {
            title: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            border: Color::Gray,

            selection_fg: Color::White,
            selection_bg: Color::Black,

            description: Color::Rgb(0, 110, 0),
            footer: Color::DarkGray,
            status: Color::Rgb(140, 90, 0),

            accent_success: Color::Rgb(0, 110, 0),
            accent_danger: Color::Red,
        }
    }

    /// Returns false when the key or the color is not recognized.
    pub fn apply_token(&mut self, key: &str, value: &str) -> bool {
        let Some(color) = parse_color(value) else {
            return false;
        };
        let slot = match key {
            "title" => &mut self.title,
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "border" => &mut self.border,
            "selection_fg" => &mut self.selection_fg,
            "selection_bg" => &mut self.selection_bg,
            "description" => &mut self.description,
            "footer" => &mut self.footer,
            "status" => &mut self.status,
            "accent_success" => &mut self.accent_success,
            "accent_danger" => &mut self.accent_danger,
            _ => return false,
        };
        *slot = color;
        true
    }
}

#[must_use]
pub fn is_known_theme(name: &str) -> bool {
    THEME_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Builtin palette by name (default dark) with per-token overrides on top.
#[must_use]
pub fn load_theme<S: ::std::hash::BuildHasher>(
    name: Option<&str>,
    overrides: Option<&HashMap<String, String, S>>,
) -> ThemeTokens {
    let mut tokens = match name.map(str::to_ascii_lowercase) {
        Some(n) if n == "light" => ThemeTokens::builtin_light(),
        _ => ThemeTokens::builtin_dark(),
    };
    if let Some(map) = overrides {
        for (k, v) in map {
            if !tokens.apply_token(k, v) {
                tracing::warn!(token = %k, value = %v, "ignoring theme override");
            }
        }
    }
    tokens
}

#[must_use]
pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Some(Color::Rgb(r, g, b));
        }
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#102030"), Some(Color::Rgb(16, 32, 48)));
        assert_eq!(parse_color("ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color(" Grey "), Some(Color::Gray));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_named_theme() {
        let mut overrides = HashMap::new();
        overrides.insert("title".to_string(), "magenta".to_string());
        overrides.insert("nope".to_string(), "red".to_string());
        let t = load_theme(Some("LIGHT"), Some(&overrides));
        assert_eq!(t.title, Color::Magenta);
        assert_eq!(t.text, ThemeTokens::builtin_light().text);
    }

    #[test]
    fn unknown_name_falls_back_to_dark() {
        assert_eq!(
            load_theme::<std::collections::hash_map::RandomState>(Some("solarized"), None),
            ThemeTokens::builtin_dark()
        );
        assert!(!is_known_theme("solarized"));
        assert!(is_known_theme("Dark"));
    }
}
