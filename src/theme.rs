//! UI palette. Ships with the product's dark look and can be overridden
//! from ~/.config/famstream/theme.conf (`key #hexcolor` lines).

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,        // Brand green: active borders, primary actions
    pub accent_bright: Color, // Brighter accent for highlights
    pub danger: Color,        // Destructive actions, error toasts
    pub success: Color,       // Confirmations, "active" badges
    pub warning: Color,       // Pending badges, cautions
    pub text: Color,          // Primary text
    pub text_dim: Color,      // Secondary text
    pub bg_selected: Color,   // Selection background
    pub inactive: Color,      // Inactive borders
    pub header: Color,        // Logo / headings (brand red)
    /// Avatar accents, cycled per profile.
    pub avatars: [Color; 5],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(34, 197, 94),
            accent_bright: Color::Rgb(74, 222, 128),
            danger: Color::Rgb(239, 68, 68),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            text: Color::Rgb(229, 231, 235),
            text_dim: Color::Rgb(156, 163, 175),
            bg_selected: Color::Rgb(31, 41, 55),
            inactive: Color::Rgb(55, 65, 81),
            header: Color::Rgb(248, 113, 113),
            avatars: [
                Color::Rgb(34, 197, 94),
                Color::Rgb(59, 130, 246),
                Color::Rgb(168, 85, 247),
                Color::Rgb(249, 115, 22),
                Color::Rgb(236, 72, 153),
            ],
        }
    }
}

impl Theme {
    /// Load the user override, falling back to the built-in palette.
    pub fn load() -> Self {
        if let Some(theme) = Self::load_user_theme() {
            return theme;
        }
        Self::default()
    }

    fn load_user_theme() -> Option<Self> {
        let path = dirs::config_dir()?.join("famstream/theme.conf");
        let content = fs::read_to_string(path).ok()?;
        let colors = Self::parse_theme_conf(&content);

        if colors.is_empty() {
            return None;
        }

        let base = Self::default();
        let pick = |key: &str, fallback: Color| colors.get(key).copied().unwrap_or(fallback);

        Some(Self {
            accent: pick("accent", base.accent),
            accent_bright: pick("accent_bright", base.accent_bright),
            danger: pick("danger", base.danger),
            success: pick("success", base.success),
            warning: pick("warning", base.warning),
            text: pick("text", base.text),
            text_dim: pick("text_dim", base.text_dim),
            bg_selected: pick("bg_selected", base.bg_selected),
            inactive: pick("inactive", base.inactive),
            header: pick("header", base.header),
            avatars: base.avatars,
        })
    }

    /// Parse `key value` lines where value is a hex color
    fn parse_theme_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                if let Some(color) = Self::parse_hex_color(parts[1].trim()) {
                    colors.insert(parts[0].trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            Theme::parse_hex_color("#22c55e"),
            Some(Color::Rgb(0x22, 0xc5, 0x5e))
        );
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
    }

    #[test]
    fn conf_lines_override_known_keys_only() {
        let colors = Theme::parse_theme_conf("# comment\naccent #ff0000\nbroken\n");
        assert_eq!(colors.len(), 1);
        assert_eq!(colors["accent"], Color::Rgb(255, 0, 0));
    }
}
