//! Color palettes for the TUI.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    /// Header color for the user's messages.
    pub user: Color,
    /// Header color for assistant messages and the typing indicator.
    pub bot: Color,
    pub border: Color,
    pub border_focused: Color,
}

/// Palettes selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Mocha,
    Latte,
    HighContrast,
}

impl ThemeName {
    /// Parse a config value. Unknown names give `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mocha" | "dark" => Some(Self::Mocha),
            "latte" | "light" => Some(Self::Latte),
            "high-contrast" | "high_contrast" | "contrast" => Some(Self::HighContrast),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        match name {
            ThemeName::Mocha => Self::mocha(),
            ThemeName::Latte => Self::latte(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Look up a theme by config name, falling back to Mocha.
    ///
    /// `NO_COLOR` in the environment forces the high contrast palette.
    pub fn by_name(name: &str) -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            return Self::high_contrast();
        }
        Self::new(ThemeName::parse(name).unwrap_or(ThemeName::Mocha))
    }

    /// Catppuccin Mocha, the default dark palette.
    pub fn mocha() -> Self {
        Self {
            base: hex(0x1e1e2e),
            surface: hex(0x313244),
            overlay: hex(0x45475a),
            text: hex(0xcdd6f4),
            subtext: hex(0xa6adc8),
            muted: hex(0x6c7086),
            primary: hex(0xb4befe),
            secondary: hex(0x94e2d5),
            success: hex(0xa6e3a1),
            warning: hex(0xf9e2af),
            error: hex(0xf38ba8),
            info: hex(0x89b4fa),
            user: hex(0xfab387),
            bot: hex(0x89b4fa),
            border: hex(0x45475a),
            border_focused: hex(0xb4befe),
        }
    }

    /// Catppuccin Latte, for light terminals.
    pub fn latte() -> Self {
        Self {
            base: hex(0xeff1f5),
            surface: hex(0xe6e9ef),
            overlay: hex(0xdce0e8),
            text: hex(0x4c4f69),
            subtext: hex(0x5c5f77),
            muted: hex(0x8c8fa1),
            primary: hex(0x7287fd),
            secondary: hex(0x179299),
            success: hex(0x40a02b),
            warning: hex(0xdf8e1d),
            error: hex(0xd20f39),
            info: hex(0x1e66f5),
            user: hex(0xfe640b),
            bot: hex(0x1e66f5),
            border: hex(0xbcc0cc),
            border_focused: hex(0x7287fd),
        }
    }

    /// Named ANSI colors only, so it survives limited terminals.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::DarkGray,
            overlay: Color::DarkGray,
            text: Color::White,
            subtext: Color::Gray,
            muted: Color::Gray,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            user: Color::LightRed,
            bot: Color::LightBlue,
            border: Color::White,
            border_focused: Color::Cyan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0x1e1e2e), Color::Rgb(30, 30, 46));
        assert_eq!(hex(0xff0001), Color::Rgb(255, 0, 1));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(ThemeName::parse("Latte"), Some(ThemeName::Latte));
        assert_eq!(ThemeName::parse(" high-contrast "), Some(ThemeName::HighContrast));
        assert_eq!(ThemeName::parse("solarized"), None);
    }

    #[test]
    fn test_by_name_unknown_falls_back() {
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        assert_eq!(Theme::by_name("latte").base, Theme::latte().base);
        assert_eq!(Theme::by_name("solarized").base, Theme::mocha().base);
    }

    #[test]
    fn test_user_and_bot_differ() {
        for name in [ThemeName::Mocha, ThemeName::Latte, ThemeName::HighContrast] {
            let theme = Theme::new(name);
            assert_ne!(theme.user, theme.bot, "{name:?}");
        }
    }

    #[test]
    fn test_default_is_mocha() {
        assert_eq!(Theme::default().base, Color::Rgb(30, 30, 46));
    }
}
