//! Catppuccin Mocha color palette for the TUI.

use ratatui::style::Color;

/// Colors used by every widget. Speaker colors tell "You" from "HealthBot".
#[derive(Debug, Clone)]
pub struct Theme {
    pub base: Color,
    /// Footer, code and input background.
    pub surface: Color,
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub warning: Color,
    /// Error replies.
    pub error: Color,
    pub info: Color,
    pub user: Color,
    pub assistant: Color,
    pub border: Color,
    /// Input border while it accepts typing.
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Pick a theme from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::high_contrast()
        } else {
            Self::mocha()
        }
    }

    /// Catppuccin Mocha, the default dark palette.
    pub fn mocha() -> Self {
        let lavender = Color::Rgb(0xb4, 0xbe, 0xfe);
        Self {
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
            surface: Color::Rgb(0x31, 0x32, 0x44),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext: Color::Rgb(0xa6, 0xad, 0xc8),
            muted: Color::Rgb(0x6c, 0x70, 0x86),
            primary: lavender,
            secondary: Color::Rgb(0x94, 0xe2, 0xd5),
            warning: Color::Rgb(0xf9, 0xe2, 0xaf),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            info: Color::Rgb(0x89, 0xb4, 0xfa),
            user: Color::Rgb(0xfa, 0xb3, 0x87),
            assistant: Color::Rgb(0xa6, 0xe3, 0xa1),
            border: Color::Rgb(0x45, 0x47, 0x5a),
            border_focused: lavender,
        }
    }

    /// Plain terminal colors, used when `NO_COLOR` is set.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::Rgb(20, 20, 20),

            text: Color::White,
            subtext: Color::Rgb(200, 200, 200),
            muted: Color::Rgb(150, 150, 150),

            primary: Color::Cyan,
            secondary: Color::Magenta,

            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,

            user: Color::LightRed,
            assistant: Color::LightGreen,

            border: Color::White,
            border_focused: Color::Cyan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mocha_theme_creates() {
        let theme = Theme::mocha();
        assert!(matches!(theme.base, Color::Rgb(30, 30, 46)));
    }

    #[test]
    fn test_high_contrast_theme_creates() {
        let theme = Theme::high_contrast();
        assert!(matches!(theme.base, Color::Black));
    }

    #[test]
    fn test_default_is_mocha() {
        assert!(matches!(Theme::default().base, Color::Rgb(30, 30, 46)));
    }

    #[test]
    fn test_speakers_are_distinct() {
        for theme in [Theme::mocha(), Theme::high_contrast()] {
            assert_ne!(theme.user, theme.assistant);
        }
    }
}
