//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (titles, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected mode, keybinding keys, selection marker)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(209), // orange (ANSI 256)
            Self::Light => Color::Indexed(166), // dark orange (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive modes, hints, links)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Group label color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Color column
    pub fn swatch(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Price column
    pub fn price(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Error/warning color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_text_contrasts_with_background() {
        assert_eq!(Theme::Dark.text(), Color::White);
        assert_eq!(Theme::Light.text(), Color::Black);
    }

    #[test]
    fn test_light_theme_avoids_pale_colors() {
        // Light backgrounds need darker indexed colors
        for color in [
            Theme::Light.accent(),
            Theme::Light.date(),
            Theme::Light.swatch(),
            Theme::Light.price(),
            Theme::Light.error(),
        ] {
            assert!(matches!(color, Color::Indexed(_)));
        }
    }
}
