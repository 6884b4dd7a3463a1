//! Console Styling Module
//!
//! ANSI color helpers shared by the dispatcher, the line-editor adapter,
//! the default commands and the logger.

/// ANSI foreground color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

/// Text weight applied together with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    Normal = 0,
    #[default]
    Bold = 1,
}

/// Wrap `text` in the escape sequence for `color` and `style`.
pub fn colorize(text: &str, color: Color, style: Style) -> String {
    format!("\x1b[{};3{}m{}\x1b[0m", style as u8, color as u8, text)
}

/// Colorize only when `enabled`; otherwise return the text untouched.
pub fn paint(text: &str, color: Color, style: Style, enabled: bool) -> String {
    if enabled {
        colorize(text, color, style)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_sequences() {
        assert_eq!(colorize("Test", Color::Cyan, Style::Normal), "\x1b[0;36mTest\x1b[0m");
        assert_eq!(colorize("Test", Color::Blue, Style::Normal), "\x1b[0;34mTest\x1b[0m");
        assert_eq!(colorize("Test", Color::Cyan, Style::Bold), "\x1b[1;36mTest\x1b[0m");
    }

    #[test]
    fn test_default_style_is_bold() {
        assert_eq!(
            colorize("x", Color::Red, Style::default()),
            colorize("x", Color::Red, Style::Bold)
        );
    }

    #[test]
    fn test_paint_disabled() {
        assert_eq!(paint("plain", Color::Green, Style::Bold, false), "plain");
        assert_eq!(
            paint("plain", Color::Green, Style::Bold, true),
            "\x1b[1;32mplain\x1b[0m"
        );
    }
}
