// Prompt colors

use crossterm::style::{style, Color, Stylize};
use tracing::warn;

/// Foreground colors for each input context. `None` leaves text uncolored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    pub regular: Option<Color>,
    pub continuation: Option<Color>,
    pub function: Option<Color>,
    pub global: Option<Color>,
}

/// Map a config color name to a terminal color.
///
/// `none` and unknown names both give `None`; unknown names are logged.
pub fn color_by_name(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::DarkRed),
        "green" => Some(Color::DarkGreen),
        "brown" => Some(Color::DarkYellow),
        "blue" => Some(Color::DarkBlue),
        "purple" => Some(Color::DarkMagenta),
        "cyan" => Some(Color::DarkCyan),
        "lightgray" => Some(Color::Grey),
        "darkgray" => Some(Color::DarkGrey),
        "lightred" => Some(Color::Red),
        "lightgreen" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "lightblue" => Some(Color::Blue),
        "lightpurple" => Some(Color::Magenta),
        "lightcyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "none" | "" => None,
        other => {
            warn!(color = other, "unknown color name, leaving text uncolored");
            None
        }
    }
}

/// Wrap `text` in the escape codes for `color`
pub fn paint(text: &str, color: Option<Color>) -> String {
    match color {
        Some(color) => style(text).with(color).to_string(),
        None => text.to_string(),
    }
}

/// Prompt label padded to a fixed width and colored
pub fn prompt(label: &str, color: Option<Color>) -> String {
    paint(&format!("{:<5}", label), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names() {
        assert_eq!(color_by_name("lightblue"), Some(Color::Blue));
        assert_eq!(color_by_name("Brown"), Some(Color::DarkYellow));
        assert_eq!(color_by_name("none"), None);
        assert_eq!(color_by_name("chartreuse"), None);
    }

    #[test]
    fn test_prompt_is_padded() {
        assert_eq!(prompt(">>", None), ">>   ");
        assert_eq!(prompt("longer>", None), "longer>");
    }

    #[test]
    fn test_paint_keeps_text() {
        assert!(paint("hello", Some(Color::Red)).contains("hello"));
        assert_eq!(paint("hello", None), "hello");
    }
}
