//! Helpers for ie.
//!
//! - Color parsing from names or hex codes, used by the theme tables.
//! - Displaying home directories as "~" in buffer labels.

use ratatui::style::Color;
use std::path::{MAIN_SEPARATOR, Path};

/// Parses a color name or hex code into a [Color].
///
/// Accepts the basic terminal names (`red`, `darkgray`, ...), `default`/`reset`, and
/// `#RRGGBB` or `#RGB`. Anything else falls back to [Color::Reset].
pub fn parse_color(s: &str) -> Color {
    match s.trim().to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "pink" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        other => other
            .strip_prefix('#')
            .and_then(parse_hex)
            .unwrap_or(Color::Reset),
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expanded: String = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let rgb = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Color::Rgb(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    ))
}

/// Shortens the home directory prefix of `path` to `~`.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_and_hex() {
        assert_eq!(parse_color("Red"), Color::Red);
        assert_eq!(parse_color(" darkgray "), Color::DarkGray);
        assert_eq!(parse_color("default"), Color::Reset);
        assert_eq!(parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("#0f0"), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn bad_colors_fall_back_to_reset() {
        assert_eq!(parse_color("chartreuse"), Color::Reset);
        assert_eq!(parse_color("#12345"), Color::Reset);
        assert_eq!(parse_color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn paths_outside_home_are_untouched() {
        assert_eq!(shorten_home_path("/definitely/not/home"), "/definitely/not/home");
    }

    #[test]
    fn home_itself_becomes_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(shorten_home_path(&home), "~");
            let below = home.join("src");
            assert_eq!(shorten_home_path(below), format!("~{MAIN_SEPARATOR}src"));
        }
    }
}
