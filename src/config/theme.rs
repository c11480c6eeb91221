//! Theme configuration options for ie
//!
//! Colours for every class of listing row and for the header, status line and popups.
//! Unset colours fall back to the internal defaults.

use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use std::sync::LazyLock;

/// Theme configuration options
///
/// ```toml
/// [theme.directory]
/// fg = "cyan"
/// [theme.selection]
/// bg = "#303030"
/// ```
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Theme {
    header: ColorPair,
    path: ColorPair,
    entry: ColorPair,
    directory: ColorPair,
    executable: ColorPair,
    dot_entry: ColorPair,
    symlink: ColorPair,
    ghost: ColorPair,
    marker: ColorPair,
    selection: ColorPair,
    status: ColorPair,
    error: ColorPair,
    widget: WidgetTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header: ColorPair {
                fg: Color::Yellow,
                ..ColorPair::default()
            },
            path: ColorPair {
                fg: Color::Blue,
                ..ColorPair::default()
            },
            entry: ColorPair::default(),
            directory: ColorPair {
                fg: Color::Cyan,
                ..ColorPair::default()
            },
            executable: ColorPair {
                fg: Color::Green,
                ..ColorPair::default()
            },
            dot_entry: ColorPair {
                fg: Color::DarkGray,
                ..ColorPair::default()
            },
            symlink: ColorPair {
                fg: Color::LightCyan,
                ..ColorPair::default()
            },
            ghost: ColorPair {
                fg: Color::DarkGray,
                ..ColorPair::default()
            },
            marker: ColorPair {
                fg: Color::Magenta,
                ..ColorPair::default()
            },
            selection: ColorPair::default(),
            status: ColorPair::default(),
            error: ColorPair {
                fg: Color::Red,
                ..ColorPair::default()
            },
            widget: WidgetTheme::default(),
        }
    }
}

impl Theme {
    /// Internal default theme, used for fallback when a colour is left at Reset.
    pub fn internal_defaults() -> &'static Self {
        static DEFAULT: LazyLock<Theme> = LazyLock::new(Theme::default);
        &DEFAULT
    }

    pub fn header_style(&self) -> Style {
        self.header
            .style_or(&Theme::internal_defaults().header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn path_style(&self) -> Style {
        self.path.style_or(&Theme::internal_defaults().path)
    }

    pub fn entry_style(&self) -> Style {
        self.entry.style_or(&Theme::internal_defaults().entry)
    }

    pub fn directory_style(&self) -> Style {
        self.directory
            .style_or(&Theme::internal_defaults().directory)
            .add_modifier(Modifier::BOLD)
    }

    pub fn executable_style(&self) -> Style {
        self.executable
            .style_or(&Theme::internal_defaults().executable)
    }

    pub fn dot_entry_style(&self) -> Style {
        self.dot_entry
            .style_or(&Theme::internal_defaults().dot_entry)
    }

    pub fn symlink_style(&self) -> Style {
        self.symlink.style_or(&Theme::internal_defaults().symlink)
    }

    pub fn ghost_style(&self) -> Style {
        self.ghost
            .style_or(&Theme::internal_defaults().ghost)
            .add_modifier(Modifier::DIM)
    }

    pub fn marker_style(&self) -> Style {
        self.marker.style_or(&Theme::internal_defaults().marker)
    }

    /// Style patched over the selected row. Reverse video unless a background is set.
    pub fn selection_style(&self) -> Style {
        let style = self
            .selection
            .style_or(&Theme::internal_defaults().selection);
        if self.selection.bg == Color::Reset {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    pub fn status_style(&self) -> Style {
        self.status.style_or(&Theme::internal_defaults().status)
    }

    pub fn error_style(&self) -> Style {
        self.error
            .style_or(&Theme::internal_defaults().error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn widget(&self) -> &WidgetTheme {
        &self.widget
    }
}

/// Foreground and background colour of one style class.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    #[serde(default, deserialize_with = "deserialize_color_field")]
    fg: Color,
    #[serde(default, deserialize_with = "deserialize_color_field")]
    bg: Color,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl ColorPair {
    /// Replaces Reset colours with those of `other`.
    pub fn resolve(&self, other: &ColorPair) -> Self {
        let pick = |own: Color, fallback: Color| {
            if own == Color::Reset { fallback } else { own }
        };
        Self {
            fg: pick(self.fg, other.fg),
            bg: pick(self.bg, other.bg),
        }
    }

    pub fn style_or(&self, fallback: &ColorPair) -> Style {
        let resolved = self.resolve(fallback);
        Style::default().fg(resolved.fg).bg(resolved.bg)
    }
}

/// Colours of popups: the delete confirmation, buffer chooser, viewer and prompts.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WidgetTheme {
    color: ColorPair,
    border: ColorPair,
    title: ColorPair,
}

impl Default for WidgetTheme {
    fn default() -> Self {
        Self {
            color: ColorPair::default(),
            border: ColorPair {
                fg: Color::Cyan,
                ..ColorPair::default()
            },
            title: ColorPair {
                fg: Color::Cyan,
                ..ColorPair::default()
            },
        }
    }
}

impl WidgetTheme {
    fn defaults() -> &'static WidgetTheme {
        &Theme::internal_defaults().widget
    }

    pub fn style(&self) -> Style {
        self.color.style_or(&Self::defaults().color)
    }

    pub fn border_style(&self) -> Style {
        self.border.style_or(&Self::defaults().border)
    }

    pub fn title_style(&self) -> Style {
        self.title
            .style_or(&Self::defaults().title)
            .add_modifier(Modifier::BOLD)
    }
}

fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}
