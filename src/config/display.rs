//! Display configuration options for ie
//!
//! Controls which columns the long listing shows and how popups are framed.

use ratatui::widgets::BorderType;
use serde::Deserialize;

/// Display configuration options, read from the `[display]` table.
///
/// ```toml
/// [display]
/// owner = true
/// group = false
/// ghost_path = true
/// border_shape = "rounded"
/// ```
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Display {
    links: bool,
    owner: bool,
    group: bool,
    ghost_path: bool,
    symlink_target: bool,
    border_shape: BorderShape,
}

impl Display {
    pub fn links(&self) -> bool {
        self.links
    }

    pub fn owner(&self) -> bool {
        self.owner
    }

    pub fn group(&self) -> bool {
        self.group
    }

    /// Whether the selected row carries its absolute path after the name.
    pub fn ghost_path(&self) -> bool {
        self.ghost_path
    }

    pub fn symlink_target(&self) -> bool {
        self.symlink_target
    }

    pub fn border_shape(&self) -> &BorderShape {
        &self.border_shape
    }
}

impl Default for Display {
    fn default() -> Self {
        Display {
            links: true,
            owner: true,
            group: true,
            ghost_path: true,
            symlink_target: true,
            border_shape: BorderShape::Square,
        }
    }
}

/// Border shape of popups
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BorderShape {
    Square,
    Rounded,
    Double,
    Thick,
}

impl BorderShape {
    pub fn as_border_type(&self) -> BorderType {
        match self {
            BorderShape::Square => BorderType::Plain,
            BorderShape::Rounded => BorderType::Rounded,
            BorderShape::Double => BorderType::Double,
            BorderShape::Thick => BorderType::Thick,
        }
    }
}
