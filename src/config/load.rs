//! The main config loading module for ie.
//!
//! Reads `ie.toml` into [RawConfig] and converts it into the [Config] used at runtime.
//! Also writes the default config file for `ie --init`.

use crate::config::{Display, General, InternalGeneral, Keys, Theme};

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Configuration exactly as written in the toml file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    display: Display,
    theme: Theme,
    keys: Keys,
}

/// Processed configuration used by the session and the renderer.
#[derive(Debug, Default)]
pub struct Config {
    general: InternalGeneral,
    display: Display,
    theme: Theme,
    keys: Keys,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            display: raw.display,
            theme: raw.theme,
            keys: raw.keys,
        }
    }
}

impl Config {
    /// Loads the config from [Config::default_path].
    ///
    /// A missing file silently gives the defaults; an unreadable or invalid one is
    /// reported on stderr and also gives the defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "config loaded");
                    config
                }
                Err(e) => {
                    eprintln!("Error parsing config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Location of the config file.
    ///
    /// `IE_CONFIG` wins, then `$XDG_CONFIG_HOME/ie/ie.toml`, then `~/.config/ie/ie.toml`.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("IE_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("ie/ie.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/ie/ie.toml");
        }
        PathBuf::from("ie.toml")
    }

    /// Writes the commented default config to `path`. Refuses to overwrite.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {}", path.display());
        Ok(())
    }
}

const DEFAULT_TOML: &str = r##"# ie.toml - configuration for ie
#
# Commented values are the internal defaults.
# Colours are terminal names ("cyan") or hex codes ("#RRGGBB").

[general]
# Answer used when a yes/no prompt is confirmed with Enter
# confirm_default = true
# How long status messages stay visible
# message_ms = 3000
# How long "Unknown Sequence" is shown after a bad prefix sequence
# unknown_sequence_ms = 400

[display]
# links = true
# owner = true
# group = true
# ghost_path = true
# symlink_target = true
# border_shape = "square"     # "square", "rounded", "double" or "thick"

# [theme.header]
# fg = "yellow"
# bg = "default"

# [theme.path]
# fg = "blue"

# [theme.directory]
# fg = "cyan"

# [theme.executable]
# fg = "green"

# [theme.dot_entry]
# fg = "darkgray"

# [theme.symlink]
# fg = "lightcyan"

# [theme.marker]
# fg = "magenta"

# [theme.selection]
# bg = "default"              # unset background means reverse video

# [theme.error]
# fg = "red"

# [theme.widget]
# border.fg = "cyan"
# title.fg = "cyan"

# [keys]
# go_up = ["k", "Up", "<c-p>"]
# go_down = ["j", "Down", "<c-n>"]
# go_to_top = ["g"]
# go_to_bottom = ["G"]
# open = ["Enter"]
# delete = ["d"]
# rename = ["r"]
# mark = ["m"]
# unmark = ["u"]
# toggle_marker = ["Space"]
# search = ["/"]
# search_next = ["n"]
# search_prev = ["N"]
# quit = ["q"]

# Two-key sequences: prefix, then one of the prefix_* keys
# prefix = ["<c-x>"]
# prefix_parent = ["Enter"]
# prefix_new_buffer = ["c"]
# prefix_choose_buffer = ["b"]
# prefix_rename = ["<c-q>"]
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() -> Result<(), Box<dyn Error>> {
        let config = Config::parse("")?;
        assert!(config.general().confirm_default());
        assert_eq!(config.keys().quit(), ["q"]);
        Ok(())
    }

    #[test]
    fn sections_override_defaults() -> Result<(), Box<dyn Error>> {
        let config = Config::parse(
            "[general]\nconfirm_default = false\nmessage_ms = 50\n[keys]\nquit = [\"Q\", \"<c-c>\"]",
        )?;
        assert!(!config.general().confirm_default());
        assert_eq!(config.general().message_duration().as_millis(), 50);
        assert_eq!(config.keys().quit(), ["Q", "<c-c>"]);
        assert_eq!(config.keys().delete(), ["d"]);
        Ok(())
    }

    #[test]
    fn invalid_file_falls_back() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("ie.toml");
        fs::write(&path, "[general\nbroken")?;
        let config = Config::load_from(&path);
        assert_eq!(config.keys().search(), ["/"]);
        Ok(())
    }

    #[test]
    fn generated_default_parses_and_is_not_overwritten() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("nested/ie.toml");
        Config::generate_default(&path)?;
        Config::parse(&fs::read_to_string(&path)?)?;

        let again = Config::generate_default(&path);
        assert!(matches!(again, Err(e) if e.kind() == io::ErrorKind::AlreadyExists));
        Ok(())
    }
}
