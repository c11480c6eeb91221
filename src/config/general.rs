//! The general configuration settings for ie.
//!
//! [General] is deserialized from the `[general]` table of ie.toml and converted into
//! [InternalGeneral], which hands out ready-to-use durations.

use serde::Deserialize;

use std::time::Duration;

const DEFAULT_MESSAGE_MS: u64 = 3000;
const DEFAULT_UNKNOWN_SEQUENCE_MS: u64 = 400;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    confirm_default: bool,
    message_ms: u64,
    unknown_sequence_ms: u64,
}

impl Default for General {
    fn default() -> Self {
        General {
            confirm_default: true,
            message_ms: DEFAULT_MESSAGE_MS,
            unknown_sequence_ms: DEFAULT_UNKNOWN_SEQUENCE_MS,
        }
    }
}

#[derive(Debug)]
pub struct InternalGeneral {
    confirm_default: bool,
    message_duration: Duration,
    unknown_sequence_duration: Duration,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            confirm_default: g.confirm_default,
            message_duration: Duration::from_millis(g.message_ms.max(1)),
            unknown_sequence_duration: Duration::from_millis(g.unknown_sequence_ms.max(1)),
        }
    }
}

impl InternalGeneral {
    /// Answer taken when a yes/no prompt is confirmed with Enter.
    #[inline]
    pub fn confirm_default(&self) -> bool {
        self.confirm_default
    }

    /// How long a status message stays on screen.
    #[inline]
    pub fn message_duration(&self) -> Duration {
        self.message_duration
    }

    #[inline]
    pub fn unknown_sequence_duration(&self) -> Duration {
        self.unknown_sequence_duration
    }
}

impl Default for InternalGeneral {
    fn default() -> Self {
        General::default().into()
    }
}
