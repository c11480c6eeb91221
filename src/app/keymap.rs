//! Key mapping and action dispatch system for ie
//!
//! Turns the `[keys]` config into lookup tables and recognises two-key prefix sequences
//! (`C-x` followed by a second key) with a small explicit state machine.

use crate::config::Config;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};

/// Any action reachable from a single key in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    File(FileAction),
    System(SystemAction),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    GoUp,
    GoDown,
    GoToTop,
    GoToBottom,
    ToggleMarker,
    Mark,
    Unmark,
    Search,
    SearchNext,
    SearchPrev,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    Open,
    Delete,
    Rename,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    Quit,
}

/// Commands reachable as the second key of a prefix sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixCommand {
    OpenParent,
    NewBuffer,
    ChooseBuffer,
    Rename,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    fn from_event(key: &KeyEvent) -> Self {
        Key {
            code: key.code,
            modifiers: key.modifiers,
        }
    }

    /// The same key without SHIFT, which terminals report for uppercase letters.
    fn unshifted(self) -> Option<Self> {
        (matches!(self.code, KeyCode::Char(_)) && self.modifiers.contains(KeyModifiers::SHIFT))
            .then(|| Key {
                code: self.code,
                modifiers: self.modifiers - KeyModifiers::SHIFT,
            })
    }
}

/// Lookup tables built from the config.
#[derive(Debug)]
pub struct Keymap {
    map: HashMap<Key, Action>,
    prefix: HashSet<Key>,
    second: HashMap<Key, PrefixCommand>,
}

impl Keymap {
    /// Builds the keymap from the config
    #[rustfmt::skip]
    pub fn from_config(config: &Config) -> Self {
        let mut map = HashMap::new();
        let mut second = HashMap::new();
        let keys = config.keys();

        use NavAction as N;
        use FileAction as F;
        use SystemAction as S;

        bind(keys.go_up(),          Action::Nav(N::GoUp),           &mut map);
        bind(keys.go_down(),        Action::Nav(N::GoDown),         &mut map);
        bind(keys.go_to_top(),      Action::Nav(N::GoToTop),        &mut map);
        bind(keys.go_to_bottom(),   Action::Nav(N::GoToBottom),     &mut map);
        bind(keys.toggle_marker(),  Action::Nav(N::ToggleMarker),   &mut map);
        bind(keys.mark(),           Action::Nav(N::Mark),           &mut map);
        bind(keys.unmark(),         Action::Nav(N::Unmark),         &mut map);
        bind(keys.search(),         Action::Nav(N::Search),         &mut map);
        bind(keys.search_next(),    Action::Nav(N::SearchNext),     &mut map);
        bind(keys.search_prev(),    Action::Nav(N::SearchPrev),     &mut map);

        bind(keys.open(),           Action::File(F::Open),          &mut map);
        bind(keys.delete(),         Action::File(F::Delete),        &mut map);
        bind(keys.rename(),         Action::File(F::Rename),        &mut map);

        bind(keys.quit(),           Action::System(S::Quit),        &mut map);

        bind(keys.prefix_parent(),          PrefixCommand::OpenParent,   &mut second);
        bind(keys.prefix_new_buffer(),      PrefixCommand::NewBuffer,    &mut second);
        bind(keys.prefix_choose_buffer(),   PrefixCommand::ChooseBuffer, &mut second);
        bind(keys.prefix_rename(),          PrefixCommand::Rename,       &mut second);

        let prefix = keys.prefix().iter().filter_map(|k| parse_key(k)).collect();

        Keymap { map, prefix, second }
    }

    /// Looks up the action for a given key event
    pub fn lookup(&self, key: &KeyEvent) -> Option<Action> {
        lookup_in(&self.map, Key::from_event(key))
    }

    pub fn is_prefix(&self, key: &KeyEvent) -> bool {
        let k = Key::from_event(key);
        self.prefix.contains(&k) || k.unshifted().is_some_and(|k| self.prefix.contains(&k))
    }

    pub fn lookup_second(&self, key: &KeyEvent) -> Option<PrefixCommand> {
        lookup_in(&self.second, Key::from_event(key))
    }
}

fn lookup_in<T: Copy>(map: &HashMap<Key, T>, key: Key) -> Option<T> {
    map.get(&key)
        .or_else(|| key.unshifted().and_then(|k| map.get(&k)))
        .copied()
}

fn bind<T: Copy>(key_list: &[String], value: T, map: &mut HashMap<Key, T>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, value);
            }
            None => tracing::warn!(key = %k, "ignoring unparsable key binding"),
        }
    }
}

/// Outcome of feeding one key to a [KeyPrefix].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixOutcome {
    /// Not part of a sequence; handle the key normally.
    Pass,
    /// The prefix key was pressed; waiting for the second key.
    Started,
    /// A complete, known sequence.
    Command(PrefixCommand),
    /// Esc after the prefix.
    Cancelled,
    /// A second key with no binding.
    Unknown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum PrefixState {
    #[default]
    Idle,
    AwaitingSecondKey,
}

/// Recogniser for two-key sequences: `Idle -> AwaitingSecondKey -> Idle`.
#[derive(Debug, Default)]
pub struct KeyPrefix {
    state: PrefixState,
}

impl KeyPrefix {
    pub fn feed(&mut self, key: &KeyEvent, keymap: &Keymap) -> PrefixOutcome {
        match self.state {
            PrefixState::Idle => {
                if keymap.is_prefix(key) {
                    self.state = PrefixState::AwaitingSecondKey;
                    PrefixOutcome::Started
                } else {
                    PrefixOutcome::Pass
                }
            }
            PrefixState::AwaitingSecondKey => {
                self.state = PrefixState::Idle;
                if key.code == KeyCode::Esc {
                    return PrefixOutcome::Cancelled;
                }
                keymap
                    .lookup_second(key)
                    .map_or(PrefixOutcome::Unknown, PrefixOutcome::Command)
            }
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == PrefixState::AwaitingSecondKey
    }
}

/// Parses a key description: `j`, `G`, `Enter`, `Space`, `F5`, `<c-x>`, `ctrl+x`, `Shift+n`.
pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;

    let body = match s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        Some(inner) if inner.len() > 1 && inner.contains('-') => {
            let (mods, last) = inner.rsplit_once('-')?;
            for m in mods.split('-') {
                modifiers |= parse_modifier(m)?;
            }
            last
        }
        Some(inner) => inner,
        None => s,
    };

    // A lone "+" or "-" is the key itself, otherwise "+" joins modifiers and key.
    let (mods, last) = match body.rsplit_once('+') {
        Some((mods, last)) if !last.is_empty() => (Some(mods), last),
        _ => (None, body),
    };
    if let Some(mods) = mods {
        for m in mods.split('+') {
            modifiers |= parse_modifier(m)?;
        }
    }

    let lower = last.to_lowercase();
    let code = match lower.as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" | "cr" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" | "back" | "bs" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "space" | "spc" => KeyCode::Char(' '),
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = last.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    let c = if modifiers.contains(KeyModifiers::SHIFT) {
                        modifiers -= KeyModifiers::SHIFT;
                        c.to_ascii_uppercase()
                    } else if modifiers.contains(KeyModifiers::CONTROL) {
                        c.to_ascii_lowercase()
                    } else {
                        c
                    };
                    KeyCode::Char(c)
                }
                _ => {
                    let n = lower.strip_prefix('f')?.parse().ok()?;
                    KeyCode::F(n)
                }
            }
        }
    };

    Some(Key { code, modifiers })
}

fn parse_modifier(s: &str) -> Option<KeyModifiers> {
    match s.to_lowercase().as_str() {
        "c" | "ctrl" | "control" => Some(KeyModifiers::CONTROL),
        "a" | "m" | "alt" | "meta" => Some(KeyModifiers::ALT),
        "s" | "shift" => Some(KeyModifiers::SHIFT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_key_syntaxes() {
        let ctrl_x = Some(Key {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert_eq!(parse_key("<c-x>"), ctrl_x);
        assert_eq!(parse_key("ctrl+x"), ctrl_x);
        assert_eq!(parse_key("Ctrl+X"), ctrl_x);
        assert_eq!(parse_key("Enter").map(|k| k.code), Some(KeyCode::Enter));
        assert_eq!(parse_key("Space").map(|k| k.code), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("Shift+n").map(|k| k.code), Some(KeyCode::Char('N')));
        assert_eq!(parse_key("/").map(|k| k.code), Some(KeyCode::Char('/')));
        assert_eq!(parse_key("-").map(|k| k.code), Some(KeyCode::Char('-')));
        assert_eq!(parse_key("+").map(|k| k.code), Some(KeyCode::Char('+')));
        assert_eq!(parse_key("F5").map(|k| k.code), Some(KeyCode::F(5)));
        assert_eq!(parse_key("<x-y>"), None);
        assert_eq!(parse_key("bogus"), None);
    }

    #[test]
    fn uppercase_matches_with_or_without_shift() {
        let keymap = Keymap::from_config(&Config::default());
        let with_shift = ev(KeyCode::Char('N'), KeyModifiers::SHIFT);
        let without = ev(KeyCode::Char('N'), KeyModifiers::NONE);
        let expected = Some(Action::Nav(NavAction::SearchPrev));
        assert_eq!(keymap.lookup(&with_shift), expected);
        assert_eq!(keymap.lookup(&without), expected);
    }

    #[test]
    fn default_bindings() {
        let keymap = Keymap::from_config(&Config::default());
        assert_eq!(
            keymap.lookup(&ev(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::Nav(NavAction::GoDown))
        );
        assert_eq!(
            keymap.lookup(&ev(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::File(FileAction::Open))
        );
        assert_eq!(keymap.lookup(&ev(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn prefix_sequence_round_trip() {
        let keymap = Keymap::from_config(&Config::default());
        let mut prefix = KeyPrefix::default();
        let ctrl_x = ev(KeyCode::Char('x'), KeyModifiers::CONTROL);

        assert_eq!(prefix.feed(&ev(KeyCode::Char('j'), KeyModifiers::NONE), &keymap), PrefixOutcome::Pass);
        assert_eq!(prefix.feed(&ctrl_x, &keymap), PrefixOutcome::Started);
        assert!(prefix.is_pending());
        assert_eq!(
            prefix.feed(&ev(KeyCode::Char('b'), KeyModifiers::NONE), &keymap),
            PrefixOutcome::Command(PrefixCommand::ChooseBuffer)
        );
        assert!(!prefix.is_pending());

        prefix.feed(&ctrl_x, &keymap);
        assert_eq!(
            prefix.feed(&ev(KeyCode::Char('q'), KeyModifiers::CONTROL), &keymap),
            PrefixOutcome::Command(PrefixCommand::Rename)
        );
    }

    #[test]
    fn prefix_unknown_and_cancel_return_to_idle() {
        let keymap = Keymap::from_config(&Config::default());
        let mut prefix = KeyPrefix::default();
        let ctrl_x = ev(KeyCode::Char('x'), KeyModifiers::CONTROL);

        prefix.feed(&ctrl_x, &keymap);
        assert_eq!(prefix.feed(&ev(KeyCode::Char('z'), KeyModifiers::NONE), &keymap), PrefixOutcome::Unknown);
        assert!(!prefix.is_pending());

        prefix.feed(&ctrl_x, &keymap);
        assert_eq!(prefix.feed(&ev(KeyCode::Esc, KeyModifiers::NONE), &keymap), PrefixOutcome::Cancelled);
        assert!(!prefix.is_pending());
    }
}
