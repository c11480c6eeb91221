//! Display formatting for the long listing in ie.
//!
//! Turns the probed attributes of an [Entry] into the column strings of a listing row:
//! mode string, size, modification time. Entries whose probe failed format as `?`.

use crate::core::fm::{Entry, EntryKind};

use chrono::{DateTime, Duration, Local};
use humansize::{DECIMAL, format_size};
use unicode_width::UnicodeWidthChar;

use std::time::SystemTime;

// Older than this shows the year instead of the clock time
const RECENT_DAYS: i64 = 180;

/// Formats the kind and permission bits in `ls -l` style, e.g. `drwxr-sr-x`.
///
/// Setuid, setgid and sticky bits replace the matching execute slot with `s`/`S` or `t`/`T`.
pub fn format_mode(entry: &Entry) -> String {
    let (Some(kind), Some(mode)) = (entry.kind(), entry.mode()) else {
        return "??????????".into();
    };

    let first = match kind {
        EntryKind::Directory => 'd',
        EntryKind::Symlink => 'l',
        EntryKind::BlockDevice => 'b',
        EntryKind::CharDevice => 'c',
        EntryKind::Fifo => 'p',
        EntryKind::Socket => 's',
        EntryKind::File | EntryKind::Other => '-',
    };

    let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }

    let special = [(0o4000, 3, 's', 'S'), (0o2000, 6, 's', 'S'), (0o1000, 9, 't', 'T')];
    for (bit, slot, with_exec, without_exec) in special {
        if mode & bit != 0 {
            chars[slot] = if chars[slot] == 'x' {
                with_exec
            } else {
                without_exec
            };
        }
    }

    chars.iter().collect()
}

/// Formats the entry size into a human-readable string, `?` when unknown.
pub fn format_file_size(entry: &Entry) -> String {
    if entry.stat_failed() {
        "?".into()
    } else {
        format_size(entry.size(), DECIMAL)
    }
}

/// Formats a modification time relative to the current local time.
pub fn format_file_time(modified: Option<SystemTime>) -> String {
    format_file_time_at(modified, Local::now())
}

/// Recent times show the clock (`Mar 04 13:37`), anything older than half a year or in
/// the future shows the year (`Mar 04  2021`).
pub fn format_file_time_at(modified: Option<SystemTime>, now: DateTime<Local>) -> String {
    let Some(mtime) = modified else {
        return "????-??-?? ??:??".into();
    };
    let dt: DateTime<Local> = DateTime::from(mtime);
    if now - dt > Duration::days(RECENT_DAYS) || dt > now {
        dt.format("%b %d  %Y").to_string()
    } else {
        dt.format("%b %d %H:%M").to_string()
    }
}

/// Replaces control characters so names cannot move the terminal cursor.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '\t' {
                ' '
            } else if c.is_control() {
                '?'
            } else {
                c
            }
        })
        .collect()
}

/// Display width of a (sanitized) name in terminal cells.
pub fn display_width(name: &str) -> usize {
    name.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fm::EntryMeta;
    use chrono::TimeZone;

    fn entry(kind: EntryKind, mode: u32) -> Entry {
        Entry::new("x", Some(EntryMeta::new(kind, mode, 0)))
    }

    #[test]
    fn mode_string_basic() {
        assert_eq!(format_mode(&entry(EntryKind::Directory, 0o755)), "drwxr-xr-x");
        assert_eq!(format_mode(&entry(EntryKind::File, 0o640)), "-rw-r-----");
        assert_eq!(format_mode(&entry(EntryKind::Symlink, 0o777)), "lrwxrwxrwx");
    }

    #[test]
    fn mode_string_special_bits() {
        assert_eq!(format_mode(&entry(EntryKind::File, 0o4755)), "-rwsr-xr-x");
        assert_eq!(format_mode(&entry(EntryKind::File, 0o2644)), "-rw-r-Sr--");
        assert_eq!(format_mode(&entry(EntryKind::Directory, 0o1777)), "drwxrwxrwt");
        assert_eq!(format_mode(&entry(EntryKind::Directory, 0o1776)), "drwxrwxrwT");
    }

    #[test]
    fn failed_probe_formats_as_unknown() {
        let ghost = Entry::new("ghost", None);
        assert_eq!(format_mode(&ghost), "??????????");
        assert_eq!(format_file_size(&ghost), "?");
    }

    #[test]
    fn time_switches_to_year_for_old_files() -> Result<(), Box<dyn std::error::Error>> {
        let now = Local
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .ok_or("ambiguous time")?;
        let recent = now - Duration::days(3);
        let old = now - Duration::days(400);

        let recent_str = format_file_time_at(Some(SystemTime::from(recent)), now);
        let old_str = format_file_time_at(Some(SystemTime::from(old)), now);

        assert!(recent_str.contains(':'), "recent: {recent_str}");
        assert!(old_str.ends_with("2023"), "old: {old_str}");
        Ok(())
    }

    #[test]
    fn sanitize_strips_control_chars() {
        assert_eq!(sanitize_name("a\tb\x1bc"), "a b?c");
        assert_eq!(display_width("🦀.rs"), 5);
    }
}
