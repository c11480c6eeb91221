//! Directory snapshots for ie.
//!
//! Provides the [Entry] struct which is used throughout ie and the [snapshot] function
//! which turns a directory path into the ordered listing a buffer shows.
//!
//! A listing always starts with the self-reference (`.`) and the parent-reference (`..`),
//! followed by every other name in byte-wise order.

use crate::error::{IeError, Result};

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
#[cfg(unix)]
use std::ffi::CStr;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const SELF_REF: &str = ".";
pub const PARENT_REF: &str = "..";

/// File type of a probed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    BlockDevice,
    CharDevice,
    Fifo,
    Socket,
    Other,
}

/// Metadata gathered by a successful probe.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMeta {
    kind: EntryKind,
    mode: u32,
    links: u64,
    owner: String,
    group: String,
    size: u64,
    modified: Option<SystemTime>,
}

impl EntryMeta {
    pub fn new(kind: EntryKind, mode: u32, size: u64) -> Self {
        Self {
            kind,
            mode,
            links: 1,
            owner: "?".into(),
            group: "?".into(),
            size,
            modified: None,
        }
    }

    fn from_metadata(md: &Metadata, ids: &mut IdNames) -> Self {
        let ft = md.file_type();
        let kind = if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            special_kind(&ft)
        };

        #[cfg(unix)]
        let (mode, links, owner, group) = {
            use std::os::unix::fs::MetadataExt;
            (
                md.mode(),
                md.nlink(),
                ids.user(md.uid()),
                ids.group(md.gid()),
            )
        };

        #[cfg(not(unix))]
        let (mode, links, owner, group) = {
            let _ = ids;
            let mode = if md.permissions().readonly() { 0o444 } else { 0o644 };
            (mode, 1, "?".to_string(), "?".to_string())
        };

        Self {
            kind,
            mode,
            links,
            owner,
            group,
            size: md.len(),
            modified: md.modified().ok(),
        }
    }
}

#[cfg(unix)]
fn special_kind(ft: &fs::FileType) -> EntryKind {
    use std::os::unix::fs::FileTypeExt;
    if ft.is_block_device() {
        EntryKind::BlockDevice
    } else if ft.is_char_device() {
        EntryKind::CharDevice
    } else if ft.is_fifo() {
        EntryKind::Fifo
    } else if ft.is_socket() {
        EntryKind::Socket
    } else {
        EntryKind::Other
    }
}

#[cfg(not(unix))]
fn special_kind(_ft: &fs::FileType) -> EntryKind {
    EntryKind::Other
}

/// Represents a single entry in a directory listing.
///
/// Holds the bare name and, when the metadata probe succeeded, the probed attributes.
/// An entry whose probe failed is still listed; its accessors then return the
/// "unknown" sentinels (`"?"`, zero, no time).
#[derive(Debug, Clone)]
pub struct Entry {
    name: Box<OsStr>,
    meta: Option<EntryMeta>,
}

impl Entry {
    /// Used to test the execute bits of owner, group and other.
    pub const EXEC_FLAG: u32 = 0o111;

    pub fn new(name: impl Into<OsString>, meta: Option<EntryMeta>) -> Self {
        Entry {
            name: name.into().into_boxed_os_str(),
            meta,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn meta(&self) -> Option<&EntryMeta> {
        self.meta.as_ref()
    }

    #[inline]
    pub fn stat_failed(&self) -> bool {
        self.meta.is_none()
    }

    /// True for `.` and `..`, which are never deleted, marked or renamed.
    #[inline]
    pub fn is_dot_ref(&self) -> bool {
        is_dot_ref(&self.name)
    }

    pub fn kind(&self) -> Option<EntryKind> {
        self.meta.as_ref().map(|m| m.kind)
    }

    pub fn mode(&self) -> Option<u32> {
        self.meta.as_ref().map(|m| m.mode)
    }

    pub fn links(&self) -> u64 {
        self.meta.as_ref().map_or(0, |m| m.links)
    }

    pub fn owner(&self) -> &str {
        self.meta.as_ref().map_or("?", |m| m.owner.as_str())
    }

    pub fn group(&self) -> &str {
        self.meta.as_ref().map_or("?", |m| m.group.as_str())
    }

    pub fn size(&self) -> u64 {
        self.meta.as_ref().map_or(0, |m| m.size)
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.meta.as_ref().and_then(|m| m.modified)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind() == Some(EntryKind::Directory)
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.kind() == Some(EntryKind::Symlink)
    }

    /// Any of the owner/group/other execute bits is set.
    #[inline]
    pub fn is_executable(&self) -> bool {
        self.mode().is_some_and(|m| m & Self::EXEC_FLAG != 0)
    }

    /// Reads the link target of a symlink entry living in `dir`.
    ///
    /// Resolved on demand by the renderer rather than stored in the snapshot.
    pub fn link_target(&self, dir: &Path) -> Option<PathBuf> {
        if !self.is_symlink() {
            return None;
        }
        fs::read_link(dir.join(&*self.name)).ok()
    }
}

pub fn is_dot_ref(name: &OsStr) -> bool {
    name == SELF_REF || name == PARENT_REF
}

/// Ordering of a listing: `.` first, `..` second, then byte-wise.
pub fn compare_names(a: &OsStr, b: &OsStr) -> Ordering {
    fn rank(name: &OsStr) -> u8 {
        if name == SELF_REF {
            0
        } else if name == PARENT_REF {
            1
        } else {
            2
        }
    }

    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.as_encoded_bytes().cmp(b.as_encoded_bytes()))
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| compare_names(a.name(), b.name()));
}

/// Reads the directory at `path` and returns its ordered listing.
///
/// Every name is probed without following symlinks. A failed probe keeps the entry with
/// sentinel metadata; only a failure to enumerate the directory itself is an error.
pub fn snapshot(path: &Path) -> Result<Vec<Entry>> {
    let read = fs::read_dir(path).map_err(|source| IeError::ListDir {
        path: path.to_path_buf(),
        source,
    })?;

    let mut names: Vec<OsString> = vec![SELF_REF.into(), PARENT_REF.into()];
    for entry in read {
        match entry {
            Ok(e) => names.push(e.file_name()),
            Err(e) => tracing::warn!(dir = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }

    let mut ids = IdNames::default();
    let mut entries: Vec<Entry> = names
        .into_iter()
        .map(|name| {
            let meta = match fs::symlink_metadata(path.join(&name)) {
                Ok(md) => Some(EntryMeta::from_metadata(&md, &mut ids)),
                Err(e) => {
                    tracing::debug!(name = ?name, error = %e, "metadata probe failed");
                    None
                }
            };
            Entry::new(name, meta)
        })
        .collect();

    sort_entries(&mut entries);
    tracing::debug!(dir = %path.display(), count = entries.len(), "snapshot taken");
    Ok(entries)
}

/// Resolves `path` to an absolute directory path that can be entered.
pub fn resolve_dir(path: &Path) -> Result<PathBuf> {
    let cannot_enter = |source: std::io::Error| IeError::CannotEnter {
        path: path.to_path_buf(),
        source,
    };
    let abs = fs::canonicalize(path).map_err(cannot_enter)?;
    let md = fs::metadata(&abs).map_err(cannot_enter)?;
    if !md.is_dir() {
        return Err(cannot_enter(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    Ok(abs)
}

/// True when `path` exists and is a directory, following symlinks.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|md| md.is_dir())
}

/// True when `path` resolves to a non-directory with an execute bit set.
#[cfg(unix)]
pub fn is_executable_path(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .is_ok_and(|md| !md.is_dir() && md.permissions().mode() & Entry::EXEC_FLAG != 0)
}

#[cfg(not(unix))]
pub fn is_executable_path(_path: &Path) -> bool {
    false
}

/// Reads a regular file for the viewer, one string per line. Invalid UTF-8 is replaced.
///
/// Symlinks are followed; devices, fifos and sockets are refused.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let view_err = |source: std::io::Error| IeError::View {
        path: path.to_path_buf(),
        source,
    };
    let md = fs::metadata(path).map_err(view_err)?;
    if !md.is_file() {
        return Err(view_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let bytes = fs::read(path).map_err(view_err)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect())
}

/// User and group names by numeric id, looked up once per id and snapshot.
#[derive(Default)]
struct IdNames {
    users: HashMap<u32, String>,
    groups: HashMap<u32, String>,
}

impl IdNames {
    #[cfg_attr(not(unix), allow(dead_code))]
    fn user(&mut self, uid: u32) -> String {
        self.users
            .entry(uid)
            .or_insert_with(|| user_name(uid).unwrap_or_else(|| "?".into()))
            .clone()
    }

    #[cfg_attr(not(unix), allow(dead_code))]
    fn group(&mut self, gid: u32) -> String {
        self.groups
            .entry(gid)
            .or_insert_with(|| group_name(gid).unwrap_or_else(|| "?".into()))
            .clone()
    }
}

/// Upper bound for the scratch buffer handed to the `get*_r` lookups.
#[cfg(unix)]
const MAX_LOOKUP_BUF: usize = 1 << 20;

/// Name of `uid` in the user database, through NSS.
#[cfg(unix)]
fn user_name(uid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        // SAFETY: `pwd`, `buf` and `result` outlive the call and `buf.len()` is its size.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(
                uid as libc::uid_t,
                &raw mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &raw mut result,
            )
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
            return None;
        }
        // SAFETY: on success `pw_name` is a NUL-terminated string inside `buf`.
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

/// Name of `gid` in the group database, through NSS.
#[cfg(unix)]
fn group_name(gid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        // SAFETY: `grp`, `buf` and `result` outlive the call and `buf.len()` is its size.
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::group = std::ptr::null_mut();
        let rc = unsafe {
            libc::getgrgid_r(
                gid as libc::gid_t,
                &raw mut grp,
                buf.as_mut_ptr(),
                buf.len(),
                &raw mut result,
            )
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || grp.gr_name.is_null() {
            return None;
        }
        // SAFETY: on success `gr_name` is a NUL-terminated string inside `buf`.
        let name = unsafe { CStr::from_ptr(grp.gr_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

#[cfg(not(unix))]
fn user_name(_uid: u32) -> Option<String> {
    None
}

#[cfg(not(unix))]
fn group_name(_gid: u32) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.name_str().into_owned()).collect()
    }

    #[test]
    fn dot_refs_lead_then_bytewise_order() {
        let mut entries: Vec<Entry> = ["c", "a.txt", "..", "B.txt", "."]
            .into_iter()
            .map(|n| Entry::new(n, None))
            .collect();
        sort_entries(&mut entries);
        assert_eq!(names(&entries), [".", "..", "B.txt", "a.txt", "c"]);
    }

    #[test]
    fn dot_prefixed_names_sort_after_parent_ref() {
        let mut entries: Vec<Entry> = ["..a", ".hidden", "..", "."]
            .into_iter()
            .map(|n| Entry::new(n, None))
            .collect();
        sort_entries(&mut entries);
        assert_eq!(names(&entries), [".", "..", "..a", ".hidden"]);
    }

    #[test]
    fn snapshot_synthesises_dot_refs() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("zeta"))?;
        fs::create_dir(tmp.path().join("Alpha"))?;

        let entries = snapshot(tmp.path())?;
        assert_eq!(names(&entries), [".", "..", "Alpha", "zeta"]);
        assert!(entries[0].is_dir());
        assert!(entries[2].is_dir());
        assert!(!entries[3].is_dir());
        assert!(entries.iter().all(|e| !e.stat_failed()));
        Ok(())
    }

    #[test]
    fn empty_dir_still_has_dot_refs() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let entries = snapshot(tmp.path())?;
        assert_eq!(names(&entries), [".", ".."]);
        Ok(())
    }

    #[test]
    fn snapshot_of_missing_dir_is_list_error() {
        let result = snapshot(Path::new("/path/does/not/exist"));
        assert!(matches!(result, Err(IeError::ListDir { .. })));
    }

    #[test]
    fn failed_probe_yields_sentinels() {
        let entry = Entry::new("ghost", None);
        assert!(entry.stat_failed());
        assert_eq!(entry.owner(), "?");
        assert_eq!(entry.group(), "?");
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.links(), 0);
        assert!(entry.modified().is_none());
        assert!(!entry.is_executable());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed_for_kind() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        fs::create_dir(tmp.path().join("real"))?;
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link"))?;

        let entries = snapshot(tmp.path())?;
        let link = entries
            .iter()
            .find(|e| e.name() == "link")
            .ok_or("link missing")?;
        assert!(link.is_symlink());
        assert!(!link.is_dir());
        assert_eq!(link.link_target(tmp.path()), Some(tmp.path().join("real")));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn executable_bits_are_detected() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new()?;
        let script = tmp.path().join("run.sh");
        File::create(&script)?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750))?;

        let entries = snapshot(tmp.path())?;
        let run = entries
            .iter()
            .find(|e| e.name() == "run.sh")
            .ok_or("script missing")?;
        assert!(run.is_executable());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn root_ids_resolve_to_names() {
        let mut ids = IdNames::default();
        assert_eq!(ids.user(0), "root");
        assert!(!ids.group(0).is_empty());
        assert_ne!(ids.group(0), "?");
    }

    #[cfg(unix)]
    #[test]
    fn unassigned_ids_render_as_question_mark() -> Result<(), Box<dyn std::error::Error>> {
        const UNASSIGNED: u32 = 54321;
        if user_name(UNASSIGNED).is_some() || group_name(UNASSIGNED).is_some() {
            return Ok(());
        }

        let tmp = TempDir::new()?;
        let orphan = tmp.path().join("orphan");
        File::create(&orphan)?;
        match std::os::unix::fs::chown(&orphan, Some(UNASSIGNED), Some(UNASSIGNED)) {
            Ok(()) => {}
            // Changing ownership needs privileges.
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        let entries = snapshot(tmp.path())?;
        let entry = entries
            .iter()
            .find(|e| e.name() == "orphan")
            .ok_or("orphan missing")?;
        assert!(!entry.stat_failed());
        assert_eq!(entry.owner(), "?");
        assert_eq!(entry.group(), "?");
        Ok(())
    }

    #[test]
    fn viewer_refuses_non_regular_files() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        assert!(matches!(read_lines(tmp.path()), Err(IeError::View { .. })));

        #[cfg(unix)]
        assert!(matches!(
            read_lines(Path::new("/dev/zero")),
            Err(IeError::View { .. })
        ));

        let text = tmp.path().join("notes");
        fs::write(&text, "one\ntwo\n")?;
        assert_eq!(read_lines(&text)?, ["one", "two"]);
        Ok(())
    }

    #[test]
    fn resolve_dir_rejects_files() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let file = tmp.path().join("plain");
        File::create(&file)?;
        assert!(matches!(resolve_dir(&file), Err(IeError::CannotEnter { .. })));
        assert_eq!(resolve_dir(tmp.path())?, fs::canonicalize(tmp.path())?);
        Ok(())
    }
}
