//! Log file location, ANSI stripping and timestamps.
use std::fs;
use std::path::PathBuf;

/// Environment variable naming the directory run logs are written to.
pub const LOG_DIR_ENV_VAR: &str = "PROVISION_LOG_DIR";

/// Timestamp format of the run header.
pub(super) const HEADER_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format of each log line.
pub(super) const LINE_TIMESTAMP: &str = "%H:%M:%S";

/// Remove ANSI CSI sequences (`ESC [ ... final-byte`) from `s`.
///
/// A lone `ESC` not followed by `[` is dropped together with the next
/// character.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            // Parameter and intermediate bytes run until a final byte.
            let _ = chars.by_ref().find(|b| ('@'..='~').contains(b));
        }
    }
    out
}

/// Directory that holds run logs, created if needed.
///
/// [`LOG_DIR_ENV_VAR`] wins; otherwise `$XDG_CACHE_HOME/provision`, falling
/// back to `~/.cache/provision`.
fn log_dir() -> Option<PathBuf> {
    let dir = match std::env::var_os(LOG_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var_os("XDG_CACHE_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("provision"),
    };
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file of a `command` run, e.g. `~/.cache/provision/converge.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
