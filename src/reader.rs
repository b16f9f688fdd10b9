//! Line-oriented access to kernel pseudo-files.
//!
//! Every parser in this crate funnels its file access through these helpers.
//! A pseudo-file can vanish between polls (a process that exits), be
//! unreadable, or be partially written while we read it; an open failure is
//! logged and surfaced as [`ReadError`] so each caller degrades to its own
//! documented default instead of propagating a crash.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Failure to obtain data from a pseudo-file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("cannot open {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Opens a pseudo-file and yields its lines.
///
/// The returned iterator is a fresh, non-restartable view: the underlying
/// kernel state may change between calls, so nothing is cached across calls.
/// An I/O error mid-read ends the sequence early rather than aborting.
pub fn open_lines(path: &Path) -> Result<impl Iterator<Item = String>, ReadError> {
    let file = fs::File::open(path).map_err(|e| {
        debug!("cannot open {}: {}", path.display(), e);
        ReadError::Unavailable {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    Ok(BufReader::new(file).lines().map_while(Result::ok))
}

/// First line of a pseudo-file, or `None` when it is missing or empty.
pub fn first_line(path: &Path) -> Option<String> {
    open_lines(path).ok()?.next()
}

/// Scans a line-oriented `Key: value` file for a line whose leading token is
/// `key` and returns the token after it.
pub fn value_for_key(path: &Path, key: &str) -> Option<String> {
    for line in open_lines(path).ok()? {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(key) {
            return tokens.next().map(str::to_string);
        }
    }
    None
}

/// Returns the whitespace-delimited token at 1-based `index`.
///
/// Kernel documentation numbers positional fields from 1, so callers quote
/// those numbers directly. All positional access into kernel-format lines
/// goes through here; a format drift between kernel versions is a one-place
/// fix.
pub fn nth_token(line: &str, index: usize) -> Option<&str> {
    line.split_whitespace().nth(index.checked_sub(1)?)
}
