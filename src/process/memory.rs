//! Per-process memory from the process status file.

use crate::reader;
use std::path::Path;
use tracing::debug;

/// `VmSize:` from the status file, converted to whole megabytes.
///
/// Returned as decimal text; an unreadable file, a missing key, or an
/// unparseable value yields the empty string, which display layers render
/// as blank. The empty string signals "unavailable", never a misleading
/// `"0"`.
pub fn resident_memory_mb(status_path: &Path) -> String {
    let Some(raw) = reader::value_for_key(status_path, "VmSize:") else {
        return String::new();
    };
    match raw.parse::<u64>() {
        Ok(kb) => (kb / 1024).to_string(),
        Err(e) => {
            debug!(
                "unparseable VmSize {:?} in {}: {}",
                raw,
                status_path.display(),
                e
            );
            String::new()
        }
    }
}
