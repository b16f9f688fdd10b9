//! Per-process metrics parsed from the process table.
//!
//! This module provides:
//! - `cpu`: tick counters and start time from the process stat line
//! - `memory`: resident-memory estimate from the process status file
//! - `owner`: UID extraction and password-database resolution
//!
//! [`ProcessReader`] bundles them behind one path configuration. Every
//! accessor is total: a PID that exited between enumeration and read
//! degrades each field to its documented default.

pub mod cpu;
pub mod memory;
pub mod owner;

use crate::config::ProcPaths;
use crate::reader;

// Re-export commonly used types
pub use cpu::{ProcessJiffies, StatSample, CLK_TCK};
pub use owner::UserTable;

/// Parser for per-process pseudo-files.
#[derive(Debug, Clone)]
pub struct ProcessReader {
    paths: ProcPaths,
}

impl ProcessReader {
    pub fn new(paths: ProcPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ProcPaths {
        &self.paths
    }

    /// First line of the cmdline pseudo-file, verbatim (embedded NUL
    /// separators included). `""` when the process is gone.
    pub fn command(&self, pid: u32) -> String {
        reader::first_line(&self.paths.pid_cmdline(pid)).unwrap_or_default()
    }

    /// Resident-memory estimate in whole megabytes as decimal text; `""`
    /// signals unavailable.
    pub fn resident_memory(&self, pid: u32) -> String {
        memory::resident_memory_mb(&self.paths.pid_status(pid))
    }

    /// Owning UID as text, `""` when unavailable.
    pub fn owner_uid(&self, pid: u32) -> String {
        owner::owner_uid(&self.paths.pid_status(pid))
    }

    /// Owning user name resolved against the password database, `""` when
    /// unresolved.
    pub fn owner_name(&self, pid: u32) -> String {
        let uid = self.owner_uid(pid);
        owner::lookup_user_name(&self.paths.passwd, &uid)
    }

    /// CPU and start-time fields from one read of the stat line.
    pub fn stat_sample(&self, pid: u32) -> StatSample {
        cpu::read_stat_sample(&self.paths.pid_stat(pid))
    }

    /// Start-time field divided by the clock-tick frequency, in whole
    /// seconds. 0 when the process is gone.
    pub fn uptime_seconds(&self, pid: u32) -> u64 {
        self.stat_sample(pid).uptime_seconds()
    }

    /// Cumulative tick counters; all-zero when the process is gone or the
    /// line is malformed.
    pub fn cpu_jiffies(&self, pid: u32) -> ProcessJiffies {
        self.stat_sample(pid).jiffies
    }
}
