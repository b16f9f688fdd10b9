//! Per-process CPU accounting from the process stat line.
//!
//! The stat line carries the cumulative tick counters (fields 14-17) and
//! the start-time field (field 22, ticks since boot). Both are pulled from
//! one read of the file so the counters and the age always describe the
//! same instant.

use crate::reader;
use once_cell::sync::Lazy;
use std::path::Path;
use tracing::debug;

/// Get system clock ticks per second (usually 100, but can vary).
fn clock_ticks_per_second() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as u64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100
}

/// System clock ticks per second (for tick-to-second conversion).
pub static CLK_TCK: Lazy<u64> = Lazy::new(clock_ticks_per_second);

/// Cumulative tick counters for one process: fields 14-17 of its stat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessJiffies {
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
}

impl ProcessJiffies {
    /// Ticks this process and its reaped children have spent on-CPU.
    pub fn total(&self) -> u64 {
        self.utime + self.stime + self.cutime + self.cstime
    }
}

/// Fields extracted from one read of a process stat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatSample {
    pub jiffies: ProcessJiffies,
    /// Start-time field, in clock ticks since boot.
    pub starttime_ticks: u64,
}

impl StatSample {
    /// Start time converted to whole seconds via the clock-tick frequency.
    pub fn uptime_seconds(&self) -> u64 {
        self.starttime_ticks / *CLK_TCK
    }
}

/// Reads the stat line once and extracts the CPU and start-time fields
/// together. A missing file or a short/malformed line degrades to the
/// all-zero sample.
pub fn read_stat_sample(stat_path: &Path) -> StatSample {
    match reader::first_line(stat_path) {
        Some(line) => parse_stat_line(&line),
        None => StatSample::default(),
    }
}

/// Extracts the positional fields from a stat line. Each field that is
/// absent or unparseable is treated as 0 so a truncated line still yields
/// a usable sample.
pub fn parse_stat_line(line: &str) -> StatSample {
    StatSample {
        jiffies: ProcessJiffies {
            utime: stat_field(line, 14),
            stime: stat_field(line, 15),
            cutime: stat_field(line, 16),
            cstime: stat_field(line, 17),
        },
        starttime_ticks: stat_field(line, 22),
    }
}

fn stat_field(line: &str, index: usize) -> u64 {
    match reader::nth_token(line, index).map(str::parse::<u64>) {
        Some(Ok(value)) => value,
        Some(Err(_)) | None => {
            debug!("stat field {} missing or malformed, treating as 0", index);
            0
        }
    }
}
