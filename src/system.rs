//! Whole-system metrics parsed from the process table root and os-release.
//!
//! Every accessor is total: a missing file, a malformed line, or a violated
//! invariant degrades to the documented default and is logged, never raised.

use crate::config::ProcPaths;
use crate::reader;
use std::fs;
use tracing::{debug, warn};

const UNKNOWN: &str = "Unknown";

/// Number of positional counters on the aggregate `cpu` line.
pub const CPU_FIELD_COUNT: usize = 10;

/// Cumulative jiffie counters from the aggregate `cpu` line, in the kernel's
/// fixed order. Counters only reset on reboot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimes {
    /// Builds counters from the raw string fields of the aggregate line.
    ///
    /// A field that fails numeric conversion counts as 0; one bad field
    /// never discards the rest of the sample. Missing trailing fields
    /// (older kernels) also count as 0.
    pub fn from_fields(fields: &[String]) -> Self {
        fn counter(fields: &[String], index: usize) -> u64 {
            match fields.get(index) {
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    debug!("unparseable cpu counter at index {}: {:?}", index, raw);
                    0
                }),
                None => 0,
            }
        }

        Self {
            user: counter(fields, 0),
            nice: counter(fields, 1),
            system: counter(fields, 2),
            idle: counter(fields, 3),
            iowait: counter(fields, 4),
            irq: counter(fields, 5),
            softirq: counter(fields, 6),
            steal: counter(fields, 7),
            guest: counter(fields, 8),
            guest_nice: counter(fields, 9),
        }
    }

    /// Jiffies spent doing work: every counter except idle and iowait.
    pub fn active(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }

    /// Jiffies spent idle or waiting on I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    /// All jiffies accounted since boot.
    pub fn total(&self) -> u64 {
        self.active() + self.idle_total()
    }

    /// Aggregate CPU utilization, `active / total` in [0,1].
    ///
    /// Exactly 0.0 when no counters have been populated yet, so a
    /// first-ever sample never divides by zero.
    pub fn utilization(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.active() as f64 / total as f64
    }
}

/// Parser for whole-system pseudo-files.
#[derive(Debug, Clone)]
pub struct SystemReader {
    paths: ProcPaths,
}

impl SystemReader {
    pub fn new(paths: ProcPaths) -> Self {
        Self { paths }
    }

    /// `PRETTY_NAME` from the os-release file, `"Unknown"` when missing.
    ///
    /// Lines are space/`=`/quote-normalized before the key/value split, and
    /// underscores in the value are restored to spaces afterwards.
    pub fn operating_system(&self) -> String {
        let Ok(lines) = reader::open_lines(&self.paths.os_release) else {
            return UNKNOWN.to_string();
        };
        for line in lines {
            let line = line.replace(' ', "_").replace(['=', '"'], " ");
            let mut tokens = line.split_whitespace();
            if let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
                if key == "PRETTY_NAME" {
                    return value.replace('_', " ");
                }
            }
        }
        UNKNOWN.to_string()
    }

    /// Kernel release from line 1 of the version file, `"Unknown"` when
    /// missing. The release is the token after the literal `version` label
    /// of `Linux version <release> ...`.
    pub fn kernel_version(&self) -> String {
        reader::first_line(&self.paths.version())
            .and_then(|line| reader::nth_token(&line, 3).map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Live PIDs: numeric-named subdirectories of the process table root.
    ///
    /// Order is filesystem-dependent and carries no meaning. Non-numeric
    /// names are ignored; a conversion failure is logged and the entry
    /// skipped, never aborting the scan.
    pub fn pids(&self) -> Vec<u32> {
        let mut pids = Vec::new();
        let entries = match fs::read_dir(&self.paths.proc_root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot list {}: {}", self.paths.proc_root.display(), e);
                return pids;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if !path.is_dir() {
                continue;
            }
            match name.parse::<u32>() {
                Ok(pid) => pids.push(pid),
                Err(e) => debug!("skipping process table entry {:?}: {}", name, e),
            }
        }
        pids
    }

    /// Fraction of physical memory in use, `(total - free) / total` in
    /// [0,1]. A missing file, a missing or zero `MemTotal:`, or free
    /// exceeding total yields 0.0, never a divide-by-zero or a negative.
    pub fn memory_utilization(&self) -> f64 {
        let Ok(lines) = reader::open_lines(&self.paths.meminfo()) else {
            return 0.0;
        };

        let mut total_kb: Option<u64> = None;
        let mut free_kb: Option<u64> = None;
        for line in lines {
            if let Some(v) = line.strip_prefix("MemTotal:") {
                total_kb = parse_kb_value(v);
            } else if let Some(v) = line.strip_prefix("MemFree:") {
                free_kb = parse_kb_value(v);
            }
            if total_kb.is_some() && free_kb.is_some() {
                break;
            }
        }

        let Some(total) = total_kb.filter(|&t| t > 0) else {
            debug!(
                "MemTotal missing or zero in {}, reporting 0.0",
                self.paths.meminfo().display()
            );
            return 0.0;
        };
        let free = free_kb.unwrap_or(0);
        if free > total {
            warn!(
                "MemFree {} kB exceeds MemTotal {} kB, reporting 0.0",
                free, total
            );
            return 0.0;
        }
        (total - free) as f64 / total as f64
    }

    /// Seconds since boot, truncated to whole seconds. A decrease across
    /// polls means a reboot and is simply the new value.
    pub fn uptime_seconds(&self) -> u64 {
        reader::first_line(&self.paths.uptime())
            .as_deref()
            .and_then(|line| reader::nth_token(line, 1))
            .and_then(|token| token.parse::<f64>().ok())
            .map(|seconds| seconds.max(0.0) as u64)
            .unwrap_or(0)
    }

    /// The 10 positional counters of the aggregate `cpu` line, as raw
    /// strings. Empty when the line or file is missing. Per-core lines
    /// (`cpu0`, `cpu1`, ...) are not matched.
    pub fn cpu_fields(&self) -> Vec<String> {
        let Ok(lines) = reader::open_lines(&self.paths.stat()) else {
            return Vec::new();
        };
        for line in lines {
            let mut tokens = line.split_whitespace();
            if tokens.next() == Some("cpu") {
                return tokens.take(CPU_FIELD_COUNT).map(str::to_string).collect();
            }
        }
        debug!("no aggregate cpu line in {}", self.paths.stat().display());
        Vec::new()
    }

    /// Aggregate counters parsed from [`cpu_fields`](Self::cpu_fields).
    pub fn cpu_times(&self) -> CpuTimes {
        CpuTimes::from_fields(&self.cpu_fields())
    }

    /// Aggregate CPU utilization in [0,1]; 0.0 before any counters exist.
    pub fn aggregate_cpu_utilization(&self) -> f64 {
        self.cpu_times().utilization()
    }

    /// Value of key `processes` in the stat file.
    pub fn total_processes(&self) -> u64 {
        self.stat_counter("processes")
    }

    /// Value of key `procs_running` in the stat file.
    pub fn running_processes(&self) -> u64 {
        self.stat_counter("procs_running")
    }

    fn stat_counter(&self, key: &str) -> u64 {
        match reader::value_for_key(&self.paths.stat(), key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                debug!("unparseable {} value {:?}", key, raw);
                0
            }),
            None => 0,
        }
    }
}

/// Parses the decimal value preceding the kB unit suffix.
fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
