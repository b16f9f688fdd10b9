//! Per-process value object and the CPU-usage ordering.

use crate::process::{ProcessJiffies, ProcessReader};
use std::cmp::Ordering;

/// One process's identity and derived metrics for a single poll.
///
/// Constructed fresh each poll and never mutated afterwards. A process that
/// vanished between enumeration and fetch carries every field at its
/// default.
#[derive(Debug, Clone, Default)]
pub struct ProcessRecord {
    pub pid: u32,
    /// Raw command line; empty when unavailable.
    pub command: String,
    /// Resident memory in whole MB as text; empty means unavailable.
    pub ram_mb: String,
    /// Owning user name; empty when unresolved.
    pub user: String,
    /// Start-time field in whole seconds (ticks since boot over tick rate).
    pub uptime_seconds: u64,
    pub jiffies: ProcessJiffies,
    /// This process's cumulative ticks over the system's cumulative ticks
    /// since boot, in [0,1].
    pub cpu_utilization: f64,
}

impl ProcessRecord {
    /// Fetches every per-process metric for `pid` in one pass.
    ///
    /// `total_jiffies` is the system-wide cumulative tick count the CPU
    /// ratio is taken against. The ratio is cumulative-over-cumulative
    /// since boot, not a rate over the sampling interval; a long-lived
    /// quiet process trends toward zero. That is the intended metric, not
    /// an approximation of instantaneous CPU%.
    pub fn fetch(process: &ProcessReader, pid: u32, total_jiffies: u64) -> Self {
        let user = process.owner_name(pid);
        Self::with_user(process, pid, total_jiffies, user)
    }

    /// Same as [`fetch`](Self::fetch) with the user name already resolved,
    /// so a poll over many PIDs can share one pass over the password
    /// database.
    pub fn with_user(
        process: &ProcessReader,
        pid: u32,
        total_jiffies: u64,
        user: String,
    ) -> Self {
        let stat = process.stat_sample(pid);
        Self {
            pid,
            command: process.command(pid),
            ram_mb: process.resident_memory(pid),
            user,
            uptime_seconds: stat.uptime_seconds(),
            jiffies: stat.jiffies,
            cpu_utilization: cpu_ratio(stat.jiffies, total_jiffies),
        }
    }
}

/// `process_ticks / total_ticks` clamped to [0,1]; 0.0 on a zero
/// denominator so a first-ever sample never divides by zero.
pub fn cpu_ratio(jiffies: ProcessJiffies, total_jiffies: u64) -> f64 {
    if total_jiffies == 0 {
        return 0.0;
    }
    (jiffies.total() as f64 / total_jiffies as f64).min(1.0)
}

/// Equality mirrors the ordering key so the two relations stay consistent;
/// records with equal utilization compare equal regardless of identity.
impl PartialEq for ProcessRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cpu_utilization == other.cpu_utilization
    }
}

impl PartialOrd for ProcessRecord {
    /// Orders by CPU utilization, so sorting ranks the busiest processes.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.cpu_utilization.partial_cmp(&other.cpu_utilization)
    }
}

/// Stable descending sort by CPU utilization.
///
/// `f64::total_cmp` keeps the comparator total and deterministic; equal
/// utilizations keep their insertion order.
pub fn rank_by_cpu(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| b.cpu_utilization.total_cmp(&a.cpu_utilization));
}
