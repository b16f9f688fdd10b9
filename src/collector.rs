//! Poll orchestration: one complete snapshot of host and process metrics.
//!
//! A snapshot is a single read of everything at one poll instant. PIDs are
//! enumerated once and treated as an immutable set for the poll; a PID that
//! exits mid-poll degrades its own fields to defaults rather than aborting
//! the batch, and ranking happens only after every fetch has completed.
//!
//! No per-read timeout is imposed; a hung filesystem read blocks that poll.

use crate::config::MonitorConfig;
use crate::process::{ProcessReader, UserTable};
use crate::record::{rank_by_cpu, ProcessRecord};
use crate::system::{CpuTimes, SystemReader};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, error};

/// Everything one poll produces. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub os_name: String,
    pub kernel_version: String,
    /// Fraction of physical memory in use, in [0,1].
    pub memory_utilization: f64,
    pub uptime_seconds: u64,
    /// Aggregate counters the per-process ratios were taken against.
    pub cpu: CpuTimes,
    /// Aggregate CPU utilization in [0,1].
    pub cpu_utilization: f64,
    pub total_processes: u64,
    pub running_processes: u64,
    /// Per-process records, descending by CPU utilization.
    pub processes: Vec<ProcessRecord>,
}

/// Assembles snapshots from the system and process parsers.
pub struct Collector {
    config: MonitorConfig,
    system: SystemReader,
    process: ProcessReader,
    pool: Option<rayon::ThreadPool>,
}

impl Collector {
    pub fn new(config: MonitorConfig) -> Self {
        let pool = config.parallelism.and_then(|threads| {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    error!("failed to build fetch pool, using global pool: {}", e);
                    None
                }
            }
        });
        Self {
            system: SystemReader::new(config.paths.clone()),
            process: ProcessReader::new(config.paths.clone()),
            pool,
            config,
        }
    }

    pub fn system(&self) -> &SystemReader {
        &self.system
    }

    pub fn process(&self) -> &ProcessReader {
        &self.process
    }

    /// Takes one complete snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let cpu = self.system.cpu_times();
        let total_jiffies = cpu.total();

        let mut pids = self.system.pids();
        if let Some(max) = self.config.max_processes {
            if pids.len() > max {
                debug!("capping poll at {} of {} processes", max, pids.len());
                pids.truncate(max);
            }
        }

        // One pass over the password database covers the whole poll.
        let users = UserTable::load(&self.config.paths.passwd);

        let fetch = || {
            pids.par_iter()
                .map(|&pid| {
                    let uid = self.process.owner_uid(pid);
                    ProcessRecord::with_user(
                        &self.process,
                        pid,
                        total_jiffies,
                        users.name_for(&uid),
                    )
                })
                .collect::<Vec<ProcessRecord>>()
        };
        let mut processes = match &self.pool {
            Some(pool) => pool.install(fetch),
            None => fetch(),
        };
        rank_by_cpu(&mut processes);

        debug!("snapshot complete: {} processes", processes.len());

        Snapshot {
            taken_at: Utc::now(),
            os_name: self.system.operating_system(),
            kernel_version: self.system.kernel_version(),
            memory_utilization: self.system.memory_utilization(),
            uptime_seconds: self.system.uptime_seconds(),
            cpu,
            cpu_utilization: cpu.utilization(),
            total_processes: self.system.total_processes(),
            running_processes: self.system.running_processes(),
            processes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcPaths;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_pid(proc_root: &Path, pid: u32, uid: u32, utime: u64) {
        let pid_dir = proc_root.join(pid.to_string());
        fs::create_dir_all(&pid_dir).expect("failed to create pid dir");
        fs::write(pid_dir.join("cmdline"), format!("/bin/proc{pid}\0"))
            .expect("failed to write cmdline");
        fs::write(
            pid_dir.join("status"),
            format!("Name:\tproc{pid}\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nVmSize:\t2048 kB\n"),
        )
        .expect("failed to write status");
        fs::write(
            pid_dir.join("stat"),
            format!(
                "{pid} (proc{pid}) S 1 {pid} {pid} 0 -1 4194304 10 0 0 0 {utime} 0 0 0 20 0 1 0 12000 1048576 100 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0"
            ),
        )
        .expect("failed to write stat");
    }

    fn build_fixture(dir: &Path) -> MonitorConfig {
        let paths = ProcPaths::rooted_at(dir);
        fs::create_dir_all(&paths.proc_root).expect("failed to create proc dir");

        fs::write(&paths.os_release, "PRETTY_NAME=\"Fixture Linux 1.0\"\n")
            .expect("failed to write os-release");
        fs::write(
            &paths.passwd,
            "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/bash\n",
        )
        .expect("failed to write passwd");
        fs::write(
            paths.proc_root.join("version"),
            "Linux version 6.1.0-fixture (builder@host) (gcc 12)\n",
        )
        .expect("failed to write version");
        fs::write(
            paths.proc_root.join("meminfo"),
            "MemTotal:        4000 kB\nMemFree:         1000 kB\n",
        )
        .expect("failed to write meminfo");
        fs::write(paths.proc_root.join("uptime"), "5000.25 9000.00\n")
            .expect("failed to write uptime");
        fs::write(
            paths.proc_root.join("stat"),
            "cpu  400 0 300 200 100 0 0 0 0 0\nprocesses 77\nprocs_running 2\n",
        )
        .expect("failed to write stat");

        write_pid(&paths.proc_root, 1, 0, 100);
        write_pid(&paths.proc_root, 2, 1000, 500);
        write_pid(&paths.proc_root, 3, 1000, 250);

        MonitorConfig {
            paths,
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_snapshot_ranks_processes_descending() {
        let dir = tempdir().expect("failed to create temp dir");
        let collector = Collector::new(build_fixture(dir.path()));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.processes.len(), 3);

        let pids: Vec<u32> = snapshot.processes.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);

        // total jiffies = 400+300+200+100 = 1000
        assert_eq!(snapshot.processes[0].cpu_utilization, 500.0 / 1000.0);
        assert_eq!(snapshot.processes[0].user, "alice");
        assert_eq!(snapshot.processes[2].user, "root");
    }

    #[test]
    fn test_snapshot_system_fields() {
        let dir = tempdir().expect("failed to create temp dir");
        let collector = Collector::new(build_fixture(dir.path()));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.os_name, "Fixture Linux 1.0");
        assert_eq!(snapshot.kernel_version, "6.1.0-fixture");
        assert_eq!(snapshot.memory_utilization, 0.75);
        assert_eq!(snapshot.uptime_seconds, 5000);
        assert_eq!(snapshot.cpu.total(), 1000);
        assert_eq!(snapshot.cpu_utilization, 700.0 / 1000.0);
        assert_eq!(snapshot.total_processes, 77);
        assert_eq!(snapshot.running_processes, 2);
    }

    #[test]
    fn test_snapshot_with_dedicated_pool_and_cap() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut config = build_fixture(dir.path());
        config.parallelism = Some(2);
        config.max_processes = Some(2);
        let collector = Collector::new(config);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.processes.len(), 2);
    }

    #[test]
    fn test_snapshot_empty_proc_is_all_defaults() {
        let dir = tempdir().expect("failed to create temp dir");
        let paths = ProcPaths::rooted_at(dir.path());
        let collector = Collector::new(MonitorConfig {
            paths,
            ..MonitorConfig::default()
        });

        // Total data unavailability degrades to an all-default snapshot
        let snapshot = collector.snapshot();
        assert_eq!(snapshot.os_name, "Unknown");
        assert_eq!(snapshot.kernel_version, "Unknown");
        assert_eq!(snapshot.memory_utilization, 0.0);
        assert_eq!(snapshot.uptime_seconds, 0);
        assert_eq!(snapshot.cpu_utilization, 0.0);
        assert!(snapshot.processes.is_empty());
    }
}
