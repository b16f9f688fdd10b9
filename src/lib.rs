//! procscope - point-in-time Linux telemetry from /proc.
//!
//! This crate reads the kernel's pseudo-files and turns their raw,
//! loosely-structured text into normalized metrics for periodic display,
//! e.g. in a terminal dashboard. Each poll is an independent snapshot;
//! nothing is retained between polls.
//!
//! # Design
//!
//! - **Total accessors**: every public read returns a value of its declared
//!   type. A missing file, a process that exited mid-poll, or a malformed
//!   line degrades to a documented default (empty string, zero, empty list)
//!   and is logged; nothing here is fatal to the hosting process.
//! - **Injected paths**: parsers take a [`config::ProcPaths`] at
//!   construction, so tests point them at synthetic fixture trees.
//! - **Cumulative ratios**: per-process CPU utilization is cumulative
//!   process ticks over cumulative system ticks since boot, a coarse
//!   monotonically-evolving figure rather than an interval rate.
//!
//! # Usage
//!
//! ```no_run
//! use procscope::{Collector, MonitorConfig};
//!
//! let collector = Collector::new(MonitorConfig::default());
//! let snapshot = collector.snapshot();
//!
//! println!("{} / kernel {}", snapshot.os_name, snapshot.kernel_version);
//! for record in snapshot.processes.iter().take(10) {
//!     println!("{:>6} {:>6.2}% {}", record.pid, record.cpu_utilization * 100.0, record.command);
//! }
//! ```

pub mod collector;
pub mod config;
pub mod format;
pub mod logging;
pub mod process;
pub mod reader;
pub mod record;
pub mod system;

// Re-export main types for convenience
pub use collector::{Collector, Snapshot};
pub use config::{load_config, validate_config, MonitorConfig, ProcPaths};
pub use process::{ProcessJiffies, ProcessReader, StatSample, UserTable, CLK_TCK};
pub use record::{cpu_ratio, rank_by_cpu, ProcessRecord};
pub use system::{CpuTimes, SystemReader};
