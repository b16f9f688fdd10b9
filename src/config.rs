//! Configuration for procscope.
//!
//! Kernel pseudo-file locations live in a read-only [`ProcPaths`] struct
//! handed to each reader at construction, so tests point the parsers at
//! synthetic fixture trees instead of the live /proc. [`MonitorConfig`]
//! bundles the paths with poll tuning and loads from YAML, JSON, or TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_PASSWD: &str = "/etc/passwd";

/// Locations of the kernel pseudo-files and databases the parsers read.
///
/// Immutable after construction; cloning is cheap enough that each reader
/// keeps its own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcPaths {
    /// Root of the process table, normally `/proc`.
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    /// OS-release-style key/value file, normally `/etc/os-release`.
    #[serde(default = "default_os_release")]
    pub os_release: PathBuf,

    /// Password database, normally `/etc/passwd`.
    #[serde(default = "default_passwd")]
    pub passwd: PathBuf,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}
fn default_os_release() -> PathBuf {
    PathBuf::from(DEFAULT_OS_RELEASE)
}
fn default_passwd() -> PathBuf {
    PathBuf::from(DEFAULT_PASSWD)
}

impl Default for ProcPaths {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            os_release: default_os_release(),
            passwd: default_passwd(),
        }
    }
}

impl ProcPaths {
    /// Rooted at `dir` instead of the live /proc; fixture trees put their
    /// os-release and passwd files directly under the same directory.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            proc_root: dir.join("proc"),
            os_release: dir.join("os-release"),
            passwd: dir.join("passwd"),
        }
    }

    pub fn version(&self) -> PathBuf {
        self.proc_root.join("version")
    }

    pub fn meminfo(&self) -> PathBuf {
        self.proc_root.join("meminfo")
    }

    pub fn uptime(&self) -> PathBuf {
        self.proc_root.join("uptime")
    }

    pub fn stat(&self) -> PathBuf {
        self.proc_root.join("stat")
    }

    pub fn pid_dir(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    pub fn pid_cmdline(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join("cmdline")
    }

    pub fn pid_status(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join("status")
    }

    pub fn pid_stat(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join("stat")
    }
}

/// Crate configuration: pseudo-file locations plus poll tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub paths: ProcPaths,

    /// Worker threads for the per-process fetch loop. `None` uses the
    /// global rayon pool.
    pub parallelism: Option<usize>,

    /// Cap on processes fetched per poll. `None` fetches every PID.
    pub max_processes: Option<usize>,

    /// Log level for `logging::init` ("off", "error", "warn", "info",
    /// "debug", "trace").
    pub log_level: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            paths: ProcPaths::default(),
            parallelism: None,
            max_processes: None,
            log_level: Some("info".into()),
        }
    }
}

/// Validate effective config (used at startup by embedding binaries).
pub fn validate_config(cfg: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.parallelism == Some(0) {
        return Err("parallelism must be at least 1 when set".into());
    }
    if cfg.max_processes == Some(0) {
        return Err("max_processes must be at least 1 when set".into());
    }
    Ok(())
}

/// Loads configuration from a file, dispatching on the extension.
///
/// `None` or a missing file yields the defaults. JSON and TOML are matched
/// by extension; anything else is parsed as YAML.
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) if p.exists() => p,
        _ => return Ok(MonitorConfig::default()),
    };

    let content = fs::read_to_string(path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: MonitorConfig = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: MonitorConfig = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: MonitorConfig = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths() {
        let paths = ProcPaths::default();
        assert_eq!(paths.stat(), PathBuf::from("/proc/stat"));
        assert_eq!(paths.pid_stat(42), PathBuf::from("/proc/42/stat"));
        assert_eq!(paths.pid_status(42), PathBuf::from("/proc/42/status"));
        assert_eq!(paths.passwd, PathBuf::from("/etc/passwd"));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let cfg = load_config(Some(Path::new("/nonexistent/procscope.yaml")))
            .expect("missing file should fall back to defaults");
        assert_eq!(cfg.paths.proc_root, PathBuf::from("/proc"));
        assert_eq!(cfg.parallelism, None);
    }

    #[test]
    fn test_load_config_yaml() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("procscope.yaml");
        fs::write(
            &path,
            "paths:\n  proc_root: /tmp/fakeproc\nparallelism: 4\n",
        )
        .expect("failed to write config");

        let cfg = load_config(Some(path.as_path())).expect("yaml config should load");
        assert_eq!(cfg.paths.proc_root, PathBuf::from("/tmp/fakeproc"));
        // Unset path fields keep their defaults
        assert_eq!(cfg.paths.passwd, PathBuf::from("/etc/passwd"));
        assert_eq!(cfg.parallelism, Some(4));
    }

    #[test]
    fn test_load_config_json() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("procscope.json");
        fs::write(&path, r#"{"max_processes": 128}"#).expect("failed to write config");

        let cfg = load_config(Some(path.as_path())).expect("json config should load");
        assert_eq!(cfg.max_processes, Some(128));
    }

    #[test]
    fn test_validate_config_rejects_zero_parallelism() {
        let mut cfg = MonitorConfig::default();
        assert!(validate_config(&cfg).is_ok());

        cfg.parallelism = Some(0);
        assert!(validate_config(&cfg).is_err());

        cfg.parallelism = Some(2);
        cfg.max_processes = Some(0);
        assert!(validate_config(&cfg).is_err());
    }
}
