//! Process ownership: UID extraction and password-database resolution.

use crate::reader;
use ahash::AHashMap;
use std::path::Path;

/// Value of the `Uid:` key in the process status file, `""` when missing.
pub fn owner_uid(status_path: &Path) -> String {
    reader::value_for_key(status_path, "Uid:").unwrap_or_default()
}

/// Resolves a UID against the password database.
///
/// Scans for a record containing the literal substring `:<uid>:` and
/// returns the name field before the first `:`. An empty or unresolved UID
/// yields `""`.
pub fn lookup_user_name(passwd_path: &Path, uid: &str) -> String {
    if uid.is_empty() {
        return String::new();
    }
    let Ok(lines) = reader::open_lines(passwd_path) else {
        return String::new();
    };
    let needle = format!(":{uid}:");
    for line in lines {
        if line.contains(&needle) {
            if let Some(name) = line.split(':').next() {
                return name.to_string();
            }
        }
    }
    String::new()
}

/// One-poll cache of the password database, uid -> name.
///
/// A poll over many PIDs resolves every owner with a single pass over the
/// file instead of one scan per process. The first record wins for a
/// duplicated UID, matching the scan order of [`lookup_user_name`].
#[derive(Debug, Default)]
pub struct UserTable {
    names: AHashMap<String, String>,
}

impl UserTable {
    /// Parses every `name:x:uid:...` record; malformed lines are skipped.
    pub fn load(passwd_path: &Path) -> Self {
        let mut names = AHashMap::new();
        if let Ok(lines) = reader::open_lines(passwd_path) {
            for line in lines {
                let mut fields = line.split(':');
                let name = fields.next();
                let _password = fields.next();
                let uid = fields.next();
                if let (Some(name), Some(uid)) = (name, uid) {
                    if !name.is_empty() && !uid.is_empty() {
                        names
                            .entry(uid.to_string())
                            .or_insert_with(|| name.to_string());
                    }
                }
            }
        }
        Self { names }
    }

    /// Name for `uid`, `""` when unresolved.
    pub fn name_for(&self, uid: &str) -> String {
        self.names.get(uid).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PASSWD_FIXTURE: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice:/home/alice:/bin/bash
bob:x:1001:1001::/home/bob:/bin/zsh
";

    #[test]
    fn test_owner_uid() {
        let dir = tempdir().expect("failed to create temp dir");
        let status_path = dir.path().join("status");
        std::fs::write(&status_path, "Name:\tbash\nUid:\t1000\t1000\t1000\t1000\n")
            .expect("failed to write status file");

        assert_eq!(owner_uid(&status_path), "1000");
    }

    #[test]
    fn test_owner_uid_missing_file() {
        let dir = tempdir().expect("failed to create temp dir");
        assert_eq!(owner_uid(&dir.path().join("status")), "");
    }

    #[test]
    fn test_lookup_user_name() {
        let dir = tempdir().expect("failed to create temp dir");
        let passwd_path = dir.path().join("passwd");
        std::fs::write(&passwd_path, PASSWD_FIXTURE).expect("failed to write passwd file");

        assert_eq!(lookup_user_name(&passwd_path, "0"), "root");
        assert_eq!(lookup_user_name(&passwd_path, "1000"), "alice");
    }

    #[test]
    fn test_lookup_user_name_unresolved() {
        let dir = tempdir().expect("failed to create temp dir");
        let passwd_path = dir.path().join("passwd");
        std::fs::write(&passwd_path, PASSWD_FIXTURE).expect("failed to write passwd file");

        assert_eq!(lookup_user_name(&passwd_path, "9999"), "");
        assert_eq!(lookup_user_name(&passwd_path, ""), "");
    }

    #[test]
    fn test_lookup_user_name_missing_file() {
        let dir = tempdir().expect("failed to create temp dir");
        assert_eq!(lookup_user_name(&dir.path().join("passwd"), "0"), "");
    }

    #[test]
    fn test_user_table() {
        let dir = tempdir().expect("failed to create temp dir");
        let passwd_path = dir.path().join("passwd");
        std::fs::write(&passwd_path, PASSWD_FIXTURE).expect("failed to write passwd file");

        let table = UserTable::load(&passwd_path);
        assert_eq!(table.len(), 4);
        assert_eq!(table.name_for("1001"), "bob");
        assert_eq!(table.name_for("9999"), "");
    }

    #[test]
    fn test_user_table_skips_malformed_lines() {
        let dir = tempdir().expect("failed to create temp dir");
        let passwd_path = dir.path().join("passwd");
        std::fs::write(&passwd_path, "nocolons\nroot:x:0:0:root:/root:/bin/bash\n:x:7:7::/:/bin/sh\n")
            .expect("failed to write passwd file");

        let table = UserTable::load(&passwd_path);
        assert_eq!(table.len(), 1);
        assert_eq!(table.name_for("0"), "root");
    }

    #[test]
    fn test_user_table_missing_file() {
        let dir = tempdir().expect("failed to create temp dir");
        let table = UserTable::load(&dir.path().join("passwd"));
        assert!(table.is_empty());
    }
}
