//! The process-wide working directory.
//!
//! The working directory is global to the process. [`change_dir`] is its only
//! writer and is called only by the `cd` builtin. Readers are [`current_dir`]
//! and every program launched afterwards, which inherits it at fork time.
//! The interpreter has a single thread of control, so no locking is involved.

use anyhow::{Context, Result};
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Current working directory of this process.
pub fn current_dir() -> Result<PathBuf> {
    stdenv::current_dir().context("can't read current directory")
}

/// Change the working directory of this process to `target`.
///
/// Relative paths resolve against the current directory. On failure the
/// directory is left unchanged and the OS error is returned.
pub fn change_dir(target: &Path) -> Result<()> {
    stdenv::set_current_dir(target).with_context(|| format!("cd: {}", target.display()))?;
    tracing::debug!(dir = %target.display(), "working directory changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CWD_LOCK;
    use std::fs;

    #[test]
    fn test_change_dir_and_back() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = current_dir().unwrap();
        let dir = stdenv::temp_dir().join(format!("tinysh_env_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let target = dir.canonicalize().expect("canonicalize temp dir");

        change_dir(&target).unwrap();
        assert_eq!(current_dir().unwrap(), target);

        change_dir(&before).unwrap();
        assert_eq!(current_dir().unwrap(), before);
        let _ = fs::remove_dir_all(target);
    }

    #[test]
    fn test_change_dir_to_missing_path_keeps_cwd() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = current_dir().unwrap();

        let err = change_dir(Path::new("/definitely/not/a/real/dir")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/a/real/dir"));
        assert_eq!(current_dir().unwrap(), before);
    }
}
