//! File-based locking for the dump directory.
//!
//! Cross-platform (fs2) advisory lock: one writer per
//! `<save_dir>/MapAreaTextures` at a time, so two processes never interleave
//! their tmp+rename sequences. Last writer still wins on a same-second name.
//!
//! Lock file path: <dump_dir>/LOCK
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::DUMP_LOCK_FILE;

pub struct DumpLock {
    file: std::fs::File,
    path: PathBuf,
}

impl DumpLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DumpLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn lock_file_path(dump_dir: &Path) -> PathBuf {
    dump_dir.join(DUMP_LOCK_FILE)
}

fn open_lock_file(dump_dir: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(dump_dir);
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Acquire the exclusive dump lock. Blocks until acquired.
pub fn acquire_dump_lock(dump_dir: &Path) -> Result<DumpLock> {
    let file = open_lock_file(dump_dir)?;
    let path = lock_file_path(dump_dir);
    file.lock_exclusive()
        .with_context(|| format!("lock_exclusive {}", path.display()))?;
    Ok(DumpLock { file, path })
}

/// Non-blocking variant. Returns Err if another writer holds the lock.
pub fn try_acquire_dump_lock(dump_dir: &Path) -> Result<DumpLock> {
    let file = open_lock_file(dump_dir)?;
    let path = lock_file_path(dump_dir);
    file.try_lock_exclusive()
        .with_context(|| format!("try_lock_exclusive failed: {}", path.display()))?;
    Ok(DumpLock { file, path })
}
