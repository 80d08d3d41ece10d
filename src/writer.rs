//! Snapshot writer: aggregate document -> <save_dir>/MapAreaTextures/DUMP_<ts>.json
//!
//! Замечания:
//! - Весь JSON собирается в памяти и пишется одним файлом через tmp+rename,
//!   так что читатель никогда не видит частично записанный дамп.
//! - Ошибка записи — единственная терминальная ошибка дампа, без ретраев.
//! - Два дампа в одну и ту же UTC-секунду пишут в одно имя: побеждает последний.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::consts::{DUMP_DIR, DUMP_EXT, DUMP_PREFIX, DUMP_TIMESTAMP_FMT};
use crate::lock::acquire_dump_lock;

/// Writer options (see DumpConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub pretty: bool,
    pub lock: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            lock: true,
        }
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenSnapshot {
    pub path: PathBuf,
    pub timestamp: String,
    pub bytes: u64,
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DUMP_TIMESTAMP_FMT).to_string()
}

/// <save_dir>/MapAreaTextures
pub fn dump_dir(save_dir: &Path) -> PathBuf {
    save_dir.join(DUMP_DIR)
}

/// DUMP_<YYYY.MM.DD-HH.MM.SS>.json
pub fn dump_file_name(at: &DateTime<Utc>) -> String {
    format!("{}{}.{}", DUMP_PREFIX, format_timestamp(at), DUMP_EXT)
}

pub fn dump_path(save_dir: &Path, at: &DateTime<Utc>) -> PathBuf {
    dump_dir(save_dir).join(dump_file_name(at))
}

/// Serialize `docs` as one JSON array and persist it under `save_dir`.
pub fn write_snapshot<T: Serialize>(
    docs: &[T],
    save_dir: &Path,
    at: &DateTime<Utc>,
    opts: WriteOptions,
) -> Result<WrittenSnapshot> {
    let encoded = match opts.pretty {
        true => serde_json::to_vec_pretty(docs),
        false => serde_json::to_vec(docs),
    };
    let data = encoded.context("serialize map area dump")?;

    let dir = dump_dir(save_dir);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let _lock = match opts.lock {
        true => {
            let l = acquire_dump_lock(&dir)?;
            debug!("holding {}", l.path().display());
            Some(l)
        }
        false => None,
    };

    let path = dump_path(save_dir, at);
    let tmp = path.with_extension(format!("{}.tmp", DUMP_EXT));
    if let Err(e) = write_file_replace(&tmp, &path, &data) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    debug!("wrote {} bytes to {}", data.len(), path.display());

    Ok(WrittenSnapshot {
        path,
        timestamp: format_timestamp(at),
        bytes: data.len() as u64,
    })
}

fn write_file_replace(tmp: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(tmp)
        .with_context(|| format!("open {}", tmp.display()))?;
    f.write_all(data)
        .with_context(|| format!("write {}", tmp.display()))?;
    let _ = f.sync_all();
    drop(f);

    fs::rename(tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// File names of existing dumps (sorted; the timestamp format sorts
/// chronologically). Missing directory -> empty list.
pub fn list_dumps(save_dir: &Path) -> Result<Vec<String>> {
    let dir = dump_dir(save_dir);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("read_dir {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let ext = format!(".{}", DUMP_EXT);
        if name.starts_with(DUMP_PREFIX) && name.ends_with(&ext) {
            out.push(name);
        }
    }
    out.sort();
    Ok(out)
}
