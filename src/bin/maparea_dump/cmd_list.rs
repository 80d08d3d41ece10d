use anyhow::{Context, Result};
use std::path::PathBuf;

use MapAreaDump::writer::{dump_dir, list_dumps};
use MapAreaDump::DumpConfig;

/// Список DUMP_*.json в каталоге дампов (только имена, без разбора).
pub fn exec(save_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let save_dir = save_dir.unwrap_or_else(|| DumpConfig::from_env().save_dir);
    let names = list_dumps(&save_dir)
        .with_context(|| format!("list dumps at {}", dump_dir(&save_dir).display()))?;

    if json {
        let s = serde_json::to_string(&names).context("serialize dump list")?;
        println!("{s}");
        return Ok(());
    }
    if names.is_empty() {
        println!("(no dumps)");
        return Ok(());
    }
    for n in names {
        println!("{n}");
    }
    Ok(())
}
