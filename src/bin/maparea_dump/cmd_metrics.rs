use anyhow::{Context, Result};
use std::path::PathBuf;

use MapAreaDump::scene::load_registry;
use MapAreaDump::{metrics, DumpConfig, MapAreaDumper};

pub fn exec(scene: Option<PathBuf>, save_dir: Option<PathBuf>, json: bool) -> Result<()> {
    if let Some(scene) = scene {
        let registry =
            load_registry(&scene).with_context(|| format!("load scene {}", scene.display()))?;
        let mut cfg = DumpConfig::from_env();
        if let Some(dir) = save_dir {
            cfg = cfg.with_save_dir(dir);
        }
        // Ошибка записи уже учтена в dumps_failed; печатаем счётчики в любом случае.
        if let Err(e) = MapAreaDumper::new(cfg).dump(&registry) {
            log::warn!("dump failed: {:#}", e);
        }
    }

    let m = metrics::snapshot();
    if json {
        let s = serde_json::to_string_pretty(&m).context("serialize metrics")?;
        println!("{s}");
    } else {
        println!("{m}");
    }
    Ok(())
}
