use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use MapAreaDump::dumper::{CommandSender, ExecutionStatus};
use MapAreaDump::scene::load_registry;
use MapAreaDump::{metrics, DumpConfig, MapAreaDumper};

const COMMAND_LABEL: &str = "dumpmapareas";

pub fn exec(scene: PathBuf, save_dir: Option<PathBuf>, json: bool, strict: bool) -> Result<()> {
    let registry =
        load_registry(&scene).with_context(|| format!("load scene {}", scene.display()))?;

    let mut cfg = DumpConfig::from_env();
    if let Some(dir) = save_dir {
        cfg = cfg.with_save_dir(dir);
    }
    if strict {
        cfg = cfg.with_strict_status(true);
    }
    log::debug!("{}", cfg);
    let dumper = MapAreaDumper::new(cfg);

    if json {
        // Прямой вызов пайплайна: ошибка записи всегда видна вызывающему.
        let report = dumper.dump(&registry)?;
        let out = serde_json::json!({
            "report": report,
            "metrics": metrics::snapshot(),
        });
        let s = serde_json::to_string_pretty(&out).context("serialize report")?;
        println!("{s}");
        return Ok(());
    }

    let sender = CommandSender::new("cli");
    match dumper.execute_command(&registry, &sender, &[], COMMAND_LABEL) {
        ExecutionStatus::Completed => {
            let m = metrics::snapshot();
            if m.dumps_failed > 0 {
                println!("dump: COMPLETED (write failed, see log)");
            } else {
                println!(
                    "dump: COMPLETED ({} instance(s), {} B)",
                    m.instances_dumped, m.bytes_written
                );
            }
            Ok(())
        }
        ExecutionStatus::Failed => Err(anyhow!("dump failed")),
    }
}
