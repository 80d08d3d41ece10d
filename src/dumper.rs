//! Dump pipeline: enumerate -> build documents -> write snapshot.
//!
//! Выполняется синхронно, целиком, на потоке-владельце реестра. Реестр
//! заимствуется иммутабельно на всё время дампа.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{DumpConfig, DumperBuilder};
use crate::document::{DocumentBuilder, DocumentOptions, TextureDocument};
use crate::metrics;
use crate::registry::{ObjectRegistry, TypeTag};
use crate::resolve::Resolver;
use crate::writer::write_snapshot;

/// Status reported back to whatever dispatched the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

/// Operator identity as handed over by the dispatcher. Not used by the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSender {
    pub name: String,
}

impl CommandSender {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of a successful dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpReport {
    pub path: PathBuf,
    pub timestamp: String,
    pub instances: usize,
    pub bytes: u64,
}

/// Enumerate live map area textures and build their documents, in
/// enumeration order.
pub fn collect_documents(registry: &ObjectRegistry, opts: DocumentOptions) -> Vec<TextureDocument> {
    let ids = registry.enumerate_live(TypeTag::MapAreaTexture);
    debug!("{} live {} instance(s)", ids.len(), TypeTag::MapAreaTexture);
    DocumentBuilder::new(Resolver::new(registry), opts).build_all(&ids)
}

#[derive(Debug, Clone)]
pub struct MapAreaDumper {
    cfg: DumpConfig,
}

impl MapAreaDumper {
    pub fn new(cfg: DumpConfig) -> Self {
        Self { cfg }
    }

    pub fn builder() -> DumperBuilder {
        DumperBuilder::new()
    }

    pub fn config(&self) -> &DumpConfig {
        &self.cfg
    }

    /// Dump with the current UTC time as capture instant.
    pub fn dump(&self, registry: &ObjectRegistry) -> Result<DumpReport> {
        self.dump_at(registry, Utc::now())
    }

    /// Dump with an explicit capture instant (names the output file).
    pub fn dump_at(&self, registry: &ObjectRegistry, at: DateTime<Utc>) -> Result<DumpReport> {
        metrics::record_dump_started();
        info!("Dumping map area textures...");
        debug!(
            "registry: {} live object(s), {} null slot(s)",
            registry.live_count(),
            registry.null_slots()
        );

        let docs = collect_documents(registry, self.cfg.document_options());
        let written = match write_snapshot(&docs, &self.cfg.save_dir, &at, self.cfg.write_options())
        {
            Ok(w) => w,
            Err(e) => {
                metrics::record_dump_failed();
                return Err(e);
            }
        };

        metrics::record_dump_completed(docs.len() as u64, written.bytes);
        info!(
            "Dumped {} map area texture(s) to {}",
            docs.len(),
            written.path.display()
        );

        Ok(DumpReport {
            path: written.path,
            timestamp: written.timestamp,
            instances: docs.len(),
            bytes: written.bytes,
        })
    }

    /// Entry point for a command dispatcher. Sender, arguments and label are
    /// ignored. A failed write is logged; it only shows in the returned status
    /// when `strict_status` is on.
    pub fn execute_command(
        &self,
        registry: &ObjectRegistry,
        sender: &CommandSender,
        arguments: &[String],
        label: &str,
    ) -> ExecutionStatus {
        debug!(
            "command '{}' from '{}' ({} arg(s))",
            label,
            sender.name,
            arguments.len()
        );
        if !arguments.is_empty() {
            warn!("'{}' takes no arguments, ignoring {:?}", label, arguments);
        }

        match self.dump(registry) {
            Ok(_) => ExecutionStatus::Completed,
            Err(e) => {
                error!("map area dump failed: {:#}", e);
                if self.cfg.strict_status {
                    ExecutionStatus::Failed
                } else {
                    ExecutionStatus::Completed
                }
            }
        }
    }
}
