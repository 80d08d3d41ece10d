//! Lightweight global metrics for the dumper.
//!
//! Потокобезопасные атомарные счётчики (process-wide):
//! - запуски дампа (started / completed / failed)
//! - количество выгруженных инстансов
//! - объём записанного JSON

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static DUMPS_STARTED: AtomicU64 = AtomicU64::new(0);
static DUMPS_COMPLETED: AtomicU64 = AtomicU64::new(0);
static DUMPS_FAILED: AtomicU64 = AtomicU64::new(0);
static INSTANCES_DUMPED: AtomicU64 = AtomicU64::new(0);
static BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub dumps_started: u64,
    pub dumps_completed: u64,
    pub dumps_failed: u64,
    pub instances_dumped: u64,
    pub bytes_written: u64,
}

impl MetricsSnapshot {
    pub fn avg_instances_per_dump(&self) -> f64 {
        if self.dumps_completed == 0 {
            0.0
        } else {
            self.instances_dumped as f64 / self.dumps_completed as f64
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dumps_started:     {}", self.dumps_started)?;
        writeln!(f, "dumps_completed:   {}", self.dumps_completed)?;
        writeln!(f, "dumps_failed:      {}", self.dumps_failed)?;
        writeln!(f, "instances_dumped:  {}", self.instances_dumped)?;
        writeln!(f, "bytes_written:     {}", self.bytes_written)?;
        write!(f, "avg_instances:     {:.2}", self.avg_instances_per_dump())
    }
}

pub fn record_dump_started() {
    DUMPS_STARTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_dump_completed(instances: u64, bytes: u64) {
    DUMPS_COMPLETED.fetch_add(1, Ordering::Relaxed);
    INSTANCES_DUMPED.fetch_add(instances, Ordering::Relaxed);
    BYTES_WRITTEN.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_dump_failed() {
    DUMPS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        dumps_started: DUMPS_STARTED.load(Ordering::Relaxed),
        dumps_completed: DUMPS_COMPLETED.load(Ordering::Relaxed),
        dumps_failed: DUMPS_FAILED.load(Ordering::Relaxed),
        instances_dumped: INSTANCES_DUMPED.load(Ordering::Relaxed),
        bytes_written: BYTES_WRITTEN.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    DUMPS_STARTED.store(0, Ordering::Relaxed);
    DUMPS_COMPLETED.store(0, Ordering::Relaxed);
    DUMPS_FAILED.store(0, Ordering::Relaxed);
    INSTANCES_DUMPED.store(0, Ordering::Relaxed);
    BYTES_WRITTEN.store(0, Ordering::Relaxed);
}
