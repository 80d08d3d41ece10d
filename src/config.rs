//! Centralized configuration and builder for the map area dumper.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - DumpConfig::from_env() reads MAD_* env vars; builder-style setters override.
//!
//! Env:
//! - MAD_SAVE_DIR      — project save dir (dumps go to <dir>/MapAreaTextures), default "Saved"
//! - MAD_PRETTY        — pretty-printed JSON, default true
//! - MAD_HEX_PREFIX    — '#' before palette hex colors, default true
//! - MAD_STRICT_STATUS — write failure -> ExecutionStatus::Failed, default false
//! - MAD_LOCK          — advisory LOCK in the dump dir, default true

use std::fmt;
use std::path::PathBuf;

use crate::consts::DEFAULT_SAVE_DIR;
use crate::document::DocumentOptions;
use crate::writer::WriteOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    /// Project save directory.
    pub save_dir: PathBuf,

    /// Pretty-print the JSON (2-space indent). Env: MAD_PRETTY
    pub pretty: bool,

    /// Prefix palette colors with '#'. Env: MAD_HEX_PREFIX
    pub hex_prefix: bool,

    /// Report writer failure through the command status instead of always
    /// returning Completed. Env: MAD_STRICT_STATUS
    pub strict_status: bool,

    /// Take <dump_dir>/LOCK while writing. Env: MAD_LOCK
    pub lock_dump_dir: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            pretty: true,
            hex_prefix: true,
            strict_status: false,
            lock_dump_dir: true,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

impl DumpConfig {
    /// Load configuration from environment variables (unset/invalid -> default).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("MAD_SAVE_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.save_dir = PathBuf::from(s);
            }
        }
        if let Some(on) = env_flag("MAD_PRETTY") {
            cfg.pretty = on;
        }
        if let Some(on) = env_flag("MAD_HEX_PREFIX") {
            cfg.hex_prefix = on;
        }
        if let Some(on) = env_flag("MAD_STRICT_STATUS") {
            cfg.strict_status = on;
        }
        if let Some(on) = env_flag("MAD_LOCK") {
            cfg.lock_dump_dir = on;
        }

        cfg
    }

    pub fn with_save_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn with_pretty(mut self, on: bool) -> Self {
        self.pretty = on;
        self
    }

    pub fn with_hex_prefix(mut self, on: bool) -> Self {
        self.hex_prefix = on;
        self
    }

    pub fn with_strict_status(mut self, on: bool) -> Self {
        self.strict_status = on;
        self
    }

    pub fn with_lock_dump_dir(mut self, on: bool) -> Self {
        self.lock_dump_dir = on;
        self
    }

    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            hex_prefix: self.hex_prefix,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            pretty: self.pretty,
            lock: self.lock_dump_dir,
        }
    }
}

impl fmt::Display for DumpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DumpConfig {{ \
             save_dir: {}, \
             pretty: {}, \
             hex_prefix: {}, \
             strict_status: {}, \
             lock_dump_dir: {} \
             }}",
            self.save_dir.display(),
            self.pretty,
            self.hex_prefix,
            self.strict_status,
            self.lock_dump_dir,
        )
    }
}

/// Builder for [`MapAreaDumper`](crate::dumper::MapAreaDumper).
#[derive(Clone, Debug)]
pub struct DumperBuilder {
    cfg: DumpConfig,
}

impl Default for DumperBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: DumpConfig::from_env(),
        }
    }
}

impl DumperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: DumpConfig::default(),
        }
    }

    pub fn save_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cfg.save_dir = dir.into();
        self
    }

    pub fn pretty(mut self, on: bool) -> Self {
        self.cfg.pretty = on;
        self
    }

    pub fn hex_prefix(mut self, on: bool) -> Self {
        self.cfg.hex_prefix = on;
        self
    }

    pub fn strict_status(mut self, on: bool) -> Self {
        self.cfg.strict_status = on;
        self
    }

    pub fn lock_dump_dir(mut self, on: bool) -> Self {
        self.cfg.lock_dump_dir = on;
        self
    }

    pub fn config(&self) -> &DumpConfig {
        &self.cfg
    }

    pub fn build(self) -> crate::dumper::MapAreaDumper {
        crate::dumper::MapAreaDumper::new(self.cfg)
    }
}
