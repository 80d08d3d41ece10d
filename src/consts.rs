//! Общие константы формата дампа (пути, имена файлов, маркеры).

// -------- Output layout --------
// <save_dir>/MapAreaTextures/DUMP_<timestamp>.json
pub const DUMP_DIR: &str = "MapAreaTextures";
pub const DUMP_PREFIX: &str = "DUMP_";
pub const DUMP_EXT: &str = "json";

// UTC, секундная гранулярность: 2024.03.05-11.57.55
pub const DUMP_TIMESTAMP_FMT: &str = "%Y.%m.%d-%H.%M.%S";

// Advisory lock внутри каталога дампов (один writer на каталог).
pub const DUMP_LOCK_FILE: &str = "LOCK";

// -------- Resolver --------
// Absent reference renders as "NULL <label>".
pub const NULL_REF_PREFIX: &str = "NULL";

// -------- Defaults --------
pub const DEFAULT_SAVE_DIR: &str = "Saved";
