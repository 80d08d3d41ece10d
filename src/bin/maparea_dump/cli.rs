use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Map area texture dumper CLI
#[derive(Parser, Debug)]
#[command(
    name = "maparea-dump",
    version,
    about = "Snapshot live map area textures to timestamped JSON",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Load a scene file and write one dump
    ///
    /// Пример:
    ///   maparea-dump dump --scene ./scene.json --save-dir ./Saved
    ///   -> ./Saved/MapAreaTextures/DUMP_2024.03.05-11.57.55.json
    Dump {
        /// Scene JSON describing the live objects
        #[arg(long)]
        scene: PathBuf,
        /// Project save dir (overrides MAD_SAVE_DIR)
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Print the dump report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Exit with an error when the dump fails (command status reflects failure)
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// List existing dumps in <save_dir>/MapAreaTextures
    List {
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// JSON output (array of file names)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print dump counters of this process
    ///
    /// Счётчики живут в процессе: с --scene сначала выполняется один дамп.
    Metrics {
        #[arg(long)]
        scene: Option<PathBuf>,
        #[arg(long)]
        save_dir: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
