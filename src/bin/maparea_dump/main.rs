use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod cmd_dump;
mod cmd_list;
mod cmd_metrics;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./maparea-dump dump --scene scene.json
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse_args();
    match cli.cmd {
        cli::Cmd::Dump {
            scene,
            save_dir,
            json,
            strict,
        } => cmd_dump::exec(scene, save_dir, json, strict),

        cli::Cmd::List { save_dir, json } => cmd_list::exec(save_dir, json),

        cli::Cmd::Metrics {
            scene,
            save_dir,
            json,
        } => cmd_metrics::exec(scene, save_dir, json),
    }
}
