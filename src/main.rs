mod client;
mod commands;
mod config;
mod errors;
mod logging;
mod protocol;
mod security;
mod server;


use crate::config::Config;
use anyhow::Context;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

const DEFAULT_CONFIG: &str = "fileshed.toml";

enum Mode {
    Serve,
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut mode = Mode::Serve;
    let mut config_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "serve" => mode = Mode::Serve,
            "shell" => mode = Mode::Shell,
            "--config" => {
                i += 1;
                if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
                config_path = Some(PathBuf::from(&args[i]));
            }
            other => { eprintln!("unknown argument: {other}\nusage: fileshed [serve|shell] [--config PATH]"); std::process::exit(2); }
        }
        i += 1;
    }

    logging::init(match mode { Mode::Serve => "info", Mode::Shell => "warn" });

    let cfg = match config_path {
        Some(path) => Config::load(&path).with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => Config::load(Path::new(DEFAULT_CONFIG)).context("loading config")?,
        None => Config::default(),
    };
    cfg.validate().context("validating config")?;

    match mode {
        Mode::Shell => client::shell(&cfg).await,
        Mode::Serve => {
            let root = cfg.prepare_root().context("preparing root directory")?;
            let resolver = Arc::new(security::PathResolver::new(&root));
            let registry = protocol::registry::CommandRegistry::new(resolver);

            info!(addr = %cfg.addr(), root = %root.display(), commands = ?registry.list_names(), "fileshed ready");
            println!("fileshed ready addr={} root={}", cfg.addr(), root.display());

            server::serve(cfg, registry).await.context("running server")
        }
    }
}
