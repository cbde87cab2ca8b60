mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, bail};
use app::CatalogExplorerApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

const USAGE: &str = "usage: catalog-explorer [DATASET] [--config FILE]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    dataset: Option<PathBuf>,
    config: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                out.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => out.help = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ if out.dataset.is_some() => bail!("only one dataset can be given\n{USAGE}"),
            _ => out.dataset = Some(PathBuf::from(arg)),
        }
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = DashboardConfig::load(args.config.as_deref()).context("loading config")?;
    log::debug!("Using {config:?}");

    let mut state = AppState::new(config);
    // A dataset named on the command line must load, or we don't start.
    if let Some(path) = &args.dataset {
        let catalog = data::loader::load_catalog(path, &state.config)?;
        state.set_catalog(catalog);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Catalog Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
