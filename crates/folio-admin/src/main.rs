use clap::Parser;
use folio_admin::cli::Cli;
use folio_admin::{commands, App};
use tracing::info;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "folio_admin=debug,folio_core=debug,folio_http=debug,info"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = folio_common::FolioSettings::load()?;
    let app = App::connect(&settings, folio_common::session_path())?;
    info!("=== Folio Admin [backend: {}] ===", settings.backend_url);

    commands::run(&app, cli.command, cli.json).await
}
