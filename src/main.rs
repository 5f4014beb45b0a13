mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let (settings, problem) = tally::settings::load_settings();
    init_tracing(&settings.log_level);
    if let Some(e) = problem {
        tracing::warn!("ignoring settings: {e}");
    }

    if let Err(e) = cli::run(cli.command, &settings) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
