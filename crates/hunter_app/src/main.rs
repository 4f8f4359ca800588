mod app;
mod config;
mod convert;
mod effects;
mod logging;
mod render;

use clap::Parser;

fn main() {
    let cli = config::Cli::parse();
    logging::initialize(logging::LogDestination::File);
    let config = config::AppConfig::from_env();
    std::process::exit(app::run(cli.command, config));
}
