use clap::Parser;
use colored::Colorize;
use std::error::Error;
use vlsm_planner::cmd::{run, Cli};
use vlsm_planner::config;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    config::load_env();
    let cli = Cli::parse();
    config::init_logging(&cli.log_config)?;
    log::info!("#Start main()");

    let stdout = std::io::stdout();
    if let Err(e) = run(&cli, &mut stdout.lock()) {
        log::error!("{e}");
        eprintln!("{} {e}", "error:".red());
        std::process::exit(1);
    }
    Ok(())
}
