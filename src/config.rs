//! Process configuration: `.env` loading and log4rs setup.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Load variables from `.env` if present. Returns the file used.
pub fn load_env() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Initialise logging from a log4rs file, or fall back to warnings on stderr.
pub fn init_logging(config_file: &Path) -> Result<(), Box<dyn Error>> {
    if config_file.exists() {
        log4rs::init_file(config_file, Default::default())?;
        log::debug!("Logging configured from {}", config_file.display());
        return Ok(());
    }

    log4rs::init_config(fallback_config(LevelFilter::Warn)?)?;
    log::debug!(
        "Log config {} not found, using stderr fallback",
        config_file.display()
    );
    Ok(())
}

/// Console-only configuration used when no log4rs file is available.
pub fn fallback_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:5})} {t} - {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    Ok(config)
}
