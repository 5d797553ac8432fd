mod cli;
mod config;
mod db;
mod error;
mod extension;
mod headers;
mod migrator;
mod schema;
mod upgrade;

use cli::Cli;
use config::Config;
use directories::ProjectDirs;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::{debug, error};

use crate::error::TextBoxError;

fn setup_logging(config: &Config, project_dirs: &ProjectDirs) -> Result<LoggerHandle, TextBoxError> {
    // RUST_LOG takes precedence over the configured level
    let log_dir = project_dirs.data_local_dir().join("logs");
    Logger::try_with_env_or_str(config.logging.log_spec())
        .and_then(|logger| {
            logger
                .log_to_file(FileSpec::default().directory(log_dir))
                .format(flexi_logger::detailed_format)
                .duplicate_to_stderr(flexi_logger::Duplicate::Warn)
                .start()
        })
        .map_err(|e| TextBoxError::Error(format!("Failed to start logger: {}", e)))
}

fn main() {
    let project_dirs = match ProjectDirs::from("", "", "textboxfield") {
        Some(dirs) => dirs,
        None => {
            eprintln!("Could not determine project directories");
            std::process::exit(1);
        }
    };

    let config = Config::load_config(&project_dirs);

    let _logger = match setup_logging(&config, &project_dirs) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("{}", err);
            None
        }
    };

    config.set_global();
    debug!("Command-line args: {:?}", std::env::args_os().collect::<Vec<_>>());

    if let Err(err) = Cli::handle_command_line() {
        error!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
