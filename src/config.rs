use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use log::warn;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub textboxfield: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    const TEXTBOXFIELD_LEVEL: &str = "info";

    fn default() -> Self {
        LoggingConfig {
            textboxfield: Self::TEXTBOXFIELD_LEVEL.to_string(),
        }
    }

    fn ensure_valid(&mut self) {
        let str_original = self.textboxfield.clone();
        self.textboxfield = self.textboxfield.trim().to_ascii_lowercase();
        if !Self::LOG_LEVELS.contains(&self.textboxfield.as_str()) {
            eprintln!(
                "Config error: textboxfield log level of '{}' is invalid - using default of '{}'",
                str_original,
                Self::TEXTBOXFIELD_LEVEL
            );
            self.textboxfield = Self::TEXTBOXFIELD_LEVEL.to_owned();
        }
    }

    /// flexi_logger spec string
    pub fn log_spec(&self) -> String {
        format!("textboxfield={}", self.textboxfield)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    const DB_FILENAME: &str = "textboxfield.db";

    fn default(data_dir: &Path) -> Self {
        DatabaseConfig {
            path: data_dir.join(Self::DB_FILENAME),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl Config {
    const ENV_PREFIX: &str = "TEXTBOXFIELD_";

    /// Loads the configuration from a TOML file located in the app's data directory,
    /// then applies `TEXTBOXFIELD_` environment overrides (e.g. `TEXTBOXFIELD_DATABASE__PATH`).
    /// If the file is missing or fails to parse, defaults are used.
    /// Additionally, writes the default config to disk if no file exists.
    pub fn load_config(project_dirs: &ProjectDirs) -> Self {
        let data_dir = project_dirs.data_local_dir();
        let config_path = data_dir.join("config.toml");

        let default_config = Config {
            logging: LoggingConfig::default(),
            database: DatabaseConfig::default(data_dir),
        };

        // If the config file doesn't exist, write the default configuration to disk.
        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!(
                        "Failed to create configuration directory {}: {}",
                        parent.display(),
                        e
                    );
                }
            }
            if let Ok(toml_string) = toml::to_string_pretty(&default_config) {
                if let Err(e) = fs::write(&config_path, toml_string) {
                    eprintln!(
                        "Failed to write default config to {}: {}",
                        config_path.display(),
                        e
                    );
                }
            } else {
                eprintln!("Failed to serialize default config.");
            }
        }

        Self::load_from(&config_path, default_config)
    }

    fn load_from(config_path: &Path, default_config: Config) -> Self {
        // Defaults, then the TOML file (if it exists), then the environment
        let figment = Figment::from(Serialized::defaults(default_config.clone()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        // Attempt to extract the configuration; on error, print a message and fall back to defaults.
        let mut config = figment.extract().unwrap_or_else(|err| {
            eprintln!(
                "Could not load config file {}: {}. Using default configuration.",
                config_path.display(),
                err
            );
            default_config
        });

        config.ensure_valid();

        config
    }

    pub fn get() -> Option<&'static Config> {
        CONFIG.get()
    }

    /// Makes this the process-wide config. Returns false, keeping the config
    /// already installed, if one was set before.
    pub fn set_global(self) -> bool {
        match CONFIG.set(self) {
            Ok(()) => true,
            Err(rejected) => {
                warn!(
                    "Configuration already set; ignoring database path {}",
                    rejected.database.path.display()
                );
                false
            }
        }
    }

    fn ensure_valid(&mut self) {
        self.logging.ensure_valid();
    }
}
