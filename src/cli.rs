use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::db::{Backend, Recorder, SqliteBackend};
use crate::error::TextBoxError;
use crate::extension::Extension;
use crate::headers::{self, AppendedHeaders, HeaderCategory};
use crate::schema::{Dialect, Statement, SETTINGS_LAYOUT};

#[derive(Parser)]
#[command(
    name = "textboxfield",
    version,
    about = "Text Box field: settings table install, uninstall and upgrade"
)]
pub struct Cli {
    /// Database file (defaults to the configured path)
    #[arg(long = "db", short = 'd', global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the settings table
    Install,

    /// Drop the settings table
    Uninstall,

    /// Bring the settings table up to the current layout
    Update {
        /// Version the extension was at before this release
        #[arg(long = "previous-version", short = 'p')]
        previous_version: String,
    },

    /// Report which columns are present and which upgrade steps would run
    Status,

    /// Print the statements that create the settings table in a given dialect
    Sql {
        #[arg(value_enum, default_value = "mysql")]
        dialect: Dialect,
    },

    /// Print extension information
    About,

    /// Print the assets an admin page needs for a category
    Headers {
        #[arg(value_enum)]
        category: HeaderCategory,

        /// Site root the asset URLs are built from
        #[arg(long = "base-url", default_value = "")]
        base_url: String,
    },
}

impl Cli {
    pub fn handle_command_line() -> Result<(), TextBoxError> {
        let args = Cli::parse();
        args.run()
    }

    fn run(self) -> Result<(), TextBoxError> {
        match self.command {
            Command::Sql { dialect } => {
                for statement in Statement::create_table(dialect, &SETTINGS_LAYOUT)? {
                    println!("{};", statement.sql);
                }
                Ok(())
            }
            Command::About => print_json(&Extension::<SqliteBackend>::about()),
            Command::Headers { category, base_url } => {
                let mut appended = AppendedHeaders::default();
                print_json(&headers::append_headers(&mut appended, category, &base_url))
            }
            Command::Install => {
                let mut ext = Self::open(self.db)?;
                ext.install()?;
                println!("Installed ({} statement(s))", ext.backend().statements().len());
                Ok(())
            }
            Command::Uninstall => {
                Self::open(self.db)?.uninstall()?;
                println!("Uninstalled");
                Ok(())
            }
            Command::Update { previous_version } => {
                let mut ext = Self::open(self.db)?;
                let report = ext.update(&previous_version)?;
                for step in &report.applied {
                    println!("applied: {}", step);
                }
                println!(
                    "Updated ({} step(s), {} statement(s))",
                    report.applied.len(),
                    ext.backend().statements().len()
                );
                Ok(())
            }
            Command::Status => {
                let (status, pending) = Self::open(self.db)?.status()?;
                print_json(&serde_json::json!({
                    "canonical": status.is_canonical(),
                    "missing": status.missing().collect::<Vec<_>>(),
                    "status": status,
                    "pending": pending,
                }))
            }
        }
    }

    fn open(db: Option<PathBuf>) -> Result<Extension<Recorder<SqliteBackend>>, TextBoxError> {
        let path = match db {
            Some(path) => path,
            None => Config::get()
                .map(|c| c.database.path.clone())
                .ok_or_else(|| TextBoxError::Error("No database path configured".to_owned()))?,
        };
        let backend = SqliteBackend::open(&path)?;
        info!("Using {} database {}", backend.dialect(), path.display());
        Ok(Extension::new(Recorder::new(backend)))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), TextBoxError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TextBoxError::Error(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parsing_update_requires_previous_version() {
        assert!(Cli::try_parse_from(["textboxfield", "update"]).is_err());

        let cli = Cli::try_parse_from(["textboxfield", "update", "--previous-version", "1.6"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Update { ref previous_version } if previous_version == "1.6"
        ));
    }

    #[test]
    fn test_cli_parsing_global_db_flag() {
        let cli = Cli::try_parse_from(["textboxfield", "status", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_cli_parsing_headers_category() {
        let cli = Cli::try_parse_from(["textboxfield", "headers", "filter"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Headers {
                category: HeaderCategory::Filter,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["textboxfield", "headers", "bogus"]).is_err());
    }

    #[test]
    fn test_cli_parsing_sql_dialect() {
        let cli = Cli::try_parse_from(["textboxfield", "sql"]).unwrap();
        assert!(matches!(cli.command, Command::Sql { dialect: Dialect::MySql }));
        let cli = Cli::try_parse_from(["textboxfield", "sql", "sqlite"]).unwrap();
        assert!(matches!(cli.command, Command::Sql { dialect: Dialect::Sqlite }));
    }

    #[test]
    fn test_cli_parsing_invalid_arguments() {
        assert!(Cli::try_parse_from(["textboxfield"]).is_err());
        assert!(Cli::try_parse_from(["textboxfield", "nonexistent-command"]).is_err());
    }

    #[test]
    fn test_install_update_uninstall_on_file() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("settings.db");
        let db_arg = db.to_str().unwrap();

        for args in [
            vec!["textboxfield", "--db", db_arg, "install"],
            vec!["textboxfield", "--db", db_arg, "update", "-p", "2.2"],
            vec!["textboxfield", "--db", db_arg, "status"],
            vec!["textboxfield", "--db", db_arg, "uninstall"],
        ] {
            Cli::try_parse_from(args).unwrap().run().unwrap();
        }
    }
}
