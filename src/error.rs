use rusqlite::Error as RusqliteError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextBoxError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error), // Converts io::Error into TextBoxError automatically

    #[error("Database error: {0}")]
    DatabaseError(#[from] RusqliteError), // Converts rusqlite::Error automatically

    #[error("Statement failed: {source}\n  {sql}")]
    Execution {
        sql: String,
        #[source]
        source: RusqliteError,
    },

    #[error("Introspection of `{table}`.`{column}` returned no row")]
    MalformedIntrospection { table: String, column: String },

    #[error("Identifier '{0}' is not a known settings table identifier")]
    InvalidIdentifier(String),

    #[error("Error: {0}")]
    Error(String), // Allows custom application errors
}
