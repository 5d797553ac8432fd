mod recorder;
mod sqlite;

use std::collections::BTreeMap;

use crate::error::TextBoxError;
use crate::schema::{Dialect, Statement};

pub use recorder::Recorder;
pub use sqlite::SqliteBackend;

/// One result row, keyed by column label. SQL NULL is `None`.
pub type Row = BTreeMap<String, Option<String>>;

/// The database the settings table lives in.
///
/// Calls are blocking request/response; there is no transaction handling here.
pub trait Backend {
    fn dialect(&self) -> Dialect;

    /// Run a DDL/DML statement. Failures are returned as
    /// [`TextBoxError::Execution`] and must not be swallowed by callers.
    fn execute(&mut self, statement: &Statement) -> Result<(), TextBoxError>;

    /// Run a query and return row `row_index`, or `None` if there are fewer rows.
    fn fetch_row(&mut self, row_index: usize, query: &Statement)
        -> Result<Option<Row>, TextBoxError>;

    /// Run a query and return a single value from row `row_index`.
    fn fetch_scalar(
        &mut self,
        column: &str,
        row_index: usize,
        query: &Statement,
    ) -> Result<Option<String>, TextBoxError> {
        Ok(self
            .fetch_row(row_index, query)?
            .and_then(|mut row| row.remove(column).flatten()))
    }
}
