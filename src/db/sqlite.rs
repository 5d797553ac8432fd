use std::path::Path;

use log::debug;
use rusqlite::{params_from_iter, types::ValueRef, Connection};

use super::{Backend, Row};
use crate::error::TextBoxError;
use crate::schema::{Dialect, Statement};

/// rusqlite-backed [`Backend`].
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(db_path: &Path) -> Result<Self, TextBoxError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(TextBoxError::Error(format!(
                    "Database folder '{}' does not exist or is not a directory",
                    parent.display()
                )));
            }
        }

        let conn = Connection::open(db_path)?;
        debug!("Database opened at: {}", db_path.display());
        Ok(Self { conn })
    }
}

#[cfg(test)]
impl SqliteBackend {
    pub fn open_in_memory() -> Result<Self, TextBoxError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Backend for SqliteBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), TextBoxError> {
        debug!("execute: {}", statement);
        self.conn
            .execute(&statement.sql, params_from_iter(statement.params.iter()))
            .map(|_| ())
            .map_err(|source| TextBoxError::Execution {
                sql: statement.sql.clone(),
                source,
            })
    }

    fn fetch_row(
        &mut self,
        row_index: usize,
        query: &Statement,
    ) -> Result<Option<Row>, TextBoxError> {
        debug!("fetch_row({}): {}", row_index, query);
        let mut stmt = self.conn.prepare(&query.sql)?;
        let labels: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(query.params.iter()))?;

        let mut index = 0;
        while let Some(row) = rows.next()? {
            if index == row_index {
                let mut fetched = Row::new();
                for (i, label) in labels.iter().enumerate() {
                    fetched.insert(label.clone(), value_to_string(row.get_ref(i)?));
                }
                return Ok(Some(fetched));
            }
            index += 1;
        }

        Ok(None)
    }
}

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}
