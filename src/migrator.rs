use log::{debug, info};
use serde::Serialize;

use crate::db::{Backend, Row};
use crate::error::TextBoxError;
use crate::schema::{
    ColumnSpec, Dialect, Identifier, Statement, TableLayout, FIELD_TABLE, LEGACY_COLUMNS,
};

/// Live definition of one column, as introspection reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnDefinition {
    fn from_row(mut row: Row, dialect: Dialect) -> Result<Self, TextBoxError> {
        let mut take = |label: &str| -> Result<Option<String>, TextBoxError> {
            row.remove(label).ok_or_else(|| {
                TextBoxError::Error(format!("Introspection row is missing '{}'", label))
            })
        };

        let name = take("Field")?.unwrap_or_default();
        let sql_type = take("Type")?.unwrap_or_default();
        let nullable = take("Null")?.as_deref() == Some("YES");
        let default = dialect.normalize_default(take("Default")?);

        Ok(Self {
            name,
            sql_type,
            nullable,
            default,
        })
    }

    /// Default/nullability clause restating this column's current state.
    pub fn type_clause(&self, dialect: Dialect) -> String {
        match (&self.default, self.nullable) {
            (Some(default), _) => format!("DEFAULT {}", dialect.quote_literal(default)),
            (None, true) => "DEFAULT NULL".to_owned(),
            (None, false) => "NOT NULL".to_owned(),
        }
    }

    /// Full definition: the original type followed by [`Self::type_clause`].
    pub fn definition(&self, dialect: Dialect) -> String {
        format!("{} {}", self.sql_type, self.type_clause(dialect))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnState {
    pub name: &'static str,
    pub present: bool,
}

/// Which canonical columns a table has, and which legacy columns it still carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutStatus {
    pub table: &'static str,
    pub columns: Vec<ColumnState>,
    pub legacy: Vec<&'static str>,
}

impl LayoutStatus {
    pub fn is_canonical(&self) -> bool {
        self.legacy.is_empty() && self.columns.iter().all(|c| c.present)
    }

    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter(|c| !c.present).map(|c| c.name)
    }
}

/// Column operations on one settings table.
///
/// Every check goes to the database; nothing about the table is cached between
/// calls. The primitives do not check their own preconditions: adding an
/// existing column or dropping a missing one fails in the database and the
/// error is returned as-is.
pub struct Migrator<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
    table: Identifier,
}

impl<'a, B: Backend + ?Sized> Migrator<'a, B> {
    pub fn new(backend: &'a mut B) -> Result<Self, TextBoxError> {
        Self::for_table(backend, FIELD_TABLE)
    }

    pub fn for_table(backend: &'a mut B, table: &str) -> Result<Self, TextBoxError> {
        Ok(Self {
            backend,
            table: Identifier::new(table)?,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.backend.dialect()
    }

    pub fn has_column(&mut self, column: &str) -> Result<bool, TextBoxError> {
        let column = Identifier::new(column)?;
        let query = Statement::column_lookup(self.dialect(), &self.table, &column);
        Ok(self.backend.fetch_scalar("Field", 0, &query)?.is_some())
    }

    pub fn column_definition(
        &mut self,
        column: &str,
    ) -> Result<Option<ColumnDefinition>, TextBoxError> {
        let column = Identifier::new(column)?;
        let dialect = self.dialect();
        let query = Statement::column_lookup(dialect, &self.table, &column);
        self.backend
            .fetch_row(0, &query)?
            .map(|row| ColumnDefinition::from_row(row, dialect))
            .transpose()
    }

    /// Add `column` with a raw `declaration`, optionally placed after `after`.
    pub fn add_column(
        &mut self,
        column: &str,
        declaration: &str,
        after: Option<&str>,
    ) -> Result<(), TextBoxError> {
        let column = Identifier::new(column)?;
        let after = after.map(Identifier::new).transpose()?;
        let statement =
            Statement::add_column(self.dialect(), &self.table, &column, declaration, after.as_ref());
        self.backend.execute(&statement)?;
        info!("Added column `{}`.`{}`", self.table, column);
        Ok(())
    }

    pub fn add_column_spec(&mut self, spec: &ColumnSpec) -> Result<(), TextBoxError> {
        let declaration = spec.column_type.declaration(self.dialect());
        self.add_column(spec.name, &declaration, Some(spec.after))
    }

    pub fn remove_column(&mut self, column: &str) -> Result<(), TextBoxError> {
        let column = Identifier::new(column)?;
        let statement = Statement::drop_column(self.dialect(), &self.table, &column);
        self.backend.execute(&statement)?;
        info!("Removed column `{}`.`{}`", self.table, column);
        Ok(())
    }

    /// Rename `from` to `to`, keeping its type, nullability and default as
    /// currently read back from the database.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), TextBoxError> {
        let from_ident = Identifier::new(from)?;
        let to_ident = Identifier::new(to)?;
        let dialect = self.dialect();

        let current = self.column_definition(from)?.ok_or_else(|| {
            TextBoxError::MalformedIntrospection {
                table: self.table.to_string(),
                column: from.to_owned(),
            }
        })?;
        let definition = current.definition(dialect);
        debug!("Renaming `{}` with definition: {}", from, definition);

        let statement =
            Statement::change_column(dialect, &self.table, &from_ident, &to_ident, &definition);
        self.backend.execute(&statement)?;
        info!("Renamed column `{}`.`{}` to `{}`", self.table, from, to);
        Ok(())
    }

    pub fn create_table(&mut self, layout: &TableLayout) -> Result<(), TextBoxError> {
        for statement in Statement::create_table(self.dialect(), layout)? {
            self.backend.execute(&statement)?;
        }
        info!("Created settings table `{}`", self.table);
        Ok(())
    }

    pub fn drop_table(&mut self) -> Result<(), TextBoxError> {
        let statement = Statement::drop_table(self.dialect(), &self.table);
        self.backend.execute(&statement)?;
        info!("Dropped settings table `{}`", self.table);
        Ok(())
    }

    pub fn layout_status(&mut self, layout: &TableLayout) -> Result<LayoutStatus, TextBoxError> {
        let mut columns = Vec::new();
        for name in layout.column_names() {
            columns.push(ColumnState {
                name,
                present: self.has_column(name)?,
            });
        }

        let mut legacy = Vec::new();
        for name in LEGACY_COLUMNS {
            if self.has_column(name)? {
                legacy.push(name);
            }
        }

        Ok(LayoutStatus {
            table: layout.table,
            columns,
            legacy,
        })
    }
}
