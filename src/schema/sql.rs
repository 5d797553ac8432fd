use std::fmt;

use clap::ValueEnum;

use super::layout::{TableLayout, FIELD_TABLE, LEGACY_COLUMNS, SETTINGS_LAYOUT};
use crate::error::TextBoxError;

/// SQL flavour a backend speaks. Selects identifier quoting, literal quoting
/// and the shape of introspection and rename statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    #[value(name = "mysql")]
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn quote_identifier(&self, ident: &Identifier) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.as_str()),
            Dialect::Sqlite => format!("\"{}\"", ident.as_str()),
        }
    }

    /// Quote a string literal for use where binding is not possible (DDL defaults).
    pub fn quote_literal(&self, value: &str) -> String {
        match self {
            Dialect::MySql => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")),
            Dialect::Sqlite => format!("'{}'", value.replace('\'', "''")),
        }
    }

    /// Bring a reported column default into the unquoted form MySQL reports.
    ///
    /// SQLite hands back the default expression as written, so `'medium'` keeps
    /// its quotes and an explicit `DEFAULT NULL` comes back as the text `NULL`.
    pub fn normalize_default(&self, raw: Option<String>) -> Option<String> {
        let raw = raw?;
        match self {
            Dialect::MySql => Some(raw),
            Dialect::Sqlite => {
                if raw.eq_ignore_ascii_case("null") {
                    None
                } else if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
                    Some(raw[1..raw.len() - 1].replace("''", "'"))
                } else {
                    Some(raw)
                }
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// A table or column name that is known to this extension.
///
/// Identifiers are interpolated into DDL, so only the settings table and the
/// columns it has ever carried are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(&'static str);

impl Identifier {
    pub fn new(name: &str) -> Result<Self, TextBoxError> {
        Self::allowed()
            .find(|known| *known == name)
            .map(Identifier)
            .ok_or_else(|| TextBoxError::InvalidIdentifier(name.to_owned()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    fn allowed() -> impl Iterator<Item = &'static str> {
        std::iter::once(FIELD_TABLE)
            .chain(SETTINGS_LAYOUT.column_names())
            .chain(LEGACY_COLUMNS)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A rendered SQL statement plus the values bound to its `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Introspection query for one column. Yields one row with `Field`, `Type`,
    /// `Null` (`YES`/`NO`) and `Default` when the column exists, and no rows otherwise.
    pub fn column_lookup(dialect: Dialect, table: &Identifier, column: &Identifier) -> Self {
        match dialect {
            Dialect::MySql => Self {
                sql: format!(
                    "SHOW COLUMNS FROM {} WHERE Field = ?",
                    dialect.quote_identifier(table)
                ),
                params: vec![column.as_str().to_owned()],
            },
            Dialect::Sqlite => Self {
                sql: "SELECT name AS \"Field\", type AS \"Type\", \
                      CASE \"notnull\" WHEN 0 THEN 'YES' ELSE 'NO' END AS \"Null\", \
                      dflt_value AS \"Default\" \
                      FROM pragma_table_info(?) WHERE name = ?"
                    .to_owned(),
                params: vec![table.as_str().to_owned(), column.as_str().to_owned()],
            },
        }
    }

    /// `declaration` is emitted verbatim and must come from a trusted call site.
    pub fn add_column(
        dialect: Dialect,
        table: &Identifier,
        column: &Identifier,
        declaration: &str,
        after: Option<&Identifier>,
    ) -> Self {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            dialect.quote_identifier(table),
            dialect.quote_identifier(column),
            declaration
        );
        if let (Dialect::MySql, Some(anchor)) = (dialect, after) {
            sql.push_str(&format!(" AFTER {}", dialect.quote_identifier(anchor)));
        }
        Self::new(sql)
    }

    pub fn drop_column(dialect: Dialect, table: &Identifier, column: &Identifier) -> Self {
        Self::new(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            dialect.quote_identifier(table),
            dialect.quote_identifier(column)
        ))
    }

    /// Rename `from` to `to`. MySQL restates the full definition through
    /// `CHANGE`; SQLite keeps the definition on `RENAME COLUMN`.
    pub fn change_column(
        dialect: Dialect,
        table: &Identifier,
        from: &Identifier,
        to: &Identifier,
        definition: &str,
    ) -> Self {
        match dialect {
            Dialect::MySql => Self::new(format!(
                "ALTER TABLE {} CHANGE {} {} {}",
                dialect.quote_identifier(table),
                dialect.quote_identifier(from),
                dialect.quote_identifier(to),
                definition
            )),
            Dialect::Sqlite => Self::new(format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                dialect.quote_identifier(table),
                dialect.quote_identifier(from),
                dialect.quote_identifier(to)
            )),
        }
    }

    pub fn create_table(dialect: Dialect, layout: &TableLayout) -> Result<Vec<Self>, TextBoxError> {
        let table = Identifier::new(layout.table)?;
        let id = Identifier::new(TableLayout::PRIMARY_KEY)?;
        let field_id = Identifier::new(TableLayout::FIELD_KEY)?;

        let mut lines = match dialect {
            Dialect::MySql => vec![
                format!("{} INT(11) UNSIGNED NOT NULL AUTO_INCREMENT", dialect.quote_identifier(&id)),
                format!("{} INT(11) UNSIGNED NOT NULL", dialect.quote_identifier(&field_id)),
            ],
            Dialect::Sqlite => vec![
                format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", dialect.quote_identifier(&id)),
                format!("{} INTEGER NOT NULL", dialect.quote_identifier(&field_id)),
            ],
        };
        for column in layout.columns {
            let name = Identifier::new(column.name)?;
            lines.push(format!(
                "{} {}",
                dialect.quote_identifier(&name),
                column.column_type.declaration(dialect)
            ));
        }

        match dialect {
            Dialect::MySql => {
                lines.push(format!("PRIMARY KEY ({})", dialect.quote_identifier(&id)));
                lines.push(format!(
                    "KEY {} ({})",
                    dialect.quote_identifier(&field_id),
                    dialect.quote_identifier(&field_id)
                ));
                Ok(vec![Self::new(format!(
                    "CREATE TABLE IF NOT EXISTS {} ({}) ENGINE=MyISAM DEFAULT CHARSET=utf8",
                    dialect.quote_identifier(&table),
                    lines.join(", ")
                ))])
            }
            Dialect::Sqlite => Ok(vec![
                Self::new(format!(
                    "CREATE TABLE IF NOT EXISTS {} ({})",
                    dialect.quote_identifier(&table),
                    lines.join(", ")
                )),
                Self::new(format!(
                    "CREATE INDEX IF NOT EXISTS \"idx_{}_{}\" ON {} ({})",
                    table,
                    field_id,
                    dialect.quote_identifier(&table),
                    dialect.quote_identifier(&field_id)
                )),
            ]),
        }
    }

    pub fn drop_table(dialect: Dialect, table: &Identifier) -> Self {
        Self::new(format!("DROP TABLE {}", dialect.quote_identifier(table)))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)?;
        if !self.params.is_empty() {
            write!(f, " -- {:?}", self.params)?;
        }
        Ok(())
    }
}
