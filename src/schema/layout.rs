use super::sql::Dialect;

/// Name of the field settings table.
pub const FIELD_TABLE: &str = "tbl_fields_textbox";

/// Columns that older releases created and the upgrade steps remove or rename away.
pub const LEGACY_COLUMNS: [&str; 5] = ["show_full", "size", "formatter", "validator", "length"];

/// Typed column declaration. Rendered per dialect; never persisted as an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    UnsignedInt {
        default: u32,
    },
    Enum {
        values: &'static [&'static str],
        default: &'static str,
    },
    NullableVarchar {
        length: u16,
    },
}

impl ColumnType {
    /// Type and default clause as it appears after the column name in DDL.
    pub fn declaration(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (ColumnType::UnsignedInt { default }, Dialect::MySql) => {
                format!("INT(11) UNSIGNED DEFAULT {}", default)
            }
            (ColumnType::UnsignedInt { default }, Dialect::Sqlite) => {
                format!("INTEGER DEFAULT {}", default)
            }
            (ColumnType::Enum { values, default }, Dialect::MySql) => {
                let values: Vec<String> = values.iter().map(|v| dialect.quote_literal(v)).collect();
                format!(
                    "ENUM({}) DEFAULT {}",
                    values.join(", "),
                    dialect.quote_literal(default)
                )
            }
            (ColumnType::Enum { default, .. }, Dialect::Sqlite) => {
                format!("TEXT DEFAULT {}", dialect.quote_literal(default))
            }
            (ColumnType::NullableVarchar { length }, Dialect::MySql) => {
                format!("VARCHAR({}) DEFAULT NULL", length)
            }
            (ColumnType::NullableVarchar { .. }, Dialect::Sqlite) => "TEXT DEFAULT NULL".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Column an added column is placed after. Only MySQL honours the hint.
    pub after: &'static str,
}

const YES_NO: &[&str] = &["yes", "no"];

pub const COLUMN_LENGTH: ColumnSpec = ColumnSpec {
    name: "column_length",
    column_type: ColumnType::UnsignedInt { default: 75 },
    after: "field_id",
};

pub const TEXT_SIZE: ColumnSpec = ColumnSpec {
    name: "text_size",
    column_type: ColumnType::Enum {
        values: &["single", "small", "medium", "large", "huge"],
        default: "medium",
    },
    after: "column_length",
};

pub const TEXT_FORMATTER: ColumnSpec = ColumnSpec {
    name: "text_formatter",
    column_type: ColumnType::NullableVarchar { length: 255 },
    after: "text_size",
};

pub const TEXT_VALIDATOR: ColumnSpec = ColumnSpec {
    name: "text_validator",
    column_type: ColumnType::NullableVarchar { length: 255 },
    after: "text_formatter",
};

// Upgraded tables receive text_length next to the formatter, ahead of the validator.
pub const TEXT_LENGTH: ColumnSpec = ColumnSpec {
    name: "text_length",
    column_type: ColumnType::UnsignedInt { default: 0 },
    after: "text_formatter",
};

pub const TEXT_CDATA: ColumnSpec = ColumnSpec {
    name: "text_cdata",
    column_type: ColumnType::Enum {
        values: YES_NO,
        default: "no",
    },
    after: "text_length",
};

pub const TEXT_HANDLE: ColumnSpec = ColumnSpec {
    name: "text_handle",
    column_type: ColumnType::Enum {
        values: YES_NO,
        default: "no",
    },
    after: "text_cdata",
};

/// The set of columns a settings table must carry, beyond the permanent
/// `id` primary key and `field_id` key.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub table: &'static str,
    pub columns: &'static [ColumnSpec],
}

/// Canonical layout for the current release.
pub const SETTINGS_LAYOUT: TableLayout = TableLayout {
    table: FIELD_TABLE,
    columns: &[
        COLUMN_LENGTH,
        TEXT_SIZE,
        TEXT_FORMATTER,
        TEXT_VALIDATOR,
        TEXT_LENGTH,
        TEXT_CDATA,
        TEXT_HANDLE,
    ],
};

impl TableLayout {
    pub const PRIMARY_KEY: &'static str = "id";
    pub const FIELD_KEY: &'static str = "field_id";

    /// Every column name in table order, permanent keys included.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![Self::PRIMARY_KEY, Self::FIELD_KEY];
        names.extend(self.columns.iter().map(|c| c.name));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_layout_has_nine_unique_columns() {
        let names = SETTINGS_LAYOUT.column_names();
        assert_eq!(names.len(), 9);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_legacy_columns_never_overlap_canonical() {
        let names = SETTINGS_LAYOUT.column_names();
        for legacy in LEGACY_COLUMNS {
            assert!(!names.contains(&legacy), "{legacy}");
        }
    }

    #[test]
    fn test_anchors_refer_to_known_columns() {
        let names = SETTINGS_LAYOUT.column_names();
        for column in SETTINGS_LAYOUT.columns {
            assert!(
                names.contains(&column.after),
                "{} anchored to {}",
                column.name,
                column.after
            );
        }
    }

    #[test]
    fn test_mysql_declarations_match_persisted_schema() {
        assert_eq!(
            COLUMN_LENGTH.column_type.declaration(Dialect::MySql),
            "INT(11) UNSIGNED DEFAULT 75"
        );
        assert_eq!(
            TEXT_SIZE.column_type.declaration(Dialect::MySql),
            "ENUM('single', 'small', 'medium', 'large', 'huge') DEFAULT 'medium'"
        );
        assert_eq!(
            TEXT_FORMATTER.column_type.declaration(Dialect::MySql),
            "VARCHAR(255) DEFAULT NULL"
        );
        assert_eq!(
            TEXT_CDATA.column_type.declaration(Dialect::MySql),
            "ENUM('yes', 'no') DEFAULT 'no'"
        );
    }

    #[test]
    fn test_sqlite_declarations_keep_defaults() {
        assert_eq!(
            TEXT_LENGTH.column_type.declaration(Dialect::Sqlite),
            "INTEGER DEFAULT 0"
        );
        assert_eq!(
            TEXT_HANDLE.column_type.declaration(Dialect::Sqlite),
            "TEXT DEFAULT 'no'"
        );
        assert_eq!(
            TEXT_VALIDATOR.column_type.declaration(Dialect::Sqlite),
            "TEXT DEFAULT NULL"
        );
    }
}
