mod layout;
mod sql;

pub use layout::{
    ColumnSpec, TableLayout, COLUMN_LENGTH, FIELD_TABLE, LEGACY_COLUMNS, SETTINGS_LAYOUT,
    TEXT_CDATA, TEXT_HANDLE, TEXT_LENGTH,
};
pub use sql::{Dialect, Identifier, Statement};
