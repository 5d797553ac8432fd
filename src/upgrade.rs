use log::{debug, info};
use serde::Serialize;

use crate::db::Backend;
use crate::error::TextBoxError;
use crate::migrator::Migrator;
use crate::schema::{ColumnSpec, COLUMN_LENGTH, TEXT_CDATA, TEXT_HANDLE, TEXT_LENGTH};

/// Condition under which a step has work to do. Evaluated against the live
/// table each time, so a step that already ran no longer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Present(&'static str),
    Absent(&'static str),
}

impl Guard {
    pub fn fires<B: Backend + ?Sized>(
        &self,
        migrator: &mut Migrator<'_, B>,
    ) -> Result<bool, TextBoxError> {
        match self {
            Guard::Present(column) => migrator.has_column(column),
            Guard::Absent(column) => Ok(!migrator.has_column(column)?),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add(&'static ColumnSpec),
    Rename {
        from: &'static str,
        to: &'static str,
    },
    Remove(&'static str),
}

impl Action {
    pub fn apply<B: Backend + ?Sized>(
        &self,
        migrator: &mut Migrator<'_, B>,
    ) -> Result<(), TextBoxError> {
        match self {
            Action::Add(spec) => migrator.add_column_spec(spec),
            Action::Rename { from, to } => migrator.rename_column(from, to),
            Action::Remove(column) => migrator.remove_column(column),
        }
    }
}

/// One check-then-act pair of the upgrade sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStep {
    pub name: &'static str,
    pub guard: Guard,
    pub action: Action,
}

/// The upgrade sequence, in the order it must run. The `length` rename comes
/// before the `text_length` add, so the add only fires on tables that never
/// had a `length` column.
pub const UPGRADE_STEPS: &[MigrationStep] = &[
    MigrationStep {
        name: "column length: drop show_full",
        guard: Guard::Present("show_full"),
        action: Action::Remove("show_full"),
    },
    MigrationStep {
        name: "column length: add column_length",
        guard: Guard::Absent("column_length"),
        action: Action::Add(&COLUMN_LENGTH),
    },
    MigrationStep {
        name: "text size: rename size",
        guard: Guard::Present("size"),
        action: Action::Rename {
            from: "size",
            to: "text_size",
        },
    },
    MigrationStep {
        name: "text formatter: rename formatter",
        guard: Guard::Present("formatter"),
        action: Action::Rename {
            from: "formatter",
            to: "text_formatter",
        },
    },
    MigrationStep {
        name: "text validator: rename validator",
        guard: Guard::Present("validator"),
        action: Action::Rename {
            from: "validator",
            to: "text_validator",
        },
    },
    MigrationStep {
        name: "text length: rename length",
        guard: Guard::Present("length"),
        action: Action::Rename {
            from: "length",
            to: "text_length",
        },
    },
    MigrationStep {
        name: "text length: add text_length",
        guard: Guard::Absent("text_length"),
        action: Action::Add(&TEXT_LENGTH),
    },
    MigrationStep {
        name: "text cdata: add text_cdata",
        guard: Guard::Absent("text_cdata"),
        action: Action::Add(&TEXT_CDATA),
    },
    MigrationStep {
        name: "text handle: add text_handle",
        guard: Guard::Absent("text_handle"),
        action: Action::Add(&TEXT_HANDLE),
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeReport {
    pub applied: Vec<&'static str>,
}

/// Run every step whose guard fires, in order. Stops at the first failure;
/// whatever ran before it stays applied and a later run picks up from there.
pub fn upgrade<B: Backend + ?Sized>(
    migrator: &mut Migrator<'_, B>,
    steps: &[MigrationStep],
) -> Result<UpgradeReport, TextBoxError> {
    let mut report = UpgradeReport::default();

    for step in steps {
        if !step.guard.fires(migrator)? {
            debug!("Upgrade step '{}' not needed", step.name);
            continue;
        }

        info!("Applying upgrade step '{}'", step.name);
        step.action.apply(migrator)?;
        report.applied.push(step.name);
    }

    Ok(report)
}

/// Steps whose guard currently fires. Later guards are evaluated against the
/// table as it is now, not as earlier steps would leave it.
pub fn pending_steps<B: Backend + ?Sized>(
    migrator: &mut Migrator<'_, B>,
    steps: &[MigrationStep],
) -> Result<Vec<&'static str>, TextBoxError> {
    let mut pending = Vec::new();
    for step in steps {
        if step.guard.fires(migrator)? {
            pending.push(step.name);
        }
    }
    Ok(pending)
}
