use std::cmp::Ordering;
use std::fmt;

use log::{info, warn, Level};
use logging_timer::timer;
use serde::Serialize;

use crate::db::Backend;
use crate::error::TextBoxError;
use crate::migrator::{LayoutStatus, Migrator};
use crate::schema::SETTINGS_LAYOUT;
use crate::upgrade::{self, UpgradeReport, UPGRADE_STEPS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: &'static str,
    pub website: &'static str,
    pub email: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    pub name: &'static str,
    pub version: &'static str,
    #[serde(rename = "release-date")]
    pub release_date: &'static str,
    pub author: Author,
    pub description: &'static str,
}

/// Dotted release number, e.g. `2.3` or `1.6.1`. Missing trailing parts
/// compare as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionVersion(Vec<u32>);

impl ExtensionVersion {
    pub fn parse(s: &str) -> Result<Self, TextBoxError> {
        let trimmed = s.trim();
        let parts = trimmed
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TextBoxError::Error(format!("Invalid version marker '{}'", s)))?;
        Ok(Self(parts))
    }

    fn part(&self, i: usize) -> u32 {
        self.0.get(i).copied().unwrap_or(0)
    }
}

impl Ord for ExtensionVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.part(i).cmp(&other.part(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ExtensionVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ExtensionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// The Text Box field extension: owns the settings table for its field type.
pub struct Extension<B: Backend> {
    backend: B,
}

impl<B: Backend> Extension<B> {
    pub const VERSION: &'static str = "2.3";

    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn about() -> ExtensionInfo {
        ExtensionInfo {
            name: "Field: Text Box",
            version: Self::VERSION,
            release_date: "2011-12-05",
            author: Author {
                name: "Rowan Lewis",
                website: "http://nbsp.io/",
                email: "me@rowanlewis.com",
            },
            description: "An enhanced text input field.",
        }
    }

    /// Create the settings table with the current layout.
    pub fn install(&mut self) -> Result<(), TextBoxError> {
        let _tmr = timer!(Level::Trace; "Extension::install");
        Migrator::new(&mut self.backend)?.create_table(&SETTINGS_LAYOUT)
    }

    pub fn uninstall(&mut self) -> Result<(), TextBoxError> {
        Migrator::new(&mut self.backend)?.drop_table()
    }

    /// Bring the settings table from any earlier release up to the current
    /// layout. The version marker is only reported; the live columns decide
    /// which steps run.
    pub fn update(&mut self, previous_version: &str) -> Result<UpgradeReport, TextBoxError> {
        let _tmr = timer!(Level::Trace; "Extension::update", "{}", previous_version);

        match ExtensionVersion::parse(previous_version) {
            Ok(previous) => {
                let current = ExtensionVersion::parse(Self::VERSION)?;
                if previous > current {
                    warn!(
                        "Previous version {} is newer than {}; checking the table anyway",
                        previous, current
                    );
                }
                info!("Updating settings table from version {}", previous);
            }
            Err(e) => warn!("{}; checking the table anyway", e),
        }

        let mut migrator = Migrator::new(&mut self.backend)?;
        let report = upgrade::upgrade(&mut migrator, UPGRADE_STEPS)?;
        info!("Update applied {} step(s)", report.applied.len());
        Ok(report)
    }

    pub fn status(&mut self) -> Result<(LayoutStatus, Vec<&'static str>), TextBoxError> {
        let mut migrator = Migrator::new(&mut self.backend)?;
        let status = migrator.layout_status(&SETTINGS_LAYOUT)?;
        let pending = upgrade::pending_steps(&mut migrator, UPGRADE_STEPS)?;
        Ok((status, pending))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
