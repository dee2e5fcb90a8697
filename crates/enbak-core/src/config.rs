//! Export configuration
//!
//! Settings can come from a TOML file (`--config`) and from CLI flags. Flags
//! only ever switch options on, so merging is a logical OR of both sources.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for a single export run
///
/// Built once before the run starts and moved into the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Write one file per note instead of one per notebook
    pub single_notes: bool,
    /// Also export trashed notes as a `Trash` notebook
    pub include_trash: bool,
    /// Omit the `export-date` attribute from the archive root
    pub no_export_date: bool,
    /// Emit a `<guid>` element for every note
    pub add_guid: bool,
    /// Replace existing files instead of adding a ` (N)` suffix
    pub overwrite: bool,
}

impl ExportConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ExportConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded export config");
        Ok(config)
    }

    /// Combine with another set of options, enabling anything either enables
    pub fn merge(self, other: ExportConfig) -> Self {
        ExportConfig {
            single_notes: self.single_notes || other.single_notes,
            include_trash: self.include_trash || other.include_trash,
            no_export_date: self.no_export_date || other.no_export_date,
            add_guid: self.add_guid || other.add_guid,
            overwrite: self.overwrite || other.overwrite,
        }
    }
}
