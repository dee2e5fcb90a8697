use clap::Args;
use std::path::PathBuf;

use enbak_core::config::ExportConfig;

use super::DEFAULT_DATABASE;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory to write ENEX files into
    pub output_dir: PathBuf,

    /// Database file to export from
    #[arg(long, default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// TOML file with export options; flags add to it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write one file per note instead of one per notebook
    #[arg(long)]
    pub single_notes: bool,

    /// Export trashed notes into a separate Trash notebook
    #[arg(long)]
    pub include_trash: bool,

    /// Leave out the export-date attribute
    #[arg(long)]
    pub no_export_date: bool,

    /// Add a guid element to every note
    #[arg(long)]
    pub add_guid: bool,

    /// Overwrite existing files instead of numbering new ones
    #[arg(long)]
    pub overwrite: bool,
}

impl ExportArgs {
    /// Options switched on by flags alone
    pub fn flags(&self) -> ExportConfig {
        ExportConfig {
            single_notes: self.single_notes,
            include_trash: self.include_trash,
            no_export_date: self.no_export_date,
            add_guid: self.add_guid,
            overwrite: self.overwrite,
        }
    }
}
