//! CLI argument parsing for the catalog-importer binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::ImportType;

#[derive(Parser)]
#[command(name = "catalog-importer", about = "Catalog CSV import client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Propose a column mapping for a CSV file against a category's fields
    Map {
        /// CSV file whose header row should be mapped
        #[arg(long)]
        file: PathBuf,
        /// JSON file with the category's attribute definitions
        #[arg(long)]
        fields: PathBuf,
    },
    /// Submit an import and track the job to completion
    Submit {
        /// CSV file to import
        #[arg(long)]
        file: PathBuf,
        /// Import type: products, references or applications
        #[arg(long = "type", value_parser = parse_import_type)]
        import_type: ImportType,
        /// Category id the import belongs to
        #[arg(long)]
        category: String,
        /// JSON file with the category's attribute definitions
        #[arg(long)]
        fields: PathBuf,
        /// Confirmed mapping JSON (header -> fieldId|null); suggested when absent
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
    /// Attach to a known job id and track it
    Watch {
        #[arg(long)]
        job_id: String,
    },
    /// Look for an in-flight job on the backend and re-attach to it
    Recover,
}

fn parse_import_type(raw: &str) -> Result<ImportType, String> {
    raw.parse()
}
