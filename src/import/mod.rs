//! Bulk import - CSV files into catalog tables
//!
//! Each file is parsed fully in memory, validated against the table's static
//! column list, then written inside a single transaction. Failures are
//! reported per file as an [`ImportOutcome`]; nothing here aborts the
//! surrounding bootstrap.

pub mod csv_file;
pub mod importer;
pub mod orchestrator;

pub use csv_file::{ParsedFile, ParsedRecord};
pub use importer::import_file;
pub use orchestrator::{import_all, import_table};

use std::path::PathBuf;

/// The file could not be turned into rows for its table
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV{}: {message}", at_line(.line))]
    Csv { line: Option<u64>, message: String },

    #[error("file has no header row")]
    MissingHeader,

    #[error("header names column '{0}' more than once")]
    DuplicateColumn(String),

    #[error("header column '{column}' is not a column of {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("header is missing column '{column}' of {table}")]
    MissingColumn { table: &'static str, column: &'static str },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl ParseError {
    /// A reader error at `line` of the source file
    pub(crate) fn from_csv(err: &csv::Error, line: Option<u64>) -> Self {
        let message = match err.kind() {
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                format!("expected {expected_len} fields, found {len}")
            }
            _ => err.to_string(),
        };
        ParseError::Csv { line, message }
    }
}

/// A write failed inside the file's transaction; everything was rolled back
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("row {row} (line {line}) rejected: {source}")]
    Row {
        row: usize,
        line: u64,
        #[source]
        source: rusqlite::Error,
    },

    #[error("transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),
}

/// Outcome of importing one file
#[derive(Debug)]
pub enum ImportOutcome {
    /// Every row was committed
    Imported { rows: usize },
    /// The file was rejected before any write
    ParseFailed(ParseError),
    /// A write failed and the transaction was rolled back
    StatementFailed(StatementError),
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }

    /// Rows persisted by this import (zero for any failure)
    pub fn rows(&self) -> usize {
        match self {
            ImportOutcome::Imported { rows } => *rows,
            _ => 0,
        }
    }
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportOutcome::Imported { rows } => write!(f, "imported {} rows", rows),
            ImportOutcome::ParseFailed(e) => write!(f, "parse error: {}", e),
            ImportOutcome::StatementFailed(e) => write!(f, "statement error: {}", e),
        }
    }
}

/// Import result for one table
#[derive(Debug)]
pub struct TableImport {
    pub table: &'static str,
    pub path: PathBuf,
    pub outcome: ImportOutcome,
}

/// Per-table outcomes of a full import, in import order
#[derive(Debug, Default)]
pub struct ImportReport {
    pub tables: Vec<TableImport>,
}

impl ImportReport {
    pub fn outcome(&self, table: &str) -> Option<&ImportOutcome> {
        self.tables.iter().find(|t| t.table == table).map(|t| &t.outcome)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.outcome.rows()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableImport> {
        self.tables.iter().filter(|t| !t.outcome.is_success())
    }

    /// True when every file imported
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Import Report:")?;
        for t in &self.tables {
            writeln!(f, "  {}: {}", t.table, t.outcome)?;
        }
        write!(f, "  Total rows: {}", self.total_rows())
    }
}
