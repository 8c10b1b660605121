//! CSV parsing against a catalog table

use std::collections::HashSet;
use std::path::Path;
use crate::catalog::TableSchema;
use super::ParseError;

/// One data row, fields in catalog column order
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// 1-based source line
    pub line: u64,
    /// `None` for an empty field
    pub values: Vec<Option<String>>,
}

/// A fully parsed file, ready to insert
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub columns: Vec<&'static str>,
    pub records: Vec<ParsedRecord>,
}

impl ParsedFile {
    /// Parameterized insert for `table` binding `columns` in order
    pub fn insert_statement(&self, table: &str) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            self.columns.join(", "),
            placeholders
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a whole file into memory and parse it for `table`
pub fn read_file(path: &Path, table: &TableSchema) -> Result<ParsedFile, ParseError> {
    let content = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, table)
}

/// Parse CSV content for `table`.
///
/// The first record is the header. It must name every column of the table
/// exactly once and nothing else; its order is free. Blank lines are skipped
/// and every data row must have as many fields as the header.
pub fn parse(content: &[u8], table: &TableSchema) -> Result<ParsedFile, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content);

    let mut lines = LineIndex::new(content);
    let header = reader
        .headers()
        .map_err(|e| csv_error(e, &mut lines))?
        .clone();
    if header.is_empty() || (header.len() == 1 && header[0].trim().is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let positions = column_positions(&header, table)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, &mut lines))?;
        let line = record.position().map_or(0, |p| lines.line_at(p.byte()));
        let values = positions
            .iter()
            .map(|&i| match record.get(i) {
                Some("") | None => None,
                Some(v) => Some(v.to_string()),
            })
            .collect();
        records.push(ParsedRecord { line, values });
    }

    Ok(ParsedFile {
        columns: table.column_names().collect(),
        records,
    })
}

fn csv_error(err: csv::Error, lines: &mut LineIndex) -> ParseError {
    let line = err.position().map(|p| lines.line_at(p.byte()));
    ParseError::from_csv(&err, line)
}

/// Maps record byte offsets to 1-based source lines.
///
/// Only `\n` is counted, so CRLF and LF files number their lines the same.
/// Offsets must be queried in increasing order.
struct LineIndex<'a> {
    content: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self { content, offset: 0, line: 1 }
    }

    fn line_at(&mut self, byte: u64) -> u64 {
        // A record offset may sit on the tail of the previous terminator or
        // on skipped blank lines
        let mut start = usize::try_from(byte).unwrap_or(usize::MAX).min(self.content.len());
        while matches!(self.content.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.content[self.offset..start].iter().filter(|&&b| b == b'\n').count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line
    }
}

/// For each catalog column, its index in the header
fn column_positions(header: &csv::StringRecord, table: &TableSchema) -> Result<Vec<usize>, ParseError> {
    let names: Vec<&str> = header.iter().map(str::trim).collect();

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(*name) {
            return Err(ParseError::DuplicateColumn(name.to_string()));
        }
        if table.column(name).is_none() {
            return Err(ParseError::UnknownColumn {
                table: table.name,
                column: name.to_string(),
            });
        }
    }

    table
        .columns
        .iter()
        .map(|col| {
            names
                .iter()
                .position(|n| *n == col.name)
                .ok_or(ParseError::MissingColumn {
                    table: table.name,
                    column: col.name,
                })
        })
        .collect()
}
