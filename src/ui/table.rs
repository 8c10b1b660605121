use tabled::{settings::Style, Table, Tabled};
use crate::import::ImportReport;
use crate::storage::{DbStats, ReferenceCheck};
use super::report::outcome_status;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Status")]
    status: String,
}

fn render(rows: Vec<TableRow>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One line per imported file: rows written, or why the file was not imported
pub fn report_table(report: &ImportReport) -> String {
    render(
        report
            .tables
            .iter()
            .map(|t| TableRow {
                table: t.table.to_string(),
                rows: t.outcome.rows(),
                status: outcome_status(&t.outcome),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &DbStats) -> String {
    render(
        stats
            .tables
            .iter()
            .map(|t| TableRow {
                table: t.table.to_string(),
                rows: t.rows,
                status: if t.rows == 0 { "empty" } else { "ok" }.to_string(),
            })
            .collect(),
    )
}

/// Dangling row counts per logical reference
pub fn reference_table(checks: &[ReferenceCheck]) -> String {
    render(
        checks
            .iter()
            .map(|c| TableRow {
                table: format!("{}.{} -> {}", c.table, c.column, c.target),
                rows: c.dangling,
                status: if c.is_intact() { "ok" } else { "dangling" }.to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportOutcome, ParseError, TableImport};
    use crate::storage::TableCount;
    use std::path::PathBuf;

    #[test]
    fn test_stats_table_lists_every_table() {
        let stats = DbStats {
            tables: vec![
                TableCount { table: "users", rows: 12 },
                TableCount { table: "orders", rows: 0 },
            ],
        };
        let out = stats_table(&stats);
        assert!(out.contains("users"));
        assert!(out.contains("12"));
        assert!(out.contains("empty"));
    }

    #[test]
    fn test_report_table_explains_skipped_file() {
        let report = ImportReport {
            tables: vec![TableImport {
                table: "orders",
                path: PathBuf::from("orders.csv"),
                outcome: ImportOutcome::ParseFailed(ParseError::MissingColumn {
                    table: "orders",
                    column: "num_of_item",
                }),
            }],
        };
        let out = report_table(&report);
        assert!(out.contains("skipped: header is missing column 'num_of_item' of orders"));
    }

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(reference_table(&[]).is_empty());
    }
}
