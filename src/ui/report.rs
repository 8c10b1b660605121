//! Console lines for bootstrap, stats and reference checks

use owo_colors::{OwoColorize, Style};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use crate::import::{ImportOutcome, ImportReport, StatementError};
use crate::storage::{DbStats, ReferenceCheck};
use super::table::{reference_table, report_table, stats_table};

static COLORS: OnceLock<bool> = OnceLock::new();

/// How a line reads on the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Good,
    /// A file was rejected before anything was written
    Skipped,
    /// Written rows were undone, or stored references dangle
    Broken,
    Muted,
}

impl Tone {
    pub fn of(outcome: &ImportOutcome) -> Self {
        match outcome {
            ImportOutcome::Imported { .. } => Tone::Good,
            ImportOutcome::ParseFailed(_) => Tone::Skipped,
            ImportOutcome::StatementFailed(_) => Tone::Broken,
        }
    }

    fn style(self) -> Style {
        match self {
            Tone::Heading => Style::new().cyan().bold(),
            Tone::Good => Style::new().green().bold(),
            Tone::Skipped => Style::new().yellow().bold(),
            Tone::Broken => Style::new().red().bold(),
            Tone::Muted => Style::new().white().dimmed(),
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Tone::Heading => "🗄️",
            Tone::Good => "✅",
            Tone::Skipped => "⚠️",
            Tone::Broken => "❌",
            Tone::Muted => "·",
        }
    }
}

fn colors_enabled() -> bool {
    *COLORS.get_or_init(|| console::Term::stdout().is_term() && console::colors_enabled())
}

pub fn paint(text: &str, tone: Tone) -> String {
    if colors_enabled() {
        text.style(tone.style()).to_string()
    } else {
        text.to_string()
    }
}

fn line(tone: Tone, text: &str) {
    println!("{} {}", tone.marker(), paint(text, tone));
}

/// Status cell for one imported file
pub fn outcome_status(outcome: &ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Imported { .. } => "ok".to_string(),
        ImportOutcome::ParseFailed(e) => format!("skipped: {}", e),
        ImportOutcome::StatementFailed(StatementError::Row { row, line, source }) => {
            format!("rolled back at row {} (line {}): {}", row, line, source)
        }
        ImportOutcome::StatementFailed(e) => format!("rolled back: {}", e),
    }
}

/// Closing line of a fresh import, toned by its worst outcome
pub fn import_summary(report: &ImportReport) -> (Tone, String) {
    let tone = report
        .tables
        .iter()
        .map(|t| Tone::of(&t.outcome))
        .max_by_key(|tone| match tone {
            Tone::Broken => 2,
            Tone::Skipped => 1,
            _ => 0,
        })
        .unwrap_or(Tone::Good);

    let failed = report.failures().count();
    let text = if failed == 0 {
        format!("Loaded {} rows", report.total_rows())
    } else {
        format!(
            "Loaded {} rows; {} of {} files were not imported",
            report.total_rows(),
            failed,
            report.tables.len()
        )
    };
    (tone, text)
}

/// Closing line of a reference check
pub fn reference_summary(checks: &[ReferenceCheck]) -> (Tone, String) {
    let broken = checks.iter().filter(|c| !c.is_intact()).count();
    if broken == 0 {
        (Tone::Good, "Every reference resolves".to_string())
    } else {
        (
            Tone::Broken,
            format!("{} of {} references have dangling rows", broken, checks.len()),
        )
    }
}

pub fn heading(title: &str, store: &Path) {
    println!();
    line(Tone::Heading, title);
    println!("  {} {}", paint("store:", Tone::Muted), store.display());
}

pub fn print_import(report: &ImportReport, import_dir: &Path, elapsed: Duration) {
    println!("  {} {}", paint("source:", Tone::Muted), import_dir.display());
    println!("{}", report_table(report));
    println!("  {} {:.2?}", paint("took:", Tone::Muted), elapsed);
    let (tone, text) = import_summary(report);
    line(tone, &text);
}

pub fn print_already_initialized(store: &Path) {
    line(Tone::Good, "Store already initialized, nothing to import");
    println!("  {}", paint(&format!("remove {} to reload", store.display()), Tone::Muted));
}

pub fn print_stats(stats: &DbStats) {
    println!("{}", stats_table(stats));
    println!("  {} {}", paint("total rows:", Tone::Muted), stats.total_rows());
}

pub fn print_references(checks: &[ReferenceCheck]) {
    println!("{}", reference_table(checks));
    let (tone, text) = reference_summary(checks);
    line(tone, &text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ParseError, TableImport};
    use std::path::PathBuf;

    fn report(outcomes: Vec<(&'static str, ImportOutcome)>) -> ImportReport {
        ImportReport {
            tables: outcomes
                .into_iter()
                .map(|(table, outcome)| TableImport {
                    table,
                    path: PathBuf::from(format!("{table}.csv")),
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn test_tone_follows_outcome() {
        assert_eq!(Tone::of(&ImportOutcome::Imported { rows: 3 }), Tone::Good);
        assert_eq!(Tone::of(&ImportOutcome::ParseFailed(ParseError::MissingHeader)), Tone::Skipped);

        let rolled_back = ImportOutcome::StatementFailed(StatementError::Transaction(
            rusqlite::Error::InvalidQuery,
        ));
        assert_eq!(Tone::of(&rolled_back), Tone::Broken);
        assert!(outcome_status(&rolled_back).starts_with("rolled back"));
    }

    #[test]
    fn test_import_summary_takes_worst_outcome() {
        let clean = report(vec![("users", ImportOutcome::Imported { rows: 2 })]);
        assert_eq!(import_summary(&clean), (Tone::Good, "Loaded 2 rows".to_string()));

        let mixed = report(vec![
            ("users", ImportOutcome::Imported { rows: 2 }),
            ("orders", ImportOutcome::ParseFailed(ParseError::MissingHeader)),
        ]);
        let (tone, text) = import_summary(&mixed);
        assert_eq!(tone, Tone::Skipped);
        assert_eq!(text, "Loaded 2 rows; 1 of 2 files were not imported");

        let mut worse = mixed;
        worse.tables.push(TableImport {
            table: "products",
            path: PathBuf::from("products.csv"),
            outcome: ImportOutcome::StatementFailed(StatementError::Transaction(
                rusqlite::Error::InvalidQuery,
            )),
        });
        assert_eq!(import_summary(&worse).0, Tone::Broken);
    }

    #[test]
    fn test_reference_summary() {
        let intact = ReferenceCheck {
            table: "orders",
            column: "user_id",
            target: "users.id".to_string(),
            dangling: 0,
        };
        assert_eq!(reference_summary(&[]).0, Tone::Good);

        let broken = ReferenceCheck { dangling: 4, ..intact.clone() };
        let (tone, text) = reference_summary(&[intact, broken]);
        assert_eq!(tone, Tone::Broken);
        assert_eq!(text, "1 of 2 references have dangling rows");
    }
}
