//! Transactional import of one CSV file into one table

use std::path::Path;
use rusqlite::params_from_iter;
use crate::catalog::TableSchema;
use crate::storage::Store;
use super::csv_file::{self, ParsedFile};
use super::{ImportOutcome, StatementError};

/// Import `path` into `table`.
///
/// All rows are written in one transaction with a single prepared insert.
/// The first rejected row rolls the whole file back. Never fails outright:
/// every problem is reported through the returned outcome.
pub fn import_file(store: &mut Store, path: &Path, table: &TableSchema) -> ImportOutcome {
    let parsed = match csv_file::read_file(path, table) {
        Ok(parsed) => parsed,
        Err(e) => return ImportOutcome::ParseFailed(e),
    };
    tracing::debug!("Parsed {} rows for {} from {}", parsed.len(), table.name, path.display());

    match insert_all(store, table, &parsed) {
        Ok(rows) => ImportOutcome::Imported { rows },
        Err(e) => ImportOutcome::StatementFailed(e),
    }
}

/// Insert every record of `parsed`; dropping the transaction on error rolls it back
fn insert_all(store: &mut Store, table: &TableSchema, parsed: &ParsedFile) -> Result<usize, StatementError> {
    let tx = store.transaction().map_err(StatementError::Transaction)?;

    {
        let mut stmt = tx
            .prepare(&parsed.insert_statement(table.name))
            .map_err(StatementError::Transaction)?;

        for (i, record) in parsed.records.iter().enumerate() {
            stmt.execute(params_from_iter(record.values.iter()))
                .map_err(|source| StatementError::Row {
                    row: i + 1,
                    line: record.line,
                    source,
                })?;
        }
    }

    tx.commit().map_err(StatementError::Transaction)?;
    Ok(parsed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DISTRIBUTION_CENTERS, ORDERS};
    use crate::import::ParseError;
    use crate::storage::create_schema;
    use std::fs;

    fn fresh_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        create_schema(&store).unwrap();
        store
    }

    #[test]
    fn test_import_file_commits_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution_centers.csv");
        fs::write(
            &path,
            "id,name,latitude,longitude\n1,Memphis TN,35.1174,-89.9711\n2,Chicago IL,41.8369,-87.6847\n3,Houston TX,29.7604,-95.3698\n",
        )
        .unwrap();

        let mut store = fresh_store();
        let outcome = import_file(&mut store, &path, &DISTRIBUTION_CENTERS);

        assert!(outcome.is_success());
        assert_eq!(outcome.rows(), 3);
        assert_eq!(store.count_rows(&DISTRIBUTION_CENTERS).unwrap(), 3);

        // Column affinity turns numeric text into numbers
        let row = store
            .get("SELECT typeof(id) AS t, latitude FROM distribution_centers WHERE id = 2", [])
            .unwrap()
            .unwrap();
        assert_eq!(row["t"], "integer");
        assert_eq!(row["latitude"], 41.8369);
    }

    #[test]
    fn test_empty_fields_become_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(
            &path,
            "order_id,user_id,status,gender,created_at,returned_at,shipped_at,delivered_at,num_of_item\n\
             8,3,Processing,F,2022-02-01 10:00:00,,,,2\n",
        )
        .unwrap();

        let mut store = fresh_store();
        assert_eq!(import_file(&mut store, &path, &ORDERS).rows(), 1);

        let row = store
            .get("SELECT returned_at, num_of_item FROM orders WHERE order_id = 8", [])
            .unwrap()
            .unwrap();
        assert!(row["returned_at"].is_null());
        assert_eq!(row["num_of_item"], 2);
    }

    #[test]
    fn test_duplicate_key_rolls_back_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution_centers.csv");
        fs::write(
            &path,
            "id,name,latitude,longitude\n1,A,1.0,1.0\n2,B,2.0,2.0\n2,C,3.0,3.0\n",
        )
        .unwrap();

        let mut store = fresh_store();
        let outcome = import_file(&mut store, &path, &DISTRIBUTION_CENTERS);

        match &outcome {
            ImportOutcome::StatementFailed(StatementError::Row { row, line, .. }) => {
                assert_eq!(*row, 3);
                assert_eq!(*line, 4);
            }
            other => panic!("unexpected outcome: {other}"),
        }
        assert_eq!(outcome.rows(), 0);
        assert_eq!(store.count_rows(&DISTRIBUTION_CENTERS).unwrap(), 0);
    }

    #[test]
    fn test_parse_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution_centers.csv");
        fs::write(&path, "id,name,latitude,longitude\n1,A,1.0,1.0\n2,B\n").unwrap();

        let mut store = fresh_store();
        let outcome = import_file(&mut store, &path, &DISTRIBUTION_CENTERS);

        assert!(matches!(outcome, ImportOutcome::ParseFailed(ParseError::Csv { .. })));
        assert_eq!(store.count_rows(&DISTRIBUTION_CENTERS).unwrap(), 0);
    }

    #[test]
    fn test_missing_table_is_transaction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution_centers.csv");
        fs::write(&path, "id,name,latitude,longitude\n1,A,1.0,1.0\n").unwrap();

        // No schema
        let mut store = Store::open_in_memory().unwrap();
        let outcome = import_file(&mut store, &path, &DISTRIBUTION_CENTERS);
        assert!(matches!(
            outcome,
            ImportOutcome::StatementFailed(StatementError::Transaction(_))
        ));
    }
}
