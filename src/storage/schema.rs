//! Database schema definitions

use crate::catalog;
use crate::storage::Store;
use crate::{Error, Result};

/// `CREATE TABLE` statements for every catalog table, in import order.
///
/// No `IF NOT EXISTS`: the schema is only ever created on a fresh store, and
/// a pre-existing table is an error.
pub fn all_schema_statements() -> Vec<String> {
    catalog::all_tables()
        .iter()
        .map(|t| t.create_statement())
        .collect()
}

/// Create the five tables as a single batch.
///
/// Any DDL failure aborts with [`Error::Schema`]. Tables created before the
/// failing statement are left in place.
pub fn create_schema(store: &Store) -> Result<()> {
    let batch = all_schema_statements().join(";\n") + ";";
    store.conn().execute_batch(&batch).map_err(Error::Schema)?;
    tracing::debug!("Created {} tables", catalog::all_tables().len());
    Ok(())
}
