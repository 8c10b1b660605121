//! SQLite storage implementation

use std::path::Path;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Statement, Transaction};
use serde::Serialize;
use serde_json::Value;
use crate::catalog::{self, Reference, TableSchema};
use crate::{Error, Result};

/// One result row: column name to JSON value
pub type Row = serde_json::Map<String, Value>;

/// Handle to the dataset store.
///
/// Wraps the single long-lived connection. The caller owns it and passes it
/// by reference to every consumer.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| Error::StoreAccess(e.into()))?;
        Ok(Self { conn })
    }

    /// Open a database file that must already exist
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::StoreMissing(path.to_path_buf()));
        }
        Self::open(path)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::StoreAccess(e.into()))?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn transaction(&mut self) -> rusqlite::Result<Transaction<'_>> {
        self.conn.transaction()
    }

    // ========== Query Operations ==========

    /// Run a parameterized query and return every row
    pub fn all<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        collect_rows(&mut stmt, params, None)
    }

    /// Run a parameterized query and return the first row, if any
    pub fn get<P: Params>(&self, sql: &str, params: P) -> Result<Option<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        Ok(collect_rows(&mut stmt, params, Some(1))?.pop())
    }

    /// Count rows in a catalog table
    pub fn count_rows(&self, table: &TableSchema) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get row counts for every catalog table
    pub fn stats(&self) -> Result<DbStats> {
        let tables = catalog::all_tables()
            .iter()
            .map(|t| {
                Ok(TableCount {
                    table: t.name,
                    rows: self.count_rows(t)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DbStats { tables })
    }

    // ========== Reference Checks ==========

    /// Count rows of `table` whose `reference` column names a missing row.
    /// NULL values are not counted.
    pub fn dangling_references(&self, table: &TableSchema, reference: &Reference) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {t} c WHERE c.{col} IS NOT NULL \
             AND NOT EXISTS (SELECT 1 FROM {target} p WHERE p.{tcol} = c.{col})",
            t = table.name,
            col = reference.column,
            target = reference.target_table,
            tcol = reference.target_column,
        );
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check every logical reference declared in the catalog
    pub fn check_references(&self) -> Result<Vec<ReferenceCheck>> {
        let mut checks = Vec::new();
        for table in catalog::all_tables() {
            for reference in table.references {
                checks.push(ReferenceCheck {
                    table: table.name,
                    column: reference.column,
                    target: format!("{}.{}", reference.target_table, reference.target_column),
                    dangling: self.dangling_references(table, reference)?,
                });
            }
        }
        Ok(checks)
    }
}

fn collect_rows<P: Params>(stmt: &mut Statement<'_>, params: P, max: Option<usize>) -> Result<Vec<Row>> {
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();

    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, name) in names.iter().enumerate() {
            record.insert(name.clone(), value_to_json(row.get_ref(i)?));
        }
        out.push(record);
        if max.is_some_and(|m| out.len() >= m) {
            break;
        }
    }

    Ok(out)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::from(b.to_vec()),
    }
}

/// Row count of one table
#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: usize,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub tables: Vec<TableCount>,
}

impl DbStats {
    pub fn rows(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        for t in &self.tables {
            writeln!(f, "  {}: {}", t.table, t.rows)?;
        }
        write!(f, "  Total: {}", self.total_rows())
    }
}

/// Result of checking one logical reference
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceCheck {
    pub table: &'static str,
    pub column: &'static str,
    pub target: String,
    pub dangling: usize,
}

impl ReferenceCheck {
    pub fn is_intact(&self) -> bool {
        self.dangling == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DISTRIBUTION_CENTERS, PRODUCTS};
    use crate::storage::create_schema;

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        create_schema(&store).unwrap();
        store
            .conn()
            .execute_batch(
                "INSERT INTO distribution_centers VALUES (1, 'Memphis TN', 35.1174, -89.9711);
                 INSERT INTO distribution_centers VALUES (2, 'Chicago IL', 41.8369, -87.6847);
                 INSERT INTO products (id, name, retail_price, distribution_center_id) VALUES (10, 'Socks', 4.5, 1);
                 INSERT INTO products (id, name, retail_price, distribution_center_id) VALUES (11, 'Scarf', NULL, 7);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_all_returns_json_rows() {
        let store = seeded_store();
        let rows = store
            .all("SELECT id, name, latitude FROM distribution_centers ORDER BY id", [])
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["name"], "Memphis TN");
        assert_eq!(rows[1]["latitude"], 41.8369);
    }

    #[test]
    fn test_get_with_params() {
        let store = seeded_store();

        let row = store
            .get("SELECT name, retail_price FROM products WHERE id = ?1", [11])
            .unwrap()
            .unwrap();
        assert_eq!(row["name"], "Scarf");
        assert!(row["retail_price"].is_null());

        let missing = store.get("SELECT * FROM products WHERE id = ?1", [404]).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_stats_and_counts() {
        let store = seeded_store();
        assert_eq!(store.count_rows(&DISTRIBUTION_CENTERS).unwrap(), 2);

        let stats = store.stats().unwrap();
        assert_eq!(stats.tables.len(), 5);
        assert_eq!(stats.rows("products"), Some(2));
        assert_eq!(stats.rows("users"), Some(0));
        assert_eq!(stats.total_rows(), 4);
    }

    #[test]
    fn test_dangling_references() {
        let store = seeded_store();
        let reference = &PRODUCTS.references[0];
        assert_eq!(store.dangling_references(&PRODUCTS, reference).unwrap(), 1);

        let checks = store.check_references().unwrap();
        assert_eq!(checks.len(), 5);
        let products = checks.iter().find(|c| c.table == "products").unwrap();
        assert!(!products.is_intact());
        assert_eq!(products.target, "distribution_centers.id");
    }

    #[test]
    fn test_open_existing_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let err = Store::open_existing(&path).err().unwrap();
        assert!(matches!(err, Error::StoreMissing(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_store_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.db");
        let err = Store::open(&path).err().unwrap();
        assert!(matches!(err, Error::StoreAccess(_)));
    }
}
