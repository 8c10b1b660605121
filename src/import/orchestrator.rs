//! Import orchestration across all catalog tables

use std::path::Path;
use crate::catalog::{self, TableSchema};
use crate::storage::Store;
use super::{import_file, ImportOutcome, ImportReport, TableImport};

/// Import every catalog table from `import_dir`, strictly in order.
///
/// A failed file leaves its table empty and the next file is still
/// imported. Later tables may then reference rows that were never loaded;
/// nothing here repairs that.
pub fn import_all(store: &mut Store, import_dir: &Path) -> ImportReport {
    let mut report = ImportReport::default();

    for table in catalog::all_tables().iter().copied() {
        report.tables.push(import_table(store, import_dir, table));
    }

    tracing::info!(
        "Import finished: {} rows, {} of {} files failed",
        report.total_rows(),
        report.failures().count(),
        report.tables.len()
    );
    report
}

/// Import one table from its conventional file under `import_dir`
pub fn import_table(store: &mut Store, import_dir: &Path, table: &'static TableSchema) -> TableImport {
    let path = import_dir.join(table.source_file);
    let outcome = import_file(store, &path, table);

    match &outcome {
        ImportOutcome::Imported { rows } => {
            tracing::info!("Imported {} rows into {} from {}", rows, table.name, path.display());
        }
        ImportOutcome::ParseFailed(e) => {
            tracing::warn!("Errors parsing {}: {}", path.display(), e);
        }
        ImportOutcome::StatementFailed(e) => {
            tracing::error!("Import into {} rolled back: {}", table.name, e);
        }
    }

    TableImport {
        table: table.name,
        path,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::create_schema;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_import_all_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "distribution_centers.csv", "id,name,latitude,longitude\n1,A,1.0,1.0\n");
        write(
            dir.path(),
            "users.csv",
            "id,first_name,last_name,email,age,gender,state,street_address,postal_code,city,country,latitude,longitude,traffic_source,created_at\n\
             1,Ann,Lee,ann@example.com,30,F,CA,1 Main St,90001,LA,US,34.0,-118.2,Search,2021-01-01\n",
        );
        write(
            dir.path(),
            "products.csv",
            "id,cost,category,name,brand,retail_price,department,sku,distribution_center_id\n1,2.0,Tops,Tee,Acme,9.5,Women,SKU1,1\n",
        );
        write(
            dir.path(),
            "orders.csv",
            "order_id,user_id,status,gender,created_at,returned_at,shipped_at,delivered_at,num_of_item\n1,1,Complete,F,2022-01-01,,2022-01-02,2022-01-03,1\n",
        );
        write(
            dir.path(),
            "order_items.csv",
            "id,order_id,user_id,product_id,inventory_item_id,status,created_at,shipped_at,delivered_at,returned_at,sale_price\n1,1,1,1,100,Complete,2022-01-01,2022-01-02,2022-01-03,,9.5\n",
        );

        let mut store = Store::open_in_memory().unwrap();
        create_schema(&store).unwrap();
        let report = import_all(&mut store, dir.path());

        let order: Vec<&str> = report.tables.iter().map(|t| t.table).collect();
        assert_eq!(
            order,
            vec!["distribution_centers", "users", "products", "orders", "order_items"]
        );
        assert!(report.is_complete());
        assert_eq!(report.total_rows(), 5);
        assert!(store.check_references().unwrap().iter().all(|c| c.is_intact()));
    }

    #[test]
    fn test_missing_files_do_not_stop_later_tables() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "products.csv",
            "id,cost,category,name,brand,retail_price,department,sku,distribution_center_id\n1,2.0,Tops,Tee,Acme,9.5,Women,SKU1,1\n",
        );

        let mut store = Store::open_in_memory().unwrap();
        create_schema(&store).unwrap();
        let report = import_all(&mut store, dir.path());

        assert_eq!(report.failures().count(), 4);
        assert_eq!(report.outcome("products").map(|o| o.rows()), Some(1));
        // The product now references a distribution center that was never loaded
        let dangling = store.check_references().unwrap();
        let products = dangling.iter().find(|c| c.table == "products").unwrap();
        assert_eq!(products.dangling, 1);
    }
}
