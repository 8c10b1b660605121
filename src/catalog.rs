//! Record schema catalog
//!
//! Static declaration of the five dataset tables. Everything downstream
//! (DDL, header validation, insert statements, reference checks) is derived
//! from these definitions.

use std::fmt;

/// SQL storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Real,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl Column {
    pub const fn int(name: &'static str) -> Self {
        Self { name, ty: ColumnType::Int }
    }

    pub const fn real(name: &'static str) -> Self {
        Self { name, ty: ColumnType::Real }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, ty: ColumnType::Text }
    }
}

/// A logical foreign key. Not declared in the DDL; integrity depends on
/// import order alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub column: &'static str,
    pub target_table: &'static str,
    pub target_column: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub source_file: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    pub references: &'static [Reference],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Render the `CREATE TABLE` statement for this table
    pub fn create_statement(&self) -> String {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.name == self.primary_key {
                    format!("{} {} PRIMARY KEY", c.name, c.ty)
                } else {
                    format!("{} {}", c.name, c.ty)
                }
            })
            .collect();
        format!("CREATE TABLE {} (\n    {}\n)", self.name, cols.join(",\n    "))
    }
}

// =============================================================================
// Independent tables
// =============================================================================

pub static DISTRIBUTION_CENTERS: TableSchema = TableSchema {
    name: "distribution_centers",
    source_file: "distribution_centers.csv",
    primary_key: "id",
    columns: &[
        Column::int("id"),
        Column::text("name"),
        Column::real("latitude"),
        Column::real("longitude"),
    ],
    references: &[],
};

pub static USERS: TableSchema = TableSchema {
    name: "users",
    source_file: "users.csv",
    primary_key: "id",
    columns: &[
        Column::int("id"),
        Column::text("first_name"),
        Column::text("last_name"),
        Column::text("email"),
        Column::int("age"),
        Column::text("gender"),
        Column::text("state"),
        Column::text("street_address"),
        Column::text("postal_code"),
        Column::text("city"),
        Column::text("country"),
        Column::real("latitude"),
        Column::real("longitude"),
        Column::text("traffic_source"),
        Column::text("created_at"),
    ],
    references: &[],
};

// =============================================================================
// Dependent tables
// =============================================================================

pub static PRODUCTS: TableSchema = TableSchema {
    name: "products",
    source_file: "products.csv",
    primary_key: "id",
    columns: &[
        Column::int("id"),
        Column::real("cost"),
        Column::text("category"),
        Column::text("name"),
        Column::text("brand"),
        Column::real("retail_price"),
        Column::text("department"),
        Column::text("sku"),
        Column::int("distribution_center_id"),
    ],
    references: &[Reference {
        column: "distribution_center_id",
        target_table: "distribution_centers",
        target_column: "id",
    }],
};

pub static ORDERS: TableSchema = TableSchema {
    name: "orders",
    source_file: "orders.csv",
    primary_key: "order_id",
    columns: &[
        Column::int("order_id"),
        Column::int("user_id"),
        Column::text("status"),
        Column::text("gender"),
        Column::text("created_at"),
        Column::text("returned_at"),
        Column::text("shipped_at"),
        Column::text("delivered_at"),
        Column::int("num_of_item"),
    ],
    references: &[Reference {
        column: "user_id",
        target_table: "users",
        target_column: "id",
    }],
};

pub static ORDER_ITEMS: TableSchema = TableSchema {
    name: "order_items",
    source_file: "order_items.csv",
    primary_key: "id",
    columns: &[
        Column::int("id"),
        Column::int("order_id"),
        Column::int("user_id"),
        Column::int("product_id"),
        Column::int("inventory_item_id"),
        Column::text("status"),
        Column::text("created_at"),
        Column::text("shipped_at"),
        Column::text("delivered_at"),
        Column::text("returned_at"),
        Column::real("sale_price"),
    ],
    references: &[
        Reference {
            column: "order_id",
            target_table: "orders",
            target_column: "order_id",
        },
        Reference {
            column: "user_id",
            target_table: "users",
            target_column: "id",
        },
        Reference {
            column: "product_id",
            target_table: "products",
            target_column: "id",
        },
    ],
};

/// Import order: every table comes after the tables it references.
pub static IMPORT_ORDER: [&TableSchema; 5] =
    [&DISTRIBUTION_CENTERS, &USERS, &PRODUCTS, &ORDERS, &ORDER_ITEMS];

/// All tables, in import order
pub fn all_tables() -> &'static [&'static TableSchema] {
    &IMPORT_ORDER
}

/// Look up a table by name
pub fn table(name: &str) -> Option<&'static TableSchema> {
    IMPORT_ORDER.iter().copied().find(|t| t.name == name)
}
