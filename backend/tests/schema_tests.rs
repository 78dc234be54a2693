//! Relational-integrity declarations
//!
//! Deleting a supplier keeps its products with the supplier reference
//! cleared; deleting a product removes its movements; deleting a user keeps
//! the movements it created with `created_by` cleared. Those rules are
//! enforced by the store, so these tests pin the DDL that declares them.

const INITIAL_SCHEMA: &str = include_str!("../migrations/20240115000000_initial_schema.sql");

fn table_block(name: &str) -> &'static str {
    let marker = format!("CREATE TABLE {} (", name);
    let start = INITIAL_SCHEMA
        .find(&marker)
        .unwrap_or_else(|| panic!("table {} missing from initial schema", name));
    let rest = &INITIAL_SCHEMA[start..];
    let end = rest
        .find(");")
        .unwrap_or_else(|| panic!("table {} not terminated", name));
    &rest[..end]
}

fn column_line(block: &'static str, column: &str) -> &'static str {
    block
        .lines()
        .map(str::trim_start)
        .find(|line| line.starts_with(column))
        .unwrap_or_else(|| panic!("column {} missing", column))
}

#[test]
fn test_supplier_delete_nullifies_product_reference() {
    let line = column_line(table_block("products"), "supplier_id");

    assert!(line.contains("REFERENCES suppliers(id)"));
    assert!(line.contains("ON DELETE SET NULL"));
    // Nullable by construction, so the products survive the delete
    assert!(!line.contains("NOT NULL"));
}

#[test]
fn test_product_delete_cascades_to_movements() {
    let line = column_line(table_block("stock_movements"), "product_id");

    assert!(line.contains("NOT NULL"));
    assert!(line.contains("REFERENCES products(id)"));
    assert!(line.contains("ON DELETE CASCADE"));
}

#[test]
fn test_user_delete_preserves_movements() {
    let line = column_line(table_block("stock_movements"), "created_by");

    assert!(line.contains("REFERENCES users(id)"));
    assert!(line.contains("ON DELETE SET NULL"));
    assert!(!line.contains("CASCADE"));
}

#[test]
fn test_all_entities_are_defined() {
    for table in ["users", "suppliers", "products", "stock_movements"] {
        assert!(!table_block(table).is_empty());
    }
}
