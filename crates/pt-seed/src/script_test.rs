use super::*;
use crate::generator::DiagnosticKind;
use pt_core::ColumnSchema;

fn table(name: &str, columns: &[(&str, &str)]) -> TableSchema {
    TableSchema {
        name: TableName::new(name),
        columns: columns
            .iter()
            .map(|(col, ty)| ColumnSchema::parse(*col, ty))
            .collect(),
    }
}

fn sample_tables() -> Vec<TableSchema> {
    vec![
        table(
            "APP.CUSTOMERS",
            &[("ID", "NUMBER(10)"), ("NAME", "VARCHAR2(40)")],
        ),
        table(
            "APP.ORDERS",
            &[("ID", "NUMBER"), ("CUSTOMER_ID", "NUMBER"), ("ORDERED_ON", "DATE")],
        ),
    ]
}

#[test]
fn test_zero_rows_rejected() {
    let result = generate_seed_script(&sample_tables(), 0, 1, SqlDialect::DuckDb);
    assert!(matches!(result, Err(SeedError::InvalidSchema { .. })));
}

#[test]
fn test_no_tables_rejected() {
    let result = generate_seed_script(&[], 10, 1, SqlDialect::DuckDb);
    assert!(matches!(result, Err(SeedError::InvalidSchema { .. })));
}

#[test]
fn test_tables_without_columns_skipped() {
    let tables = vec![
        TableSchema {
            name: TableName::new("EMPTY"),
            columns: Vec::new(),
        },
        table("KEEP", &[("ID", "NUMBER")]),
    ];
    let script = generate_seed_script(&tables, 2, 1, SqlDialect::DuckDb).unwrap();
    assert_eq!(script.tables, vec![TableName::new("KEEP")]);
    assert!(!script.sql.contains("EMPTY"));

    let only_empty = &tables[..1];
    assert!(generate_seed_script(only_empty, 2, 1, SqlDialect::DuckDb).is_err());
}

#[test]
fn test_table_names_in_schema_order() {
    let script = generate_seed_script(&sample_tables(), 3, 1, SqlDialect::DuckDb).unwrap();
    let names: Vec<&str> = script.tables.iter().map(|t| t.as_str()).collect();
    assert_eq!(names, vec!["APP.CUSTOMERS", "APP.ORDERS"]);
    assert_eq!(script.row_count, 3);
    assert_eq!(script.seed, 1);
}

#[test]
fn test_duckdb_rendering() {
    let tables = vec![table("T", &[("ID", "NUMBER(1)"), ("D", "DATE"), ("X", "BLOB")])];
    let script = generate_seed_script(&tables, 2, 1, SqlDialect::DuckDb).unwrap();

    assert!(script
        .sql
        .starts_with("INSERT INTO T (\"ID\", \"D\", \"X\") VALUES\n"));
    assert!(script.sql.contains(", DATE '2000-01-01', NULL)"));
    assert!(script.sql.contains(", DATE '2000-01-02', NULL);"));
    assert_eq!(script.sql.matches("INSERT INTO").count(), 1);
    assert_eq!(script.diagnostics.len(), 1);
}

#[test]
fn test_oracle_rendering() {
    let script = generate_seed_script(&sample_tables(), 2, 1, SqlDialect::Oracle).unwrap();
    let sql = &script.sql;

    assert!(sql.starts_with("DECLARE\n"));
    assert!(sql.contains(
        "  TYPE t_seed_1 IS TABLE OF APP.CUSTOMERS%ROWTYPE INDEX BY PLS_INTEGER;\n"
    ));
    assert!(sql.contains("  v_seed_2 t_seed_2;\n"));
    assert!(sql.contains("  v_seed_2(2).\"ORDERED_ON\" := DATE '2000-01-02';\n"));
    assert!(sql.contains("  FORALL i IN 1 .. v_seed_1.COUNT\n"));
    assert!(sql.contains("    INSERT INTO APP.ORDERS VALUES v_seed_2(i);\n"));
    assert!(sql.ends_with("END;"));
}

#[test]
fn test_string_literals_are_quoted() {
    let tables = vec![table("T", &[("NAME", "VARCHAR2(30)")])];
    let script = generate_seed_script(&tables, 1, 4, SqlDialect::DuckDb).unwrap();
    assert!(script.sql.contains("('Val_"));
    assert!(script.sql.contains("_1')"));
}

#[test]
fn test_same_seed_renders_identical_script() {
    let a = generate_seed_script(&sample_tables(), 10, 42, SqlDialect::Oracle).unwrap();
    let b = generate_seed_script(&sample_tables(), 10, 42, SqlDialect::Oracle).unwrap();
    assert_eq!(a.sql, b.sql);
}

#[test]
fn test_resolve_seed_prefers_configured() {
    assert_eq!(resolve_seed(Some(17)), 17);
}

fn orders_customer_key() -> ForeignKey {
    ForeignKey {
        child: TableName::new("APP.ORDERS"),
        child_columns: vec!["CUSTOMER_ID".to_string()],
        parent: TableName::new("APP.CUSTOMERS"),
        parent_columns: vec!["ID".to_string()],
    }
}

#[test]
fn test_linked_script_inserts_parents_first() {
    let mut tables = sample_tables();
    tables.reverse();
    let keys = vec![orders_customer_key()];

    let script = generate_linked_seed_script(&tables, &keys, 5, 8, SqlDialect::DuckDb).unwrap();

    let names: Vec<&str> = script.tables.iter().map(|t| t.as_str()).collect();
    assert_eq!(names, vec!["APP.CUSTOMERS", "APP.ORDERS"]);
    let customers_at = script.sql.find("INSERT INTO APP.CUSTOMERS").unwrap();
    let orders_at = script.sql.find("INSERT INTO APP.ORDERS").unwrap();
    assert!(customers_at < orders_at);
    assert!(script.diagnostics.is_empty());
}

#[test]
fn test_linked_script_references_existing_parent_keys() {
    let keys = vec![orders_customer_key()];
    let script =
        generate_linked_seed_script(&sample_tables(), &keys, 6, 8, SqlDialect::DuckDb).unwrap();

    // Customer ids are the row indices; every order row ends with
    // `, <customer id>, DATE '...')`.
    assert!(script.sql.contains("(1, 'Val_"));
    assert!(script.sql.contains("(6, 'Val_"));
    let orders_sql = &script.sql[script.sql.find("INSERT INTO APP.ORDERS").unwrap()..];
    for line in orders_sql.lines().skip(1) {
        let fields: Vec<&str> = line.trim().trim_start_matches('(').split(", ").collect();
        let customer_id: i64 = fields[1].parse().unwrap();
        assert!((1..=6).contains(&customer_id), "{line}");
    }
}

#[test]
fn test_unseeded_parent_is_a_diagnostic() {
    let tables = vec![sample_tables().remove(1)];
    let keys = vec![orders_customer_key()];
    let script = generate_linked_seed_script(&tables, &keys, 2, 8, SqlDialect::DuckDb).unwrap();

    assert_eq!(script.diagnostics.len(), 1);
    assert_eq!(script.diagnostics[0].kind, DiagnosticKind::UnlinkedForeignKey);
}
