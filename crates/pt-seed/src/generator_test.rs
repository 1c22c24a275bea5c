use super::*;
use pt_core::{ColumnSchema, TableSchema};

fn table(name: &str, columns: &[(&str, &str)]) -> TableSchema {
    TableSchema {
        name: TableName::new(name),
        columns: columns
            .iter()
            .map(|(col, ty)| ColumnSchema::parse(*col, ty))
            .collect(),
    }
}

fn text(value: &SeedValue) -> &str {
    match value {
        SeedValue::Text(s) => s,
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_digit_count() {
    assert_eq!(digit_count(0), 1);
    assert_eq!(digit_count(9), 1);
    assert_eq!(digit_count(10), 2);
    assert_eq!(digit_count(1000), 4);
}

#[test]
fn test_regular_string_values_fit_declared_length() {
    let t = table("CUSTOMERS", &[("NAME", "VARCHAR2(50)")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 10, 1, &mut diags);

    assert!(diags.is_empty());
    assert_eq!(buffer.row_count(), 10);
    for (idx, row) in buffer.rows.iter().enumerate() {
        let value = text(&row[0]);
        assert!(value.starts_with("Val_"));
        assert!(value.ends_with(&format!("_{}", idx + 1)));
        assert!(value.len() <= 48, "{value} exceeds length budget");
    }
    // 50 - 2 - 4 - 1 - 2 = 41, capped at 20
    assert_eq!(text(&buffer.rows[0][0]).len(), "Val_".len() + 20 + "_1".len());
}

#[test]
fn test_fragment_shrinks_with_small_length() {
    // 10 - 2 - 4 - 1 - 1 = 2
    let t = table("T", &[("CODE", "VARCHAR2(10)")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 5, 3, &mut diags);
    assert!(diags.is_empty());
    let first = text(&buffer.rows[0][0]);
    assert_eq!(first.len(), "Val_".len() + 2 + "_1".len());
}

#[test]
fn test_short_fallback() {
    // 8 - 2 - 4 - 1 - 1 = 0, "E_" + 1 digit fits in 6
    let t = table("T", &[("CODE", "VARCHAR2(8)")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 3, 3, &mut diags);
    assert_eq!(text(&buffer.rows[2][0]), "E_3");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::ShortStringFallback);
    assert_eq!(diags[0].column, "CODE");
}

#[test]
fn test_empty_and_null_fallbacks() {
    let t = table("T", &[("FLAG", "CHAR(2)"), ("X", "CHAR(1)")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 4, 3, &mut diags);
    assert_eq!(buffer.rows[0][0], SeedValue::Text(String::new()));
    assert_eq!(buffer.rows[0][1], SeedValue::Null);

    let kinds: Vec<DiagnosticKind> = diags.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::EmptyStringFallback,
            DiagnosticKind::NullStringFallback
        ]
    );
}

#[test]
fn test_diagnostics_recorded_once_per_column() {
    let t = table("T", &[("BLOB_COL", "BLOB")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 25, 3, &mut diags);
    assert!(buffer.rows.iter().all(|r| r[0] == SeedValue::Null));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::UnsupportedType);
    assert!(diags[0].message.contains("BLOB"));
}

#[test]
fn test_numeric_values_in_range() {
    let t = table("T", &[("AMOUNT", "NUMBER")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 50, 11, &mut diags);
    for (idx, row) in buffer.rows.iter().enumerate() {
        match row[0] {
            SeedValue::Number(n) => {
                let i = (idx + 1) as i64;
                assert!(n >= 1 + i && n <= 100_000 + i, "{n} out of range for row {i}");
            }
            ref other => panic!("expected number, got {other:?}"),
        }
    }
}

#[test]
fn test_numeric_values_respect_precision() {
    let t = table("T", &[("QTY", "NUMBER(3)"), ("RATE", "NUMBER(4,2)"), ("Z", "NUMBER(2,2)")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 30, 5, &mut diags);
    for row in &buffer.rows {
        assert!(matches!(row[0], SeedValue::Number(n) if (0..1000).contains(&n)));
        assert!(matches!(row[1], SeedValue::Number(n) if (0..100).contains(&n)));
        assert_eq!(row[2], SeedValue::Number(0));
    }
}

#[test]
fn test_dates_advance_from_epoch() {
    let t = table("T", &[("CREATED", "DATE")]);
    let mut diags = Vec::new();
    let buffer = generate_table(&t, 3, 5, &mut diags);
    let expected: Vec<SeedValue> = ["2000-01-01", "2000-01-02", "2000-01-03"]
        .iter()
        .map(|d| SeedValue::Date(d.parse().unwrap()))
        .collect();
    let actual: Vec<SeedValue> = buffer.rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_same_seed_same_rows() {
    let t = table("T", &[("NAME", "VARCHAR2(40)"), ("N", "NUMBER")]);
    let mut diags = Vec::new();
    let a = generate_table(&t, 20, 99, &mut diags);
    let b = generate_table(&t, 20, 99, &mut diags);
    let c = generate_table(&t, 20, 100, &mut diags);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_table_seed_depends_on_name_not_case() {
    let upper = table_seed(7, &TableName::new("ORDERS"));
    let lower = table_seed(7, &TableName::new("orders"));
    let other = table_seed(7, &TableName::new("CUSTOMERS"));
    assert_eq!(upper, lower);
    assert_ne!(upper, other);
}

#[test]
fn test_key_columns_get_distinct_row_indices() {
    let t = table("CUSTOMERS", &[("ID", "NUMBER"), ("SCORE", "NUMBER(3)")]);
    let mut diags = Vec::new();
    let buffer = generate_keyed_table(&t, &["id"], 12, 4, &mut diags);

    assert!(diags.is_empty());
    let ids: Vec<SeedValue> = buffer.rows.iter().map(|row| row[0].clone()).collect();
    let expected: Vec<SeedValue> = (1..=12).map(SeedValue::Number).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_narrow_key_column_is_reported() {
    let t = table("CODES", &[("ID", "NUMBER(1)")]);
    let mut diags = Vec::new();
    let buffer = generate_keyed_table(&t, &["ID"], 15, 4, &mut diags);

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::KeyRangeTooSmall);
    assert_eq!(buffer.rows[9][0], SeedValue::Number(0));
    assert_eq!(buffer.rows[10][0], SeedValue::Number(1));
}
