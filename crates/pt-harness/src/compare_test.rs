use super::*;
use pt_core::ResultColumn;

fn result(columns: &[(&str, &str)], rows: Vec<Vec<Value>>) -> ResultSet {
    ResultSet::new(
        columns
            .iter()
            .map(|(name, ty)| ResultColumn::new(*name, *ty))
            .collect(),
        rows,
    )
}

fn customers(rows: Vec<Vec<Value>>) -> ResultSet {
    result(&[("ID", "INTEGER"), ("NAME", "VARCHAR")], rows)
}

fn row(id: i64, name: Option<&str>) -> Vec<Value> {
    vec![Value::Integer(id), name.map(str::to_string).into()]
}

#[test]
fn test_identical_results() {
    let a = customers(vec![row(1, Some("a")), row(2, None)]);
    let outcome = compare_results(&a, &a.clone());
    assert!(outcome.identical);
    assert!(outcome.mismatches.is_empty());
    assert_eq!(outcome.summary, IDENTICAL_SUMMARY);
}

#[test]
fn test_empty_results_identical() {
    let a = customers(Vec::new());
    assert!(compare_results(&a, &a).identical);
}

#[test]
fn test_row_count_mismatch_stops_comparison() {
    let a = customers(vec![row(1, Some("a")), row(2, Some("b"))]);
    let b = customers(vec![row(9, Some("z"))]);
    let outcome = compare_results(&a, &b);
    assert!(!outcome.identical);
    assert_eq!(
        outcome.mismatches,
        vec![Mismatch::RowCount {
            expected: 2,
            actual: 1
        }]
    );
    assert_eq!(outcome.summary, "Row count mismatch: Before=2, After=1");
}

#[test]
fn test_count_mismatch_is_symmetric() {
    let a = customers(vec![row(1, Some("a"))]);
    let b = customers(Vec::new());
    assert!(!compare_results(&a, &b).identical);
    assert!(!compare_results(&b, &a).identical);
}

#[test]
fn test_column_count_mismatch_stops_comparison() {
    let a = customers(vec![row(1, Some("a"))]);
    let b = result(&[("ID", "INTEGER")], vec![vec![Value::Integer(2)]]);
    let outcome = compare_results(&a, &b);
    assert_eq!(
        outcome.mismatches,
        vec![Mismatch::ColumnCount {
            expected: 2,
            actual: 1
        }]
    );
}

#[test]
fn test_column_name_and_type_mismatches_collected() {
    let a = customers(vec![row(1, Some("a"))]);
    let b = result(
        &[("CUSTOMER_ID", "BIGINT"), ("NAME", "VARCHAR")],
        vec![vec![Value::Integer(5), Value::Text("zzz".into())]],
    );
    let outcome = compare_results(&a, &b);
    assert_eq!(outcome.mismatches.len(), 2);
    assert!(matches!(outcome.mismatches[0], Mismatch::ColumnName { index: 0, .. }));
    assert!(matches!(outcome.mismatches[1], Mismatch::ColumnType { index: 0, .. }));
    // Cell checks are skipped once the structure differs
    assert!(!outcome
        .mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::Cell { .. })));
}

#[test]
fn test_unknown_types_not_compared() {
    let a = ResultSet::new(
        vec![ResultColumn::untyped("ID")],
        vec![vec![Value::Integer(1)]],
    );
    let b = result(&[("ID", "INTEGER")], vec![vec![Value::Integer(1)]]);
    assert!(compare_results(&a, &b).identical);
}

#[test]
fn test_cell_mismatches_row_major() {
    let a = customers(vec![row(1, Some("a")), row(2, Some("b"))]);
    let b = customers(vec![row(1, Some("x")), row(3, Some("b"))]);
    let outcome = compare_results(&a, &b);
    assert_eq!(
        outcome.mismatches,
        vec![
            Mismatch::Cell {
                row: 0,
                column: "NAME".into(),
                expected: Value::Text("a".into()),
                actual: Value::Text("x".into()),
            },
            Mismatch::Cell {
                row: 1,
                column: "ID".into(),
                expected: Value::Integer(2),
                actual: Value::Integer(3),
            },
        ]
    );
    assert_eq!(
        outcome.summary,
        "Data mismatch at Row 0, Column 'NAME': Before='a', After='x'\n\
         Data mismatch at Row 1, Column 'ID': Before='2', After='3'"
    );
}

#[test]
fn test_null_never_equals_empty_string() {
    let a = customers(vec![row(1, None)]);
    let b = customers(vec![row(1, Some(""))]);
    let outcome = compare_results(&a, &b);
    assert!(!outcome.identical);
    assert!(outcome.summary.contains("[NULL]"));
}

#[test]
fn test_no_coercion_between_kinds() {
    let a = result(&[("N", "INTEGER")], vec![vec![Value::Integer(1)]]);
    let b = result(&[("N", "INTEGER")], vec![vec![Value::Text("1".into())]]);
    assert!(!compare_results(&a, &b).identical);
}

#[test]
fn test_rendered_cell_mismatches_truncated() {
    let a = customers((1..=5).map(|i| row(i, Some("a"))).collect());
    let b = customers((1..=5).map(|i| row(i, Some("b"))).collect());
    let outcome = Comparator::new(2).compare(&a, &b);

    assert_eq!(outcome.mismatches.len(), 5);
    let lines: Vec<&str> = outcome.summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "... and 3 more");
}
