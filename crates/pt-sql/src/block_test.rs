use super::*;

fn helpers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_create_or_replace_procedure_becomes_block() {
    let source = "CREATE OR REPLACE PROCEDURE p_sync(p_id IN NUMBER) IS\n  v NUMBER;\nBEGIN\n  v := p_id;\nEND p_sync;";
    let block = to_executable_block(source);
    assert_eq!(
        block.as_str(),
        "DECLARE\nv NUMBER;\nBEGIN\n  v := p_id;\nEND;"
    );
}

#[test]
fn test_header_without_parameters_and_as_keyword() {
    let source = "procedure load_all as\nbegin\n  null;\nend;";
    let block = to_executable_block(source);
    assert!(block.as_str().starts_with("DECLARE\nbegin"));
    assert!(block.as_str().ends_with("END;"));
}

#[test]
fn test_editionable_and_quoted_schema_name() {
    let source =
        "CREATE OR REPLACE EDITIONABLE PROCEDURE \"APP\".\"P_X\" AS\nBEGIN\n  NULL;\nEND \"P_X\";";
    let block = to_executable_block(source);
    assert!(block.as_str().starts_with("DECLARE\nBEGIN"));
    assert!(block.as_str().ends_with("END;"));
    assert!(!block.as_str().contains("P_X"));
}

#[test]
fn test_multiline_parameter_list_with_nested_parens() {
    let source = "CREATE PROCEDURE p(\n  a IN VARCHAR2,\n  b IN NUMBER DEFAULT ROUND(1.5)\n) IS\nBEGIN\n  NULL;\nEND;";
    let block = to_executable_block(source);
    assert!(block.as_str().starts_with("DECLARE\nBEGIN"), "{}", block);
}

#[test]
fn test_only_last_end_is_rewritten() {
    let source = "PROCEDURE p IS\nBEGIN\n  BEGIN\n    NULL;\n  END inner_blk;\nEND p;";
    let block = to_executable_block(source);
    assert!(block.as_str().contains("END inner_blk;"));
    assert!(block.as_str().ends_with("END;"));
}

#[test]
fn test_trailing_run_marker_stripped() {
    let source = "CREATE PROCEDURE p IS\nBEGIN\n  NULL;\nEND p;\n/\n";
    let block = to_executable_block(source);
    assert!(block.as_str().ends_with("END;"));
    assert!(!block.as_str().contains('/'));
}

#[test]
fn test_non_procedure_input_passes_through() {
    let source = "  BEGIN\n  NULL;\nEND;  ";
    let block = to_executable_block(source);
    assert_eq!(block.as_str(), "BEGIN\n  NULL;\nEND;");
}

#[test]
fn test_error_helper_becomes_raise() {
    let transformer =
        BlockTransformer::with_helpers(&helpers(&["PKG_LOG.LOG_ERROR"]), &[]).unwrap();
    let source = "PROCEDURE p IS\nBEGIN\n  NULL;\nEXCEPTION WHEN OTHERS THEN\n  pkg_log.log_error('p', SQLERRM);\nEND p;";
    let block = transformer.transform(source);
    assert!(block.as_str().contains("RAISE;"));
    assert!(!block.as_str().to_lowercase().contains("log_error"));
}

#[test]
fn test_status_helper_becomes_null() {
    let transformer =
        BlockTransformer::with_helpers(&[], &helpers(&["DBMS_OUTPUT.PUT_LINE"])).unwrap();
    let source =
        "PROCEDURE p IS\nBEGIN\n  DBMS_OUTPUT.PUT_LINE('done (' || TO_CHAR(SYSDATE) || ')');\nEND;";
    let block = transformer.transform(source);
    assert!(block.as_str().contains("NULL;"));
    assert!(!block.as_str().contains("PUT_LINE"));
}

#[test]
fn test_helper_argument_with_semicolon_in_literal() {
    let transformer = BlockTransformer::with_helpers(&[], &helpers(&["LOG_STATUS"])).unwrap();
    let source = "BEGIN\n  log_status('a;b', 'it''s');\n  x := 1;\nEND;";
    let block = transformer.transform(source);
    assert_eq!(block.as_str(), "BEGIN\n  NULL;\n  x := 1;\nEND;");
}

#[test]
fn test_helper_without_arguments() {
    let transformer = BlockTransformer::with_helpers(&helpers(&["LOG_ERR"]), &[]).unwrap();
    let block = transformer.transform("BEGIN\n  log_err;\nEND;");
    assert_eq!(block.as_str(), "BEGIN\n  RAISE;\nEND;");
}

#[test]
fn test_helper_prefix_does_not_match_longer_name() {
    let transformer = BlockTransformer::with_helpers(&[], &helpers(&["LOG"])).unwrap();
    let block = transformer.transform("BEGIN\n  LOGGER('x');\nEND;");
    assert!(block.as_str().contains("LOGGER('x');"));
}

#[test]
fn test_qualified_call_with_helper_name_is_kept() {
    let transformer = BlockTransformer::with_helpers(&[], &helpers(&["PUT_LINE"])).unwrap();
    let block = transformer.transform(
        "BEGIN\n  DBMS_OUTPUT.PUT_LINE('x');\n  put_line('y');\n  V$PUT_LINE;\nEND;",
    );
    assert_eq!(
        block.as_str(),
        "BEGIN\n  DBMS_OUTPUT.PUT_LINE('x');\n  NULL;\n  V$PUT_LINE;\nEND;"
    );
}

#[test]
fn test_adjacent_helper_calls_are_all_replaced() {
    let transformer = BlockTransformer::with_helpers(&helpers(&["LOG_ERR"]), &[]).unwrap();
    let block = transformer.transform("BEGIN\n  log_err;log_err('x');\nEND;");
    assert_eq!(block.as_str(), "BEGIN\n  RAISE;RAISE;\nEND;");
}

#[test]
fn test_blank_helper_name_rejected() {
    let result = BlockTransformer::with_helpers(&helpers(&["  "]), &[]);
    assert!(matches!(result, Err(SqlError::InvalidHelper { .. })));

    let result = BlockTransformer::with_helpers(&[], &helpers(&["PKG LOG"]));
    assert!(matches!(result, Err(SqlError::InvalidHelper { .. })));
}
