use super::*;
use std::io::Write;

fn global(config: Option<String>) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        config,
    }
}

#[test]
fn test_load_config_from_flag() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "row_count: 3\nseed: 11\nstatus_helpers: [log_status]").unwrap();

    let config = load_config(&global(Some(file.path().display().to_string()))).unwrap();

    assert_eq!(config.row_count, 3);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.status_helpers, vec!["log_status"]);
}

#[test]
fn test_load_config_missing_flag_path_is_an_error() {
    let err = load_config(&global(Some("/nonexistent/proctor.yml".to_string()))).unwrap_err();
    assert!(format!("{err:#}").contains("E001"));
}

#[test]
fn test_overrides_win() {
    let config = apply_overrides(ValidationConfig::default(), Some(4), Some(9));
    assert_eq!(config.row_count, 4);
    assert_eq!(config.seed, Some(9));

    let untouched = apply_overrides(ValidationConfig::default(), None, None);
    assert_eq!(untouched, ValidationConfig::default());
}

#[test]
fn test_read_input_names_the_file() {
    let err = read_input("/nonexistent/plan.json", "plan").unwrap_err();
    assert!(err.to_string().contains("plan file /nonexistent/plan.json"));
}
