// tests/logging.rs

use buildjs::cli::LogLevel;
use buildjs::logging::build_filter;

#[test]
fn cli_level_overrides_environment() {
    let filter = build_filter(Some(LogLevel::Debug), Some("trace"));
    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn environment_directives_are_used_verbatim() {
    let filter = build_filter(None, Some("buildjs=trace"));
    assert_eq!(filter.to_string(), "buildjs=trace");
}

#[test]
fn blank_environment_falls_back_to_info() {
    assert_eq!(build_filter(None, None).to_string(), "info");
    assert_eq!(build_filter(None, Some("  ")).to_string(), "info");
}
