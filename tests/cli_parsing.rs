//! Tests for CLI option parsing.

use clap::Parser;
use cdn_cache_status::{Config, LogFormat, LogLevel};
use std::path::PathBuf;

#[test]
fn test_defaults_read_stdin() {
    let config = Config::try_parse_from(["cdn_cache_status"]).expect("parse");
    assert_eq!(config.file, PathBuf::from("-"));
    assert!(matches!(config.log_level, LogLevel::Info));
    assert!(matches!(config.log_format, LogFormat::Plain));
    assert!(config.per_tab_badges);
    assert!(!config.probe_theme);
}

#[test]
fn test_all_options() {
    let config = Config::try_parse_from([
        "cdn_cache_status",
        "events.jsonl",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--no-per-tab-badges",
        "--probe-theme",
    ])
    .expect("parse");
    assert_eq!(config.file, PathBuf::from("events.jsonl"));
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
    assert!(!config.per_tab_badges);
    assert!(config.probe_theme);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = Config::try_parse_from(["cdn_cache_status", "--log-level", "verbose"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_flag_is_rejected() {
    let result = Config::try_parse_from(["cdn_cache_status", "--max-concurrency", "10"]);
    assert!(result.is_err());
}

#[test]
fn test_default_matches_parsed_defaults() {
    let parsed = Config::try_parse_from(["cdn_cache_status"]).expect("parse");
    let default = Config::default();
    assert_eq!(parsed.file, default.file);
    assert_eq!(parsed.per_tab_badges, default.per_tab_badges);
    assert_eq!(parsed.probe_theme, default.probe_theme);
}
