use clap::{CommandFactory, FromArgMatches, Parser};
use rankboard::config::Config;
use rankboard::error::BoardError;
use rankboard::pipeline::{SortDirection, SortSpec};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let mut argv = vec!["rankboard"];
    argv.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(argv);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_clap_defaults_match_default_impl() {
    let (config, _) = parse(&[]);
    assert_eq!(config, Config::default());
    assert_eq!(config.limits.top_sources, 7);
    assert_eq!(config.limits.frequent_sources, 10);
    assert_eq!(config.limits.category_ranking, 15);
    assert_eq!(config.view.debounce(), Duration::from_millis(300));
    assert_eq!(config.view.sort_spec().unwrap(), SortSpec::default());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = json_file(r#"{"limits": {"top_sources": 4}, "view": {"sort": "fire:asc"}}"#);
    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.limits.top_sources, 4);
    assert_eq!(config.limits.frequent_sources, 10);
    assert_eq!(
        config.view.sort_spec().unwrap(),
        SortSpec::new("fire", SortDirection::Asc)
    );
}

#[test]
fn test_explicit_flags_override_file_values_only() {
    let file = json_file(r#"{"limits": {"top_sources": 4, "frequent_sources": 20}}"#);
    let mut config = Config::load_from_file(file.path()).unwrap();

    let (cli, matches) = parse(&["--top-sources", "3", "--filter", "ann"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.limits.top_sources, 3);
    assert_eq!(config.limits.frequent_sources, 20);
    assert_eq!(config.view.filter, "ann");
    assert_eq!(config.limits.category_ranking, 15);
}

#[test]
fn test_bad_sort_in_file_is_a_config_error() {
    let file = json_file(r#"{"view": {"sort": "fire:sideways"}}"#);
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(BoardError::Config(_))
    ));
}

#[test]
fn test_malformed_json_is_a_json_error() {
    let file = json_file("{ not json");
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(BoardError::Json(_))
    ));
}

#[test]
fn test_missing_file_is_a_config_error() {
    assert!(matches!(
        Config::load_from_file("/no/such/config.json"),
        Err(BoardError::Config(_))
    ));
}
