use rankboard::error::BoardError;
use rankboard::records::process;
use rankboard::scorer::loader::{load_player_rows, load_rules, read_player_rows, read_rules};
use serde_json::json;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_player_names_stay_text() {
    let csv = "PLAYER,fire\ntrue,1\nTRUE,2\n1e3,3\n007,4\n";
    let table = read_player_rows(Cursor::new(csv)).unwrap();
    let names: Vec<_> = table.rows.iter().map(|r| r["PLAYER"].clone()).collect();
    assert_eq!(names, vec![json!("true"), json!("TRUE"), json!("1e3"), json!("007")]);

    let out = process(&table.rows, &[]);
    assert_eq!(out.records.len(), 4);
    assert_eq!(out.records[2].name(), "1e3");
    assert_eq!(table.rows[3]["fire"], json!(4));
}

#[test]
fn test_player_csv_is_dynamically_typed() {
    let csv = " PLAYER ,fire,water,note\nAnn,10,5.5,hi\nBo,2,,\n";
    let table = read_player_rows(Cursor::new(csv)).unwrap();

    assert_eq!(table.headers, vec!["PLAYER", "fire", "water", "note"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["PLAYER"], json!("Ann"));
    assert_eq!(table.rows[0]["fire"], json!(10));
    assert_eq!(table.rows[0]["water"], json!(5.5));
    assert_eq!(table.rows[1]["water"], serde_json::Value::Null);
}

#[test]
fn test_blank_rows_are_skipped() {
    let csv = "PLAYER,fire\nAnn,1\n,\n  ,  \nBo,2\n";
    let table = read_player_rows(Cursor::new(csv)).unwrap();
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn test_short_rows_are_tolerated() {
    let csv = "PLAYER,fire,water\nAnn,1\n";
    let table = read_player_rows(Cursor::new(csv)).unwrap();
    assert_eq!(table.rows.len(), 1);
    assert!(table.rows[0].get("water").is_none());
}

#[test]
fn test_rules_skip_unusable_rows() {
    let csv = "Category,Score_Per_Unit\nfire,3\n,4\nwater,abc\nearth, 1.5 \n";
    let rules = read_rules(Cursor::new(csv)).unwrap();
    let cats: Vec<&str> = rules.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(cats, vec!["fire", "earth"]);
    assert_eq!(rules[1].score_per_unit, 1.5);
}

#[test]
fn test_load_from_files_end_to_end() {
    let mut players = NamedTempFile::new().unwrap();
    writeln!(players, "PLAYER,fire,water").unwrap();
    writeln!(players, "Ann,10,5").unwrap();
    writeln!(players, "Bo,2,").unwrap();

    let mut rules = NamedTempFile::new().unwrap();
    writeln!(rules, "Category,Score_Per_Unit").unwrap();
    writeln!(rules, "fire,3").unwrap();

    let table = load_player_rows(players.path()).unwrap();
    assert!(table.last_modified.is_some());
    let rules = load_rules(rules.path()).unwrap();

    let out = process(&table.rows, &rules);
    assert_eq!(out.records[0].total_score(), 30.0);
    assert_eq!(out.records[1].unit_count(), 2.0);
}

#[test]
fn test_empty_player_file_is_an_error() {
    let mut players = NamedTempFile::new().unwrap();
    writeln!(players, "PLAYER,fire").unwrap();
    let err = load_player_rows(players.path()).unwrap_err();
    assert!(matches!(err, BoardError::Validation(_)));
}

#[test]
fn test_missing_files_are_io_errors() {
    assert!(matches!(
        load_player_rows("/definitely/not/here.csv"),
        Err(BoardError::Io(_))
    ));
    assert!(matches!(
        load_rules("/definitely/not/rules.csv"),
        Err(BoardError::Io(_))
    ));
}

#[test]
fn test_empty_rules_file_yields_no_rules() {
    let mut rules = NamedTempFile::new().unwrap();
    writeln!(rules, "Category,Score_Per_Unit").unwrap();
    assert!(load_rules(rules.path()).unwrap().is_empty());
}
