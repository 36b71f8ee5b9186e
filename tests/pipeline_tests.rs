mod common;

use common::{record, scenario_rows, scenario_rules};
use rankboard::pipeline::{filter_and_sort, SortDirection, SortSpec, ViewMemo};
use rankboard::records::{process, ProcessedRecord};
use rankboard::scorer::Rule;
use rstest::rstest;

fn names(records: &[ProcessedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name()).collect()
}

fn scenario() -> Vec<ProcessedRecord> {
    process(&scenario_rows(), &scenario_rules()).records
}

#[rstest]
#[case("an", vec!["Ann"])]
#[case("AN", vec!["Ann"])]
#[case("o", vec!["Bo"])]
#[case("", vec!["Ann", "Bo"])]
#[case("zzz", vec![])]
fn test_filter_is_case_insensitive_substring(#[case] filter: &str, #[case] expected: Vec<&str>) {
    let records = scenario();
    let out = filter_and_sort(&records, filter, &SortSpec::default());
    assert_eq!(names(&out), expected);
}

#[rstest]
#[case(SortDirection::Desc, vec!["Ann", "Bo"])]
#[case(SortDirection::Asc, vec!["Bo", "Ann"])]
fn test_sort_by_total_score(#[case] direction: SortDirection, #[case] expected: Vec<&str>) {
    let records = scenario();
    let out = filter_and_sort(&records, "", &SortSpec::new("TOTAL_SCORE", direction));
    assert_eq!(names(&out), expected);
}

#[test]
fn test_ties_keep_filtered_order_in_both_directions() {
    let rules: Vec<Rule> = vec![];
    let records = vec![
        record("c", &[("fire", 1.0)], &rules),
        record("a", &[("fire", 1.0)], &rules),
        record("b", &[("fire", 2.0)], &rules),
        record("d", &[("fire", 1.0)], &rules),
    ];
    let desc = filter_and_sort(&records, "", &SortSpec::new("fire", SortDirection::Desc));
    assert_eq!(names(&desc), vec!["b", "c", "a", "d"]);
    let asc = filter_and_sort(&records, "", &SortSpec::new("fire", SortDirection::Asc));
    assert_eq!(names(&asc), vec!["c", "a", "d", "b"]);
}

#[test]
fn test_text_sort_folds_case_first() {
    let records = vec![
        record("bob", &[], &[]),
        record("Alice", &[], &[]),
        record("alice", &[], &[]),
        record("Carl", &[], &[]),
    ];
    let out = filter_and_sort(&records, "", &SortSpec::new("PLAYER", SortDirection::Asc));
    assert_eq!(names(&out), vec!["Alice", "alice", "bob", "Carl"]);
}

#[test]
fn test_missing_category_sorts_as_zero() {
    let records = vec![
        record("neg", &[("fire", -1.0)], &[]),
        record("none", &[("water", 3.0)], &[]),
        record("one", &[("fire", 1.0)], &[]),
    ];
    let out = filter_and_sort(&records, "", &SortSpec::new("fire", SortDirection::Asc));
    assert_eq!(names(&out), vec!["neg", "none", "one"]);
}

#[test]
fn test_input_is_not_mutated() {
    let records = scenario();
    let before = records.clone();
    let _ = filter_and_sort(&records, "b", &SortSpec::new("PLAYER", SortDirection::Asc));
    assert_eq!(records, before);
}

#[rstest]
#[case("TOTAL_SCORE", "TOTAL_SCORE", SortDirection::Desc)]
#[case("fire:asc", "fire", SortDirection::Asc)]
#[case("PLAYER:DESC", "PLAYER", SortDirection::Desc)]
fn test_sort_spec_parsing(#[case] raw: &str, #[case] column: &str, #[case] dir: SortDirection) {
    let spec: SortSpec = raw.parse().unwrap();
    assert_eq!(spec, SortSpec::new(column, dir));
}

#[test]
fn test_sort_spec_rejects_garbage() {
    assert!(":asc".parse::<SortSpec>().is_err());
    assert!("fire:sideways".parse::<SortSpec>().is_err());
}

#[test]
fn test_header_click_toggles_then_resets() {
    let spec = SortSpec::default();
    let flipped = spec.clicked("TOTAL_SCORE");
    assert_eq!(flipped.direction, SortDirection::Asc);
    let other = flipped.clicked("fire");
    assert_eq!(other, SortSpec::new("fire", SortDirection::Desc));
}

#[test]
fn test_view_memo_reuses_until_inputs_change() {
    let records = scenario();
    let sort = SortSpec::default();
    let mut memo = ViewMemo::default();

    let first = memo.view(1, &records, "", &sort);
    let second = memo.view(1, &records, "", &sort);
    assert_eq!(first, second);
    assert_eq!(memo.hits(), 1);

    memo.view(1, &records, "a", &sort);
    memo.view(2, &records, "a", &sort);
    assert_eq!(memo.hits(), 1);

    memo.view(2, &records, "a", &sort);
    assert_eq!(memo.hits(), 2);
    memo.clear();
    memo.view(2, &records, "a", &sort);
    assert_eq!(memo.hits(), 2);
}
