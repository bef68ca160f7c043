//! # Plusarg Tests

use pretty_assertions::assert_eq;
use rstest::rstest;

use vltdrive_core::common::ScenarioError;
use vltdrive_core::plusargs::PlusArgs;

#[test]
fn test_valued_and_flag_forms() {
    let args = PlusArgs::parse(["+UVM_TESTNAME=hang", "+verbose", "-q", "file.hex"]);

    assert_eq!(args.value("UVM_TESTNAME"), Some("hang"));
    assert!(args.has("verbose"));
    assert_eq!(args.value("verbose"), None);
    assert!(!args.has("q"));
    assert_eq!(args.raw(), ["+UVM_TESTNAME=hang", "+verbose", "-q", "file.hex"]);
}

#[test]
fn test_first_occurrence_wins() {
    let args = PlusArgs::parse(["+SEED=1", "+SEED=2"]);
    assert_eq!(args.value("SEED"), Some("1"));
}

#[test]
fn test_empty_value_is_present_but_empty() {
    let args = PlusArgs::parse(["+NAME="]);
    assert!(args.has("NAME"));
    assert_eq!(args.value("NAME"), Some(""));
}

#[test]
fn test_names_are_case_sensitive() {
    let args = PlusArgs::parse(["+uvm_testname=hang"]);
    assert_eq!(args.value("UVM_TESTNAME"), None);
}

#[rstest]
#[case("+FINISH_AT=42", Some(42))]
#[case("+OTHER=1", None)]
fn test_parse_value(#[case] arg: &str, #[case] expected: Option<u64>) {
    let args = PlusArgs::parse([arg]);
    assert_eq!(args.parse_value::<u64>("FINISH_AT").unwrap(), expected);
}

#[test]
fn test_parse_value_reports_bad_number() {
    let args = PlusArgs::parse(["+FINISH_AT=soon"]);
    let err = args.parse_value::<u64>("FINISH_AT").unwrap_err();

    match err {
        ScenarioError::InvalidPlusarg { name, value, .. } => {
            assert_eq!(name, "FINISH_AT");
            assert_eq!(value, "soon");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
