//! Tests for broken/invalid scene files

use sandbox_core::diagnostics::format_parse_error;
use sandbox_core::tests::test_helpers::scene_path;
use sandbox_core::{analyze_scene, parse_scene, run_scene, SceneError};

fn read(filename: &str) -> String {
    std::fs::read_to_string(scene_path("broken", filename)).unwrap()
}

#[test]
fn test_unknown_body_produces_error() {
    let source = read("unknown_body.scene");

    // Should parse successfully
    let scene = parse_scene(&source).expect("Should parse");

    // But analyzer should catch the error
    let diagnostics = analyze_scene(&scene);
    assert!(diagnostics.has_errors(), "Should detect unknown body");

    // Runtime should refuse to run it
    match run_scene(&source) {
        Err(SceneError::Analysis(d)) => assert!(d.has_errors()),
        other => panic!("Expected analysis error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_syntax_error_produces_parse_error() {
    let source = read("syntax_error.scene");

    let err = parse_scene(&source).unwrap_err();
    let formatted = format_parse_error(&err, &source);
    assert!(formatted.contains("at line 1"), "{}", formatted);

    assert!(matches!(run_scene(&source), Err(SceneError::Parse(_))));
}

#[test]
fn test_missing_simulate_produces_error() {
    let source = read("missing_simulate.scene");
    let err = parse_scene(&source).unwrap_err();
    assert!(err.to_string().contains("simulate"));
}

#[test]
fn test_unknown_keyword_produces_error() {
    let source = read("unknown_keyword.scene");
    let err = parse_scene(&source).unwrap_err();
    assert!(err.to_string().contains("spring"));
    assert_eq!(err.span().unwrap().line(&source), 1);
}

#[test]
fn test_negative_dt_is_rejected_before_running() {
    let source = read("negative_dt.scene");
    assert!(matches!(run_scene(&source), Err(SceneError::Analysis(_))));
}
