use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn walk(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_walk"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn sorted_lines(output: &Output) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

fn create_test_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join("README.md"), "readme").unwrap();
    fs::write(root.join("src/main.rs"), vec![b'x'; 2048]).unwrap();
    fs::write(root.join("src/nested/lib.rs"), "x").unwrap();
    fs::write(root.join(".git/HEAD"), "ref").unwrap();
    temp
}

#[test]
fn test_default_root_is_current_directory() {
    let temp = create_test_tree();
    let output = walk(&[], temp.path());

    assert!(output.status.success());
    assert_eq!(
        sorted_lines(&output),
        vec![
            "./README.md",
            "./src",
            "./src/main.rs",
            "./src/nested",
            "./src/nested/lib.rs",
        ]
    );
}

#[test]
fn test_filters_combine() {
    let temp = create_test_tree();
    let output = walk(&["-t", "f", "-m", "\\.RS$", "-S", "1K", "."], temp.path());

    assert!(output.status.success());
    assert_eq!(sorted_lines(&output), vec!["./src/main.rs"]);
}

#[test]
fn test_hidden_and_depth() {
    let temp = create_test_tree();
    let output = walk(&["-A", "-d", "0", "."], temp.path());

    assert_eq!(sorted_lines(&output), vec!["./.git", "./README.md", "./src"]);
}

#[test]
fn test_nul_terminated_output() {
    let temp = create_test_tree();
    let output = walk(&["-0", "-t", "f", "src/nested"], temp.path());

    assert_eq!(output.stdout, b"src/nested/lib.rs\0");
}

#[test]
fn test_bad_pattern_is_usage_error() {
    let temp = create_test_tree();
    let output = walk(&["-m", "(", "."], temp.path());

    assert_eq!(output.status.code(), Some(64));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad RE"));
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_bad_date_and_size_are_usage_errors() {
    let temp = create_test_tree();
    assert_eq!(walk(&["-a", "tomorrow"], temp.path()).status.code(), Some(64));
    assert_eq!(walk(&["-s", "12 apples"], temp.path()).status.code(), Some(64));
    assert_eq!(walk(&["--bogus"], temp.path()).status.code(), Some(64));
}

#[test]
fn test_help_exits_zero() {
    let temp = create_test_tree();
    let output = walk(&["-h"], temp.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("walk directory trees"));
}

#[test]
fn test_missing_root_reports_and_continues() {
    let temp = create_test_tree();
    let output = walk(&["missing", "src/nested"], temp.path());

    assert!(output.status.success());
    assert_eq!(sorted_lines(&output), vec!["src/nested/lib.rs"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[test]
fn test_empty_root_is_skipped() {
    let temp = create_test_tree();
    let output = walk(&["", "src/nested"], temp.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(sorted_lines(&output), vec!["src/nested/lib.rs"]);
}

#[test]
fn test_hyphen_values_are_option_arguments() {
    let temp = create_test_tree();
    fs::write(temp.path().join("src/nested/-old"), "x").unwrap();
    let output = walk(&["-m", "-old$", "src"], temp.path());

    assert!(output.status.success());
    assert_eq!(sorted_lines(&output), vec!["src/nested/-old"]);
}

#[test]
fn test_all_roots_failing_device_lookup() {
    let temp = create_test_tree();
    let output = walk(&["-x", "missing", "gone"], temp.path());
    assert_eq!(output.status.code(), Some(1));

    let output = walk(&["-x", "missing", "src/nested"], temp.path());
    assert!(output.status.success());
    assert_eq!(sorted_lines(&output), vec!["src/nested/lib.rs"]);
}

#[test]
fn test_upward_walk_from_current_directory() {
    let temp = create_test_tree();
    let nested = temp.path().join("src/nested");
    let output = walk(&["-u", "-d", "1", "-t", "f"], &nested);

    assert!(output.status.success());
    let lines = sorted_lines(&output);
    let expected_lib = nested.join("lib.rs");
    assert!(lines.iter().any(|l| Path::new(l).ends_with("src/nested/lib.rs")));
    assert!(lines.iter().any(|l| Path::new(l).ends_with("src/main.rs")));
    assert_eq!(lines.len(), 2, "{lines:?} should only hold {}", expected_lib.display());
}
