/// Integration tests for the keysort shell binary.
/// Tests cover: demo data, directions, missing policies, transforms, LOAD, config env vars, errors
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Helper to run shell commands and capture stdout
fn run_cli_command(envs: &[(&str, &str)], command: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env_remove("KEYSORT_DIRECTION")
        .env_remove("KEYSORT_MISSING")
        .env_remove("KEYSORT_TRANSFORM")
        .env_remove("KEYSORT_PRETTY")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(command.as_bytes())
            .expect("Failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("Failed to write EXIT");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Names of the JSON records printed in `output`, in print order.
fn printed_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim_start_matches("> "))
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v.get("name").and_then(|n| n.as_str()).map(str::to_owned))
        .collect()
}

fn write_records(path: &Path, json: &str) {
    fs::write(path, json).unwrap();
}

#[test]
fn test_banner_and_exit() {
    let output = run_cli_command(&[], "");
    assert!(output.contains("keysort shell (direction=asc, missing=last, transform=identity)"));
    assert!(output.contains("bye"));
}

#[test]
fn test_demo_sort_by_age() {
    let output = run_cli_command(&[], "DEMO\nSORT age\n");
    assert!(output.contains("OK (4 records)"));
    assert_eq!(printed_names(&output), ["bob", "Alice", "dan", "Charlie"]);
}

#[test]
fn test_demo_sort_missing_first() {
    let output = run_cli_command(&[], "DEMO\nSORT age first\n");
    assert_eq!(printed_names(&output), ["Charlie", "bob", "Alice", "dan"]);
}

#[test]
fn test_descending_keeps_missing_last() {
    let output = run_cli_command(&[], "DEMO\nSORT age desc\n");
    assert_eq!(printed_names(&output), ["dan", "Alice", "bob", "Charlie"]);
}

#[test]
fn test_case_insensitive_names() {
    let output = run_cli_command(&[], "DEMO\nSORT name lowercase\n");
    assert_eq!(printed_names(&output), ["Alice", "bob", "Charlie", "dan"]);

    let output = run_cli_command(&[], "DEMO\nSORT name\n");
    assert_eq!(printed_names(&output), ["Alice", "Charlie", "bob", "dan"]);
}

#[test]
fn test_raise_reports_missing_key() {
    let output = run_cli_command(&[], "DEMO\nSORT age raise\nCOUNT\n");
    assert!(output.contains("ERR record 2: key \"age\" not found"));
    // session survives the error
    assert!(output.contains("\n4\n") || output.contains("> 4\n"));
}

#[test]
fn test_invalid_option() {
    let output = run_cli_command(&[], "DEMO\nSORT age middle\n");
    assert!(output.contains("ERR unrecognised SORT option \"middle\""));
    assert!(printed_names(&output).is_empty());
}

#[test]
fn test_load_nested_paths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.json");
    write_records(
        &path,
        r#"[
            {"name": "a", "address": {"city": "Oslo"}},
            {"name": "b", "address": {"city": "Bergen"}},
            {"name": "c", "address": "unknown"},
            {"name": "d"},
            {"name": "e", "address": {"city": "Alta"}}
        ]"#,
    );

    let commands = format!("LOAD {}\nSORT address.city\n", path.display());
    let output = run_cli_command(&[], &commands);
    assert!(output.contains("OK (5 records)"));
    assert_eq!(printed_names(&output), ["e", "b", "a", "c", "d"]);
}

#[test]
fn test_load_numeric_strings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");
    write_records(
        &path,
        r#"[{"name": "x", "score": "10"}, {"name": "y", "score": "9"}, {"name": "z", "score": "9.5"}]"#,
    );

    let commands = format!("LOAD {}\nSORT score number desc\n", path.display());
    let output = run_cli_command(&[], &commands);
    assert_eq!(printed_names(&output), ["x", "z", "y"]);
}

#[test]
fn test_load_bad_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    write_records(&path, "not json");

    let commands = format!("LOAD {}\nCOUNT\n", path.display());
    let output = run_cli_command(&[], &commands);
    assert!(output.contains("ERR failed to parse"));
}

#[test]
fn test_env_defaults() {
    let output = run_cli_command(
        &[("KEYSORT_DIRECTION", "desc"), ("KEYSORT_MISSING", "first")],
        "DEMO\nSORT age\n",
    );
    assert!(output.contains("direction=desc, missing=first"));
    assert_eq!(printed_names(&output), ["Charlie", "dan", "Alice", "bob"]);
}

#[test]
fn test_invalid_env_fails_fast() {
    use std::process::{Command, Stdio};

    let output = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env("KEYSORT_MISSING", "middle")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("KEYSORT_MISSING"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("keysort shell"));
}

#[test]
fn test_add_show_clear() {
    let commands = "ADD {\"name\": \"solo\", \"k\": 1}\nSHOW\nCLEAR\nSHOW\n";
    let output = run_cli_command(&[], commands);
    assert_eq!(printed_names(&output), ["solo"]);
    assert!(output.contains("(1 records)"));
    assert!(output.contains("(empty)"));
}
