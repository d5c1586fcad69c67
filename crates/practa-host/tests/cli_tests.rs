use practa_test_utils::{metadata_without, package_dir, valid_metadata, VALID_ENTRY};
use std::process::{Command, Output};

fn practa(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_practa"))
        .args(args)
        .env_remove("PRACTA_CONFIG")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn validate_valid_package_exits_zero() {
    let dir = package_dir(VALID_ENTRY, Some(&valid_metadata()));
    let output = practa(&["validate", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("valid: 0 error(s), 0 warning(s)"));
}

#[test]
fn validate_invalid_package_exits_one() {
    let dir = package_dir(VALID_ENTRY, Some(&metadata_without("author")));
    let output = practa(&["validate", "--json", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["isValid"], false);
}

#[test]
fn catalog_lists_builtins_as_json() {
    let output = practa(&["catalog", "--json"]);
    assert!(output.status.success());

    let listing: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing.len(), 7);
    assert!(listing.iter().all(|entry| entry["runnable"] == true));
}

#[test]
fn simulate_prints_completed_state() {
    let output = practa(&["simulate", "--json", "breathing", "journal"]);
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["state"]["status"], "completed");
    assert_eq!(body["state"]["currentIndex"], 2);
    assert_eq!(
        body["state"]["practaOutputs"][1]["content"]["value"],
        "journal done"
    );
    assert!(body["journalHead"].is_string());
}

#[test]
fn simulate_unknown_type_fails() {
    let output = practa(&["simulate", "levitation"]);
    assert!(!output.status.success());
}

#[test]
fn config_file_applies_to_validator() {
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("practa.toml");
    std::fs::write(&config_path, "[validator]\nmin_id_len = 40\nmax_id_len = 50\n").unwrap();
    let dir = package_dir(VALID_ENTRY, Some(&valid_metadata()));

    let output = practa(&[
        "--config",
        config_path.to_str().unwrap(),
        "validate",
        dir.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
}
