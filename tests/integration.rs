use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/inventory.sqlite"

[photos]
max_bytes = 1024
"#,
        root.display()
    );

    let config_path = config_dir.join("inv.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_inv(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_inv"))
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run inv binary: {}", e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Add an item and return its id.
fn add_item(config_path: &Path, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let (stdout, stderr, success) = run_inv(config_path, &full);
    assert!(success, "add failed: stdout={}, stderr={}", stdout, stderr);
    stdout
        .trim()
        .strip_prefix("Added item ")
        .unwrap_or_else(|| panic!("unexpected add output: {}", stdout))
        .to_string()
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_inv(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(stdout.contains("schema v2"));
    assert!(tmp.path().join("data/inventory.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_inv(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_inv(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_add_get_and_search() {
    let (_tmp, config_path) = setup_test_env();

    let id = add_item(
        &config_path,
        &[
            "Bottle opener",
            "--area",
            "Kitchen",
            "--place",
            "Top drawer",
            "--category",
            "Tools",
        ],
    );
    add_item(&config_path, &["Bike pump", "--area", "Garage", "--place", "Hook"]);

    let (stdout, _, success) = run_inv(&config_path, &["get", &id]);
    assert!(success);
    assert!(stdout.contains("Bottle opener"));
    assert!(stdout.contains("Top drawer"));
    assert!(stdout.contains("category:    Tools"));

    let (stdout, _, success) = run_inv(&config_path, &["search", "DRAWER"]);
    assert!(success);
    assert!(stdout.contains("Bottle opener"));
    assert!(!stdout.contains("Bike pump"));
    assert!(stdout.contains("1 item"));

    let (stdout, _, success) = run_inv(&config_path, &["categories"]);
    assert!(success);
    assert_eq!(stdout.trim(), "Tools");
}

#[test]
fn test_add_rejects_blank_name() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_inv(
        &config_path,
        &["add", "   ", "--area", "Kitchen", "--place", "Shelf"],
    );
    assert!(!success);
    assert!(stderr.contains("name"));
}

#[test]
fn test_update_and_missing_item() {
    let (_tmp, config_path) = setup_test_env();

    let id = add_item(&config_path, &["Lamp", "--area", "Bedroom", "--place", "Desk"]);

    let (_, stderr, success) = run_inv(&config_path, &["update", &id, "--note", "LED bulb"]);
    assert!(success, "update failed: {}", stderr);

    let (stdout, _, _) = run_inv(&config_path, &["get", &id]);
    assert!(stdout.contains("note:        LED bulb"));
    assert!(stdout.contains("name:        Lamp"));

    let (_, stderr, success) = run_inv(&config_path, &["update", "nope", "--name", "X"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_delete_item() {
    let (_tmp, config_path) = setup_test_env();

    let id = add_item(&config_path, &["Scarf", "--area", "Hall", "--place", "Closet"]);
    let (_, _, success) = run_inv(&config_path, &["delete", &id]);
    assert!(success);

    let (_, _, success) = run_inv(&config_path, &["get", &id]);
    assert!(!success);
}

#[test]
fn test_export_import_roundtrip() {
    let (tmp, config_path) = setup_test_env();

    add_item(&config_path, &["Tent", "--area", "Garage", "--place", "Loft"]);
    add_item(&config_path, &["Stove", "--area", "Garage", "--place", "Shelf"]);

    let backups = tmp.path().join("backups");
    fs::create_dir_all(&backups).unwrap();
    let (_, stderr, success) = run_inv(
        &config_path,
        &["export", "items", "--output", backups.to_str().unwrap()],
    );
    assert!(success, "export failed: {}", stderr);
    assert!(stderr.contains("Exported 2 items"));

    let exported: Vec<PathBuf> = fs::read_dir(&backups)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(exported.len(), 1);
    let file_name = exported[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(file_name.starts_with("home-inventory-"));
    assert!(file_name.ends_with(".json"));

    let (_, _, success) = run_inv(&config_path, &["clear", "--yes"]);
    assert!(success);
    let (stdout, _, _) = run_inv(&config_path, &["list"]);
    assert!(stdout.contains("No items found."));

    let (stdout, stderr, success) = run_inv(
        &config_path,
        &["import", "items", exported[0].to_str().unwrap()],
    );
    assert!(success, "import failed: {}", stderr);
    assert!(stdout.contains("Imported 2 items."));

    let (stdout, _, _) = run_inv(&config_path, &["list"]);
    assert!(stdout.contains("Tent"));
    assert!(stdout.contains("Stove"));
}

#[test]
fn test_export_to_stdout_is_json() {
    let (_tmp, config_path) = setup_test_env();

    add_item(&config_path, &["Kettle", "--area", "Kitchen", "--place", "Counter"]);
    let (stdout, _, success) = run_inv(&config_path, &["export", "items"]);
    assert!(success);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["name"], "Kettle");
}

#[test]
fn test_import_rejects_object_payload() {
    let (tmp, config_path) = setup_test_env();

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, r#"{"items": []}"#).unwrap();

    let (_, stderr, success) = run_inv(&config_path, &["import", "items", bad.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("invalid import data"));
}

#[test]
fn test_import_requires_json_extension() {
    let (tmp, config_path) = setup_test_env();

    let file = tmp.path().join("items.txt");
    fs::write(&file, "[]").unwrap();

    let (_, stderr, success) = run_inv(&config_path, &["import", "items", file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains(".json"));
}

#[test]
fn test_clear_requires_confirmation() {
    let (_tmp, config_path) = setup_test_env();

    add_item(&config_path, &["Vase", "--area", "Hall", "--place", "Table"]);
    let (_, _, success) = run_inv(&config_path, &["clear"]);
    assert!(!success);

    let (stdout, _, _) = run_inv(&config_path, &["list"]);
    assert!(stdout.contains("Vase"));
}

#[test]
fn test_locations_commands() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_inv(&config_path, &["location", "add", "Kitchen", "Pantry"]);
    assert!(success);
    let id = stdout.trim().strip_prefix("Added location ").unwrap().to_string();

    let (stdout, _, _) = run_inv(&config_path, &["location", "list"]);
    assert!(stdout.contains("Kitchen / Pantry"));

    let out = tmp.path().join("locations-backup.json");
    let (_, _, success) = run_inv(
        &config_path,
        &["export", "locations", "--output", out.to_str().unwrap()],
    );
    assert!(success);
    assert!(fs::read_to_string(&out).unwrap().contains("Pantry"));

    let (_, _, success) = run_inv(&config_path, &["location", "delete", &id]);
    assert!(success);
    let (stdout, _, _) = run_inv(&config_path, &["location", "list"]);
    assert!(stdout.contains("No locations."));

    let (stdout, _, success) = run_inv(
        &config_path,
        &["import", "locations", out.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("Imported 1 locations."));
}

#[test]
fn test_photo_attach_and_extract() {
    let (tmp, config_path) = setup_test_env();

    let image = tmp.path().join("camera.png");
    let bytes = vec![0x89u8, b'P', b'N', b'G', 13, 10, 26, 10];
    fs::write(&image, &bytes).unwrap();

    let id = add_item(
        &config_path,
        &[
            "Camera",
            "--area",
            "Study",
            "--place",
            "Shelf",
            "--photo",
            image.to_str().unwrap(),
        ],
    );

    let out_dir = tmp.path().join("photos");
    fs::create_dir_all(&out_dir).unwrap();
    let (_, stderr, success) = run_inv(
        &config_path,
        &["photo", &id, "--output", out_dir.to_str().unwrap()],
    );
    assert!(success, "photo failed: {}", stderr);
    assert_eq!(fs::read(out_dir.join(format!("{}.png", id))).unwrap(), bytes);

    // Over the 1024-byte limit from the test config.
    let big = tmp.path().join("big.jpg");
    fs::write(&big, vec![0u8; 4096]).unwrap();
    let (_, stderr, success) = run_inv(
        &config_path,
        &["add", "Poster", "--area", "Hall", "--place", "Wall", "--photo", big.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("limit"));
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();

    add_item(
        &config_path,
        &["Drill", "--area", "Garage", "--place", "Bench", "--category", "Tools"],
    );
    let (stdout, _, success) = run_inv(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Items:         1"));
    assert!(stdout.contains("No location:   0"));
    assert!(stdout.contains("Tools"));
}
