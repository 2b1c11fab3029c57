//! CLI integration tests for docgraph
//!
//! Tests the docgraph CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = "Marie Curie worked in Paris. She studied radium at the Sorbonne. \
                      In conclusion, her research on radium changed physics.";

/// Helper to create a command with an isolated config directory and no credential
#[allow(deprecated)]
fn docgraph_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docgraph").unwrap();
    cmd.current_dir(config_dir.path());
    cmd.env("DOCGRAPH_CONFIG_DIR", config_dir.path());
    cmd.env_remove("DOCGRAPH_KG_API_KEY");
    cmd.env_remove("GOOGLE_KG_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_analyze_stdin_outputs_json() {
    let temp_dir = TempDir::new().unwrap();

    let output = docgraph_cmd(&temp_dir)
        .args(["analyze", "--offline"])
        .write_stdin(SAMPLE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let nodes = json["graph"]["nodes"].as_array().unwrap();
    assert!(!nodes.is_empty());
    assert!(nodes.len() <= 12);
    assert_eq!(json["metadata"]["source"], "fallback");
    assert_eq!(json["metadata"]["entityCount"].as_u64().unwrap() as usize, nodes.len());
    assert!(
        json["insights"]["questions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|q| q.as_str().unwrap().contains("implications"))
    );
}

#[test]
fn test_analyze_file_with_text_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.txt");
    std::fs::write(&input, SAMPLE).unwrap();

    docgraph_cmd(&temp_dir)
        .args(["analyze", "--offline", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: fallback"))
        .stdout(predicate::str::contains("Nodes ("))
        .stdout(predicate::str::contains("Paris"))
        .stdout(predicate::str::contains("Gaps:"));
}

#[test]
fn test_analyze_without_key_falls_back() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["analyze"])
        .write_stdin("Apple Inc announced the iPhone in California.")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"fallback\""))
        .stdout(predicate::str::contains("California"));
}

#[test]
fn test_analyze_empty_input() {
    let temp_dir = TempDir::new().unwrap();

    let output = docgraph_cmd(&temp_dir)
        .args(["analyze", "--offline", "-"])
        .write_stdin("")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["graph"]["nodes"].as_array().unwrap().is_empty());
    assert!(json["graph"]["edges"].as_array().unwrap().is_empty());
    assert!(!json["insights"]["questions"].as_array().unwrap().is_empty());
}

#[test]
fn test_analyze_rejects_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["analyze", "--offline"])
        .write_stdin(vec![0xff_u8, 0xfe, 0x00])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [E800]"))
        .stderr(predicate::str::contains("UTF-8"))
        .stderr(predicate::str::contains("Suggestion:"));
}

#[test]
fn test_invalid_utf8_error_is_the_same_for_every_command() {
    let temp_dir = TempDir::new().unwrap();

    for args in [
        vec!["analyze", "--offline"],
        vec!["questions", "--offline"],
        vec!["entities"],
    ] {
        docgraph_cmd(&temp_dir)
            .args(&args)
            .write_stdin(vec![0x63_u8, 0x61, 0x66, 0xc3])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error [E800]: Invalid input: text is not valid UTF-8"));
    }
}

#[test]
fn test_entities_keep_non_ascii_names() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["entities"])
        .write_stdin("Zürich hosts FIFA. Café culture thrives in Málaga.")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zürich"))
        .stdout(predicate::str::contains("Málaga"))
        .stdout(predicate::str::contains("Zrich").not());
}

#[test]
fn test_analyze_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["analyze", "--offline", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_seeded_analysis_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();

    let run = || {
        let output = docgraph_cmd(&temp_dir)
            .args(["analyze", "--offline", "--seed", "42"])
            .write_stdin(SAMPLE)
            .output()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["graph"].clone()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_questions_command() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["questions", "--offline"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1. "))
        .stdout(predicate::str::contains(
            "What are the broader implications of these findings?",
        ));
}

#[test]
fn test_entities_command_sorted() {
    let temp_dir = TempDir::new().unwrap();

    let output = docgraph_cmd(&temp_dir)
        .args(["entities", "--format", "json"])
        .write_stdin("Paris hosted NASA engineers. Marie Curie visited Paris.")
        .output()
        .unwrap();
    assert!(output.status.success());

    let entities: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(entities.contains(&"Paris".to_string()));
    assert!(entities.contains(&"NASA".to_string()));
    assert!(entities.contains(&"Marie Curie".to_string()));

    let mut sorted = entities.clone();
    sorted.sort();
    assert_eq!(entities, sorted);
}

#[test]
fn test_config_path_uses_config_dir() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_get_and_reset() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["config", "set", "graph.cluster_edge_threshold", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set graph.cluster_edge_threshold = 0.5"));
    assert!(temp_dir.path().join("config.toml").exists());

    docgraph_cmd(&temp_dir)
        .args(["config", "get", "graph.cluster_edge_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5"));

    docgraph_cmd(&temp_dir)
        .args(["config", "reset"])
        .assert()
        .success();

    docgraph_cmd(&temp_dir)
        .args(["config", "get", "graph.cluster_edge_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.7"));
}

#[test]
fn test_config_list_shows_keys() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enrichment.enabled = true"))
        .stdout(predicate::str::contains("enrichment.api_key = (not set"))
        .stdout(predicate::str::contains("graph.seed = (random)"));
}

#[test]
fn test_config_rejects_api_key_and_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();

    docgraph_cmd(&temp_dir)
        .args(["config", "set", "enrichment.api_key", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment variable"));

    docgraph_cmd(&temp_dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
