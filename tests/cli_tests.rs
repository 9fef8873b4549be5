//! CLI integration tests using the REAL stackforge binary

mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;
use stackforge::recipe::{Query, Recipe};

#[allow(deprecated)]
fn stackforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stackforge").unwrap();
    cmd.env_remove("STACKFORGE_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_output() {
    stackforge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recipe"))
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_output() {
    stackforge_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge"))
        .stdout(predicate::str::contains("Build info"))
        .stdout(predicate::str::contains("Overlays:"));
}

#[test]
fn test_recipe_prints_yaml() {
    stackforge_cmd()
        .args(["recipe", "--service", "eks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("measurements:"))
        .stdout(predicate::str::contains("matchedRules:"))
        .stdout(predicate::str::contains("service=eks"));
}

#[test]
fn test_recipe_json_to_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.join("recipe.json");

    stackforge_cmd()
        .args(["recipe", "--gpu", "gb200", "--format", "json", "-o"])
        .arg(&path)
        .assert()
        .success();

    let recipe = Recipe::from_file(&path).unwrap();
    assert_eq!(recipe.request.gpu, "gb200");
    assert_eq!(recipe.matched_rules.len(), 1);
}

#[test]
fn test_recipe_rejects_malformed_version() {
    stackforge_cmd()
        .args(["recipe", "--k8s", "one.two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid request"));
}

#[test]
fn test_bundle_writes_all_builtins() {
    let workspace = TestWorkspace::new();
    let recipe = workspace.write_recipe("recipe.yaml", &Query::new().with_service("eks"));

    stackforge_cmd()
        .args(["bundle", "--recipe"])
        .arg(&recipe)
        .arg("--output-dir")
        .arg(workspace.join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("gpu-operator"))
        .stdout(predicate::str::contains("network-operator"));

    assert!(workspace.file_exists("out/gpu-operator/values.yaml"));
    assert!(workspace.file_exists("out/gpu-operator/checksums.txt"));
    assert!(workspace.file_exists("out/network-operator/README.md"));
}

#[test]
fn test_bundle_with_config_from_env() {
    let workspace = TestWorkspace::new();
    let recipe = workspace.write_recipe("recipe.yaml", &Query::new().with_service("gke"));
    let config = workspace.write_file(
        "bundlers.yaml",
        "namespace: gpu-system\nincludeReadme: false\nincludeChecksums: false\n",
    );

    stackforge_cmd()
        .env("STACKFORGE_CONFIG", &config)
        .args(["bundle", "-b", "gpu-operator", "--json", "-r"])
        .arg(&recipe)
        .arg("-o")
        .arg(workspace.join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalFiles\": 1"));

    assert!(workspace.read_file("out/gpu-operator/values.yaml").contains("gpu-system"));
    assert!(!workspace.file_exists("out/gpu-operator/README.md"));
    assert!(!workspace.file_exists("out/network-operator"));
}

#[test]
fn test_bundle_fails_when_a_bundler_fails() {
    let workspace = TestWorkspace::new();
    let mut recipe = common::resolve(&Query::new().with_service("eks"));
    recipe
        .measurements
        .retain(|m| m.measurement_type != stackforge::measurement::MeasurementType::Gpu);
    let path = workspace.write_file("recipe.yaml", &serde_yaml::to_string(&recipe).unwrap());

    stackforge_cmd()
        .args(["bundle", "--sequential", "-r"])
        .arg(&path)
        .arg("-o")
        .arg(workspace.join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("gpu-operator"))
        .stderr(predicate::str::contains("validation"));

    assert!(workspace.file_exists("out/network-operator/values.yaml"));
}

#[test]
fn test_bundle_missing_recipe_file() {
    stackforge_cmd()
        .args(["bundle", "-r", "/nonexistent/recipe.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_list_shows_builtins() {
    stackforge_cmd()
        .args(["list", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpu-operator"))
        .stdout(predicate::str::contains("network-operator"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_completions_bash() {
    stackforge_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge"));
}

#[test]
fn test_completions_unknown_shell() {
    stackforge_cmd()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}
