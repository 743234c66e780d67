use assert_cmd::Command;
use std::path::PathBuf;

fn ratatosk(arguments: &[&str]) -> Command {
    let config_dir: PathBuf = [env!("CARGO_MANIFEST_DIR"), "config"].iter().collect();
    let mut cmd = Command::cargo_bin("ratatosk").unwrap();
    cmd.env_remove("RUN_MODE")
        .arg("-c")
        .arg(config_dir)
        .args(arguments);
    cmd
}

#[test]
fn should_print_merged_configuration() {
    let output = ratatosk(&["-m", "testing", "-s", "bulk.chunk_size=42", "config"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["mode"], "testing");
    assert_eq!(settings["bulk"]["chunk_size"], 42);
    assert_eq!(settings["elasticsearch"]["url"], "http://localhost:9201/");
    assert!(settings["elasticsearch"].get("password").is_none());
}

#[test]
fn should_fail_on_invalid_settings() {
    ratatosk(&["-s", "bulk.chunk_size=0", "config"])
        .assert()
        .failure();
}
