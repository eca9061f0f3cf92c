use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created config.yaml

    ----- stderr -----
    ");

    assert!(test.root().join("config.yaml").exists());

    let content = test.read_file("config.yaml")?;
    let parsed: serde_yaml::Value = serde_yaml::from_str(&content)?;
    assert_eq!(parsed["files"]["input_path"].as_str(), Some("tags.csv"));
    assert_eq!(parsed["processing"]["batch_size"].as_u64(), Some(10));
    assert_eq!(parsed["default_provider"].as_str(), Some("openai"));
    assert!(parsed["resolution"]["sources"].is_sequence());

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file("config.yaml", "processing:\n  batch_size: 3\n")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: config.yaml already exists
    ");

    assert_eq!(
        test.read_file("config.yaml")?,
        "processing:\n  batch_size: 3\n"
    );

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("translated.csv", "chen_(touhou),橙\n")?;

    let output = test.command().arg("works").output()?;
    assert!(
        output.status.success(),
        "works should run with the generated config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
