use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

const TRANSLATED: &str = "tag001,名前01,genreA,usageA\nchen_(touhou),橙,4\n";
const FAILED: &str = "tag002,genreB\n";

fn resumable_project() -> Result<CliTest> {
    let test = CliTest::with_file(
        "tags.csv",
        "tag001,genreA,usageA\ntag002,genreB\nchen_(touhou),4\n",
    )?;
    test.write_file("translated.csv", TRANSLATED)?;
    test.write_file("failed.csv", FAILED)?;
    Ok(test)
}

#[test]
fn test_run_resumes_with_everything_cached() -> Result<()> {
    let test = resumable_project()?;

    let output = test
        .run_command()
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("✓ Translated 0 tag(s) (0 direct, 0 by AI)\n"));
    assert!(stdout.contains("3 read, 3 cached, 0 skipped, 0 AI batch(es)"));
    assert!(!stdout.contains("✘"));

    // Nothing is re-queried or duplicated
    assert_eq!(test.read_file("translated.csv")?, TRANSLATED);
    assert_eq!(test.read_file("failed.csv")?, FAILED);
    assert!(test.root().join("translation_failures.log").exists());

    Ok(())
}

#[test]
fn test_run_paths_from_flags() -> Result<()> {
    let test = CliTest::with_file("in/tags.csv", "tag001,genreA\n")?;
    test.write_file("out/ok.csv", "tag001,名前01,genreA\n")?;

    let output = test
        .run_command()
        .args([
            "--input",
            "in/tags.csv",
            "--output",
            "out/ok.csv",
            "--failed",
            "out/ng.csv",
        ])
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 read, 1 cached"));
    assert!(stdout.contains("out/ok.csv"));
    // Failure sink is opened even when nothing fails
    assert_eq!(test.read_file("out/ng.csv")?, "");

    Ok(())
}

#[test]
fn test_run_missing_api_key_is_fatal() -> Result<()> {
    let test = resumable_project()?;
    test.write_file("tags.csv", "new_tag,genre\n")?;

    let output = test.run_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: missing OpenAI API key"),
        "stderr: {stderr}"
    );
    // No record was processed
    assert_eq!(test.read_file("translated.csv")?, TRANSLATED);
    assert_eq!(test.read_file("failed.csv")?, FAILED);

    Ok(())
}

#[test]
fn test_run_provider_flag_selects_credentials() -> Result<()> {
    let test = resumable_project()?;

    let output = test
        .run_command()
        .args(["--provider", "anthropic"])
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing Anthropic API key"), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_run_rejects_invalid_config() -> Result<()> {
    let test = resumable_project()?;
    test.write_file("config.yaml", "processing:\n  batch_size: 0\n")?;

    let output = test
        .run_command()
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("processing.batch_size"), "stderr: {stderr}");

    Ok(())
}

#[test]
fn test_run_batch_size_flag_overrides_config() -> Result<()> {
    let test = resumable_project()?;
    test.write_file("config.yaml", "processing:\n  batch_size: 0\n")?;

    let output = test
        .run_command()
        .args(["--batch-size", "5"])
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}

#[test]
fn test_run_missing_input_is_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .run_command()
        .env("OPENAI_API_KEY", "dummy")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("translated.csv").exists());

    Ok(())
}
