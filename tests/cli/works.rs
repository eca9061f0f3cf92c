use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_works_reads_default_output_file() -> Result<()> {
    let test = CliTest::with_file(
        "translated.csv",
        "chen_(touhou),橙,4,100\nyuuki_(sao),ユウキ\nhakurei_reimu,博麗霊夢\nmarisa_(touhou),魔理沙\n",
    )?;

    assert_cmd_snapshot!(test.command().arg("works"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 2 work title(s) to works.txt

    ----- stderr -----
    ");

    assert_eq!(test.read_file("works.txt")?, "sao\ntouhou");

    Ok(())
}

#[test]
fn test_works_with_explicit_paths_and_delimiter() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("config.yaml", "files:\n  delimiter: \"\\t\"\n")?;
    test.write_file("data/out.tsv", "a_(x,y)\t名前\nb_(z)\t名前\n")?;

    let output = test
        .command()
        .args(["works", "--input", "data/out.tsv", "--output", "data/works.txt"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("data/works.txt")?, "x,y\nz");

    Ok(())
}

#[test]
fn test_works_missing_input_is_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("works").output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open input file"), "stderr: {stderr}");

    Ok(())
}
