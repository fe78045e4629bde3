use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(preferences: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("idexml")?;
    cmd.arg("--preferences").arg(preferences);
    Ok(cmd)
}

#[test]
fn resolve_falls_back_to_unversioned_dtd() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");
    let dtds = temp.path().join("DTDs");
    fs::create_dir_all(&dtds)?;
    fs::write(dtds.join("Templates.dtd"), "<!ELEMENT Templates ANY>")?;

    cli(&prefs)?
        .args(["resolve", "Templates-4.0.dtd", "--dtd-dir"])
        .arg(&dtds)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            dtds.join("Templates.dtd").display().to_string(),
        ));
    Ok(())
}

#[test]
fn resolve_uses_dtd_dir_from_preferences() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");
    let dtds = temp.path().join("shared").join("DTDs");
    fs::create_dir_all(&dtds)?;
    fs::write(dtds.join("Shortcuts-3.6.dtd"), "<!ELEMENT Shortcuts ANY>")?;

    cli(&prefs)?
        .args(["preferences", "set-dtd-dir"])
        .arg(&dtds)
        .assert()
        .success();

    cli(&prefs)?
        .args(["resolve", "Shortcuts-3.6.dtd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shortcuts-3.6.dtd"));
    Ok(())
}

#[test]
fn resolve_leaves_network_identifiers_alone() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");

    cli(&prefs)?
        .args([
            "resolve",
            "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
            "--public-id",
            "-//W3C//DTD XHTML 1.0 Strict//EN",
        ])
        .assert()
        .success()
        .stdout("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\n");
    Ok(())
}

#[test]
fn unresolved_identifier_is_an_error() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");
    let dtds = temp.path().join("empty");
    fs::create_dir_all(&dtds)?;

    cli(&prefs)?
        .args(["resolve", "Missing-1.0.dtd", "--dtd-dir"])
        .arg(&dtds)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved"));
    Ok(())
}

#[test]
fn doctype_reports_exported_document() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");
    let dtds = temp.path().join("DTDs");
    fs::create_dir_all(&dtds)?;
    fs::write(dtds.join("HighlightingStyles.dtd"), "<!ELEMENT HighlightingStyles ANY>")?;

    let input = temp.path().join("lexers.json");
    fs::write(
        &input,
        r##"[{
            "language": "Python",
            "styles": [{ "style": 0, "color": "#808080", "description": "Default" }]
        }]"##,
    )?;
    let output = temp.path().join("styles.e4h");
    cli(&prefs)?
        .args(["export", "highlighting", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    cli(&prefs)?
        .arg("doctype")
        .arg(&output)
        .arg("--dtd-dir")
        .arg(&dtds)
        .assert()
        .success()
        .stdout(predicate::str::contains("root: HighlightingStyles"))
        .stdout(predicate::str::contains(
            "system: HighlightingStyles-4.3.dtd",
        ))
        .stdout(predicate::str::contains("HighlightingStyles.dtd"));
    Ok(())
}

#[test]
fn doctype_without_declaration_is_reported() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let prefs = temp.path().join("preferences.json");
    let plain = temp.path().join("plain.xml");
    fs::write(&plain, "<?xml version=\"1.0\"?>\n<Plain/>")?;

    cli(&prefs)?
        .arg("doctype")
        .arg(&plain)
        .assert()
        .success()
        .stdout(predicate::str::contains("no DOCTYPE"));
    Ok(())
}
