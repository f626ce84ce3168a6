use assert_cmd::Command;

fn tt() -> Command {
    let mut cmd = Command::cargo_bin("tt").unwrap();
    // keep logs and stored progress out of the real home directory
    let home = tempfile::tempdir().unwrap().into_path();
    cmd.env("HOME", home);
    cmd
}

#[test]
fn lists_bundled_themes() {
    let output = tt().args(["--list", "themes"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let themes: Vec<&str> = stdout.lines().collect();
    assert_eq!(themes, vec!["default", "gruvbox", "nord", "solarized"]);
}

#[test]
fn lists_bundled_word_lists() {
    let output = tt().args(["--list", "words"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.lines().any(|l| l == "1000en"));
}

#[test]
fn prints_version() {
    let output = tt().arg("--version").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("tt "), "{stdout}");
}

#[test]
fn unknown_word_list_is_fatal() {
    let output = tt().args(["--words", "no-such-list"]).assert().code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(
        stderr.starts_with("ERROR: no-such-list does not appear to be a valid words resource"),
        "{stderr}"
    );
}

#[test]
fn unknown_theme_is_fatal() {
    let output = tt()
        .args(["--words", "1000en", "--theme", "no-such-theme"])
        .assert()
        .code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("no-such-theme does not appear to be a valid theme"), "{stderr}");
}

#[test]
fn incomplete_theme_names_the_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let theme = dir.path().join("half");
    std::fs::write(&theme, "bgcol: #000000\nfgcol: #ffffff\n").unwrap();

    let output = tt()
        .args(["--words", "1000en", "--theme"])
        .arg(&theme)
        .assert()
        .code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert_eq!(stderr.trim_end(), "ERROR: hicol is not defined and/or a valid hex colour.");
}

#[test]
fn bad_list_type_is_a_usage_error() {
    tt().args(["--list", "fonts"]).assert().failure();
}
