use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ancora"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute ancora");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("anchored to their assigned monitor"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ancora"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute ancora");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ancora"));
}

#[test]
fn debug_list_subcommand_runs() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ancora"));
    cmd.args(["debug", "list"]);

    // Act
    let output = cmd.output().expect("failed to execute ancora");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("monitor(s)"));
}

#[test]
fn status_reports_when_not_running() {
    // Arrange — no daemon is started by this test.
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ancora"));
    cmd.arg("status");

    // Act
    let output = cmd.output().expect("failed to execute ancora");

    // Assert — either "not running" or, if another daemon happens to
    // be up on this machine, "is running". Both are clean exits.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("running"));
}
