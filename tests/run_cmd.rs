use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `bf` pointed at `bf.toml` inside `config_home`, so a user's own config
/// cannot leak in.
fn bf(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bf").expect("bf binary");
    cmd.env("BF_CONFIG", config_home.path().join("bf.toml"))
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TIMEOUT_MS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn echoes_supplied_input() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--input", "A", ",."])
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn no_echo_still_prints_output_after_run() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--no-echo", "--input", "ok", ",.,."])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn comments_are_ignored() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--stats", "hello world"])
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("0 steps"));
}

#[test]
fn stats_report_step_count() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--stats", "--input", "A", ",."])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 steps in"));
}

#[test]
fn unmatched_close_is_reported_with_context() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "+]"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing opening brace").and(predicate::str::contains("at instruction 1")));
}

#[test]
fn unmatched_open_is_reported() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "[["])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing closing brace"));
}

#[test]
fn output_file_is_written() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out.txt");
    bf(&home)
        .args(["run", "--no-echo", "--input", "xyz", "--out"])
        .arg(&out)
        .arg(",.,.,.")
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "xyz");
}

#[test]
fn code_can_be_loaded_from_file() {
    let home = TempDir::new().unwrap();
    let src = home.path().join("prog.bf");
    std::fs::write(&src, "read a char, print it:\n,.\n").unwrap();
    bf(&home)
        .args(["run", "--input", "Q", "--file"])
        .arg(&src)
        .assert()
        .success()
        .stdout("Q\n");
}

#[test]
fn step_limit_aborts_infinite_loop() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--max-steps", "50", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn step_limit_from_environment() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .env("BF_MAX_STEPS", "10")
        .args(["run", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (10)"));
}

#[test]
fn timeout_aborts_infinite_loop() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--timeout", "100", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timeout exceeded (100 ms)"));
}

#[test]
fn sixteen_bit_cells_from_flag() {
    let home = TempDir::new().unwrap();
    let code = "+".repeat(256) + ".";
    bf(&home)
        .args(["run", "--cell-width", "16"])
        .arg(&code)
        .assert()
        .success()
        .stdout("\u{100}\n");
}

#[test]
fn invalid_cell_width_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--cell-width", "12", "+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("8 or 16"));
}

#[test]
fn zero_tape_length_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .args(["run", "--tape-length", "0", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("tape_length must be > 0"));
}

#[test]
fn settings_come_from_config_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("bf.toml"),
        "[interpreter]\ntape_length = 3\nconsole_echo = false\n",
    )
    .unwrap();
    // With three cells, `<` from cell 0 lands on cell 2.
    bf(&home)
        .args(["run", "--input", "k", "<,>>.>."])
        .assert()
        .success()
        .stdout("\0k\n");
}

#[test]
fn missing_code_prints_usage() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn no_subcommand_prints_usage() {
    let home = TempDir::new().unwrap();
    bf(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("check"));
}
