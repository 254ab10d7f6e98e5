// Without --input, `,` falls back to the console; piped stdin is read one byte
// at a time, and EOF reads as 0.

#[test]
fn reads_from_stdin_and_echoes_byte() {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("failed to locate bf binary");

    cmd.args(["run", ",."])
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z\n");
}

#[test]
fn eof_on_stdin_reads_zero() {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("failed to locate bf binary");

    // Reads 'a', then EOF -> 0 ends the loop.
    cmd.args(["run", "--no-echo", ",[.,]"])
        .write_stdin("a")
        .assert()
        .success()
        .stdout("a\n");
}
