use std::fs;
use std::io::{self, Write};

pub mod check;
pub mod run;

/// Source text from `--file` or the concatenated positional parts.
/// Returns the exit code to use on failure.
pub(crate) fn load_source(program: &str, file: Option<&str>, code: &[String]) -> Result<String, i32> {
    match file {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            eprintln!("{program}: failed to read code file as UTF-8: {e}");
            let _ = io::stderr().flush();
            1
        }),
        None => Ok(code.join("")),
    }
}
