//! A tiny Brainfuck interpreter library.
//!
//! This crate provides a Brainfuck interpreter that operates on a circular
//! memory tape (default 30,000 cells) with a single data pointer.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; the pointer wraps around at both ends.
//! - Cells are 8-bit by default, optionally 16-bit; arithmetic wraps.
//! - Any character outside `><+-.,[]` is ignored.
//! - Unmatched brackets are reported before the program starts.
//! - Input `,` consumes the supplied input string (0 once exhausted), or reads a
//!   single key from the console when no input string is given.
//! - Output `.` is captured and returned; it is also echoed to stdout unless
//!   console echo is turned off.
//!
//! Quick start:
//!
//! ```no_run
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let report = bf::execute(code, None, None).expect("program should run");
//! assert_eq!(report.output, "Hello World!\n");
//! println!("{} steps in {:.3} ms", report.steps, report.elapsed_ms());
//! ```

use std::path::Path;

pub mod brackets;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod program;
pub mod tape;

pub use brackets::BracketMap;
pub use config::InterpreterConfig;
pub use engine::{Interpreter, RunReport, StepControl};
pub use error::BrainfuckError;
pub use program::{Op, Program};
pub use tape::{CellWidth, Tape};

/// Run `source` once with the process-wide settings from [`config::global`].
///
/// `input` feeds `,`; without it `,` reads from the console. When `output`
/// names a file, the captured output is written there after the run.
pub fn execute(
    source: &str,
    input: Option<&str>,
    output: Option<&Path>,
) -> Result<RunReport, BrainfuckError> {
    execute_with(config::global(), source, input, output)
}

/// Like [`execute`], with explicit settings.
pub fn execute_with(
    config: InterpreterConfig,
    source: &str,
    input: Option<&str>,
    output: Option<&Path>,
) -> Result<RunReport, BrainfuckError> {
    let mut interpreter = Interpreter::new(source, config)?;
    let report = interpreter.run(input)?;
    if let Some(path) = output {
        report.persist(path)?;
    }
    Ok(report)
}
