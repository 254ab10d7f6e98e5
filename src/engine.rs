//! The fetch-execute loop.
//!
//! An [`Interpreter`] is built once from source text: the source is
//! sanitized and its brackets resolved up front, so a malformed program is
//! rejected before anything runs. Each call to [`Interpreter::run`] then
//! starts from fresh state: instruction pointer 0, zeroed
//! tape, empty output.
//!
//! Behaviors:
//! - The tape is circular; `<` on cell 0 moves to the last cell and `>` on the
//!   last cell moves to cell 0.
//! - Cells wrap modulo 2^8 or 2^16 depending on [`CellWidth`](crate::tape::CellWidth).
//! - `.` appends the cell, read as a character code, to the captured output and
//!   mirrors it to the echo sink when console echo is on.
//! - `,` takes the next character of the supplied input (0 once exhausted),
//!   or blocks on the console reader when no input was supplied.
//! - The run ends when the instruction pointer walks off the end of the
//!   program; there is no halt instruction.

use std::fs;
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use crate::brackets::BracketMap;
use crate::config::InterpreterConfig;
use crate::error::BrainfuckError;
use crate::io::{self, ConsoleReader, EchoSink, InputCursor, InputSource, OutputBuffer};
use crate::program::{Op, Program};
use crate::tape::Tape;

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Default)]
pub struct StepControl {
    pub max_steps: Option<u64>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<u64>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self {
            max_steps,
            cancel_flag,
        }
    }
}

/// What a completed run leaves behind.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Instructions executed, including taken and untaken jumps.
    pub steps: u64,
    pub elapsed: Duration,
    pub output: String,
    /// Memory as the program left it.
    pub tape: Tape,
}

impl RunReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Write the captured output to `path` as plain text, replacing any
    /// existing content.
    pub fn persist(&self, path: &Path) -> Result<(), BrainfuckError> {
        fs::write(path, &self.output).map_err(|source| BrainfuckError::OutputFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = self.output.len(), "output persisted");
        Ok(())
    }
}

/// Mutable state owned by exactly one run.
struct ExecutionState<'a> {
    ip: usize,
    tape: Tape,
    input: InputSource<'a>,
    output: OutputBuffer,
    steps: u64,
}

impl<'a> ExecutionState<'a> {
    fn new(config: &InterpreterConfig, input: InputSource<'a>) -> Self {
        Self {
            ip: 0,
            tape: Tape::new(config.tape_length, config.cell_width),
            input,
            output: OutputBuffer::default(),
            steps: 0,
        }
    }
}

/// A validated program plus the hooks its runs talk to.
pub struct Interpreter {
    program: Program,
    brackets: BracketMap,
    config: InterpreterConfig,
    echo_sink: EchoSink,
    console_input: ConsoleReader,
}

impl Interpreter {
    /// Sanitize `source`, resolve its loops and validate `config`.
    pub fn new(source: &str, config: InterpreterConfig) -> Result<Self, BrainfuckError> {
        config.validate()?;
        let program = Program::sanitize(source);
        let brackets = BracketMap::build(&program)?;
        tracing::debug!(
            instructions = program.len(),
            loops = brackets.pairs(),
            tape_length = config.tape_length,
            cell_width = %config.cell_width,
            "program prepared"
        );
        Ok(Self {
            program,
            brackets,
            config,
            echo_sink: io::stdout_echo(),
            console_input: io::console_reader(),
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Replace where echoed output goes (stdout by default). Only called when
    /// console echo is enabled.
    pub fn set_echo_sink<F>(&mut self, sink: F)
    where
        F: FnMut(char) + Send + 'static,
    {
        self.echo_sink = Box::new(sink);
    }

    /// Replace the reader `,` blocks on when no input string was supplied.
    /// Returning `Ok(None)` indicates EOF (cell is set to 0).
    pub fn set_console_input<F>(&mut self, reader: F)
    where
        F: FnMut() -> std::io::Result<Option<char>> + Send + 'static,
    {
        self.console_input = Box::new(reader);
    }

    /// Execute the program until the instruction pointer passes its end.
    pub fn run(&mut self, input: Option<&str>) -> Result<RunReport, BrainfuckError> {
        self.execute(input, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control(
        &mut self,
        input: Option<&str>,
        step_control: StepControl,
    ) -> Result<RunReport, BrainfuckError> {
        self.execute(input, Some(&step_control))
    }

    fn execute(
        &mut self,
        input: Option<&str>,
        step_control: Option<&StepControl>,
    ) -> Result<RunReport, BrainfuckError> {
        let Interpreter {
            program,
            brackets,
            config,
            echo_sink,
            console_input,
        } = self;

        let input = match input {
            Some(text) => InputSource::Buffered(InputCursor::new(text)),
            None => InputSource::Console(console_input),
        };
        let mut state = ExecutionState::new(config, input);
        let ops = program.ops();
        let start = Instant::now();

        while state.ip < ops.len() {
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(BrainfuckError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if state.steps >= max {
                        return Err(BrainfuckError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let op = ops[state.ip];
            tracing::trace!(
                step = state.steps,
                ip = state.ip,
                ptr = state.tape.pointer(),
                cell = state.tape.get(),
                %op,
                "step"
            );

            match op {
                Op::Inc => state.tape.increment(),
                Op::Dec => state.tape.decrement(),
                Op::Right => state.tape.move_right(),
                Op::Left => state.tape.move_left(),
                Op::LoopStart => {
                    if state.tape.get() == 0 {
                        state.ip = brackets.target(state.ip).expect("validated bracket");
                    }
                }
                Op::LoopEnd => {
                    if state.tape.get() != 0 {
                        state.ip = brackets.target(state.ip).expect("validated bracket");
                    }
                }
                Op::Output => {
                    let c = io::cell_to_char(state.tape.get());
                    state.output.push(c);
                    if config.console_echo {
                        echo_sink(c);
                    }
                }
                Op::Input => {
                    let code = state
                        .input
                        .read()
                        .map_err(|source| BrainfuckError::IoError { ip: state.ip, source })?;
                    state.tape.set(code);
                }
            }

            state.steps += 1;
            state.ip += 1;
        }

        let elapsed = start.elapsed();
        tracing::debug!(
            steps = state.steps,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            output_chars = state.output.as_str().chars().count(),
            "run complete"
        );

        Ok(RunReport {
            steps: state.steps,
            elapsed,
            output: state.output.into_string(),
            tape: state.tape,
        })
    }
}
