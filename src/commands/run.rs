use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use bf::{BrainfuckError, CellWidth, Interpreter, InterpreterConfig, RunReport, StepControl};
use clap::Args;

use crate::cli_util::print_error;
use crate::theme::{catppuccin::Mocha, paint_stderr};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Trace every executed instruction to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Feed `,` from TEXT instead of the console
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    /// Also write the program output to PATH (overwritten)
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Number of tape cells (default from bf.toml, else 30000)
    #[arg(long = "tape-length", value_name = "N")]
    pub tape_length: Option<usize>,

    /// Cell width in bits: 8 or 16
    #[arg(long = "cell-width", value_name = "BITS", value_parser = parse_cell_width)]
    pub cell_width: Option<CellWidth>,

    /// Do not echo output while running; print it once the run completes
    #[arg(long = "no-echo")]
    pub no_echo: bool,

    /// Print step count and elapsed time to stderr
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

fn parse_cell_width(s: &str) -> Result<CellWidth, String> {
    let bits: u8 = s.parse().map_err(|_| format!("expected 8 or 16, got '{s}'"))?;
    CellWidth::try_from(bits)
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        file,
        input,
        out,
        tape_length,
        cell_width,
        no_echo,
        stats,
        timeout_ms,
        max_steps,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = match super::load_source(program, file.as_deref(), &code) {
        Ok(s) => s,
        Err(exit_code) => return exit_code,
    };

    // Resolve settings: flags -> bf.toml -> defaults
    let mut config = bf::config::load_user_config();
    if let Some(len) = tape_length {
        config.tape_length = len;
    }
    if let Some(width) = cell_width {
        config.cell_width = width;
    }
    if no_echo {
        config.console_echo = false;
    }
    if let Err(e) = config.validate() {
        eprintln!("{program}: {e}");
        usage_and_exit(program, 2);
    }

    // Resolve limits: flags -> env -> defaults
    let timeout_ms = timeout_ms
        .or_else(|| std::env::var("BF_TIMEOUT_MS").ok().and_then(|s| s.parse::<u64>().ok()));
    let max_steps = max_steps
        .or_else(|| std::env::var("BF_MAX_STEPS").ok().and_then(|s| s.parse::<u64>().ok()));

    let mut interpreter = match Interpreter::new(&code_str, config) {
        Ok(interpreter) => interpreter,
        Err(err) => {
            print_error(Some(program), &bf::Program::sanitize(&code_str).to_string(), &err);
            return 1;
        }
    };
    let sanitized = interpreter.program().to_string();

    // Execute on a worker thread with cooperative cancellation
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<RunReport, BrainfuckError>>();
    let ctrl = StepControl::new(max_steps, Arc::clone(&cancel));

    thread::spawn(move || {
        let res = interpreter.run_with_control(input.as_deref(), ctrl);
        let _ = tx.send(res);
    });

    let received = match timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = match received {
        Ok(Ok(report)) => finish(program, &config, &report, out, stats),
        Ok(Err(BrainfuckError::Canceled)) => {
            eprintln!("Execution aborted: cancelled");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(other)) => {
            print_error(Some(program), &sanitized, &other);
            1
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            // The worker may be parked in a raw-mode key read.
            let _ = crossterm::terminal::disable_raw_mode();
            eprintln!(
                "Execution aborted: wall-clock timeout exceeded ({} ms)",
                timeout_ms.unwrap_or_default()
            );
            let _ = io::stderr().flush();
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    };

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn finish(
    program: &str,
    config: &InterpreterConfig,
    report: &RunReport,
    out: Option<PathBuf>,
    stats: bool,
) -> i32 {
    if !config.console_echo {
        print!("{}", report.output);
        let _ = io::stdout().flush();
    }

    if let Some(path) = out {
        if let Err(err) = report.persist(&path) {
            print_error(Some(program), "", &err);
            return 1;
        }
    }

    if stats {
        eprintln!(
            "{} {} steps in {:.3} ms",
            paint_stderr(Mocha::TEAL, "stats:"),
            report.steps,
            report.elapsed_ms()
        );
        let _ = io::stderr().flush();
    }
    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"           # options go before the code
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>    Read Brainfuck code from PATH instead of positional "<code>"
  --input, -i <TEXT>    Feed `,` from TEXT; once exhausted `,` reads 0
  --out,   -o <PATH>    Also write the program output to PATH (overwritten)
  --tape-length <N>     Number of tape cells (default 30000)
  --cell-width <8|16>   Cell width in bits (default 8)
  --no-echo             Print output after the run instead of while running
  --stats, -s           Print step count and elapsed time to stderr
  --max-steps <N>       Abort after N steps (fallback BF_MAX_STEPS)
  --timeout <MS>        Abort after MS milliseconds (fallback BF_TIMEOUT_MS)
  --debug, -d           Trace every executed instruction to stderr
  --help,  -h           Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- The tape is circular: moving off either end wraps to the other.
- Without --input, `,` reads a single key from the console (or a byte from piped stdin).
- Defaults for tape length, cell width and echo can be set under [interpreter] in bf.toml
  in your config directory.

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
- Echo the first character of some text:
    {0} run --input "A" ",."
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
