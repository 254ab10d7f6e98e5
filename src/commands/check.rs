use std::io::{self, Write};

use bf::{BracketMap, Program};
use clap::Args;

use crate::cli_util::print_error;
use crate::theme::{catppuccin::Mocha, paint_stderr};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct CheckArgs {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: CheckArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let CheckArgs { file, code, .. } = args;

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

    let sanitized = Program::sanitize(&code_str);
    let rendered = sanitized.to_string();
    match BracketMap::build(&sanitized) {
        Ok(map) => {
            println!("{rendered}");
            let _ = io::stdout().flush();
            eprintln!(
                "{} {} instructions, {} loops",
                paint_stderr(Mocha::SURFACE2, "ok:"),
                sanitized.len(),
                map.pairs()
            );
            let _ = io::stderr().flush();
            0
        }
        Err(err) => {
            print_error(Some(program), &rendered, &err);
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} check "<code>"
  {0} check --file <PATH>

Options:
  --file,  -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --help,  -h         Show this help

Description:
  Strips everything but ><+-.,[] and verifies that every loop is closed.
  Prints the sanitized program on success.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
