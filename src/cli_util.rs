use std::io::{self, Write};

use bf::BrainfuckError;

use crate::theme::{catppuccin::Mocha, paint_stderr};

/// Pretty-print a BrainfuckError, with a caret under the offending instruction
/// when it has one. `code` is the sanitized program the positions refer to.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_error(program: Option<&str>, code: &str, err: &BrainfuckError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        BrainfuckError::UnmatchedOpenBrace { ip } => {
            let msg = prefix_program(&format!(
                "{} invalid syntax, missing closing brace for '['",
                paint_stderr(Mocha::RED, "Parse error:")
            ));
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckError::UnmatchedCloseBrace { ip } => {
            let msg = prefix_program(&format!(
                "{} invalid syntax, missing opening brace for ']'",
                paint_stderr(Mocha::RED, "Parse error:")
            ));
            print_error_with_context(&msg, code, *ip);
        }
        BrainfuckError::IoError { ip, source } => {
            let msg = prefix_program(&format!("{} {source}", paint_stderr(Mocha::RED, "I/O error:")));
            print_error_with_context(&msg, code, *ip);
        }
        other => {
            eprintln!("{}", prefix_program(&format!("{} {other}", paint_stderr(Mocha::RED, "error:"))));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    let slice = &code[start_byte..end_byte];

    eprintln!("  {}", slice);

    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}{}", " ".repeat(caret_offset_chars), paint_stderr(Mocha::YELLOW, "^"));
    eprintln!("  {}", underline);
    let _ = io::stderr().flush();
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_index_maps_to_byte_offsets() {
        let s = "a→b";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 1);
        assert_eq!(char_to_byte_index(s, 2), 4);
        assert_eq!(char_to_byte_index(s, 3), s.len());
        assert_eq!(char_to_byte_index(s, 10), s.len());
    }
}
