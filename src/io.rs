//! Where `.` writes and `,` reads.
//!
//! Output always lands in an [`OutputBuffer`]; an optional echo sink mirrors
//! it live. Input comes from an [`InputCursor`] over caller-supplied text, or
//! from a blocking console read when no text was supplied.

use std::io::{self, IsTerminal, Read, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Receives each output character as it is produced.
pub type EchoSink = Box<dyn FnMut(char) + Send>;

/// Blocking single-character read. `Ok(None)` means end of input.
pub type ConsoleReader = Box<dyn FnMut() -> io::Result<Option<char>> + Send>;

/// Unconsumed characters of a caller-supplied input string.
#[derive(Debug, Clone, Default)]
pub struct InputCursor {
    chars: Vec<char>,
    pos: usize,
}

impl InputCursor {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Code of the next character, or 0 once the input is exhausted.
    pub fn next_code(&mut self) -> u32 {
        match self.chars.get(self.pos) {
            Some(&c) => {
                self.pos += 1;
                u32::from(c)
            }
            None => 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

/// Input for a single run.
pub(crate) enum InputSource<'a> {
    Buffered(InputCursor),
    Console(&'a mut ConsoleReader),
}

impl InputSource<'_> {
    /// Character code for the next `,`. End of console input reads as 0.
    pub(crate) fn read(&mut self) -> io::Result<u32> {
        match self {
            InputSource::Buffered(cursor) => Ok(cursor.next_code()),
            InputSource::Console(reader) => Ok((**reader)()?.map(u32::from).unwrap_or(0)),
        }
    }
}

/// Append-only record of everything `.` produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Interpret a cell value as a character code.
///
/// Values that are not Unicode scalars (UTF-16 surrogates in 16-bit mode)
/// become U+FFFD.
pub fn cell_to_char(value: u16) -> char {
    char::from_u32(u32::from(value)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Echo sink writing to stdout, flushed per character so output appears live.
pub fn stdout_echo() -> EchoSink {
    Box::new(|c| {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{c}");
        let _ = out.flush();
    })
}

/// Console reader: one keypress from a terminal, or one byte from piped stdin.
pub fn console_reader() -> ConsoleReader {
    Box::new(|| {
        if io::stdin().is_terminal() {
            read_key()
        } else {
            read_byte(&mut io::stdin().lock())
        }
    })
}

/// Read exactly one byte; on EOF return `None`.
pub fn read_byte<R: Read>(reader: &mut R) -> io::Result<Option<char>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(char::from(buf[0]))),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Block until a single key is pressed, then echo it.
fn read_key() -> io::Result<Option<char>> {
    let key = {
        let _raw = RawModeGuard::enable()?;
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('c') => {
                        return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted by ctrl+c"));
                    }
                    KeyCode::Char('d') => break None,
                    _ => continue,
                }
            }
            match key.code {
                KeyCode::Char(c) => break Some(c),
                KeyCode::Enter => break Some('\n'),
                KeyCode::Tab => break Some('\t'),
                KeyCode::Backspace => break Some('\u{8}'),
                KeyCode::Esc => break Some('\u{1b}'),
                _ => continue,
            }
        }
    };

    if let Some(c) = key {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{c}");
        let _ = out.flush();
    }
    tracing::trace!(?key, "console key read");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cursor_yields_chars_then_zero() {
        let mut cursor = InputCursor::new("Hi");
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.next_code(), u32::from('H'));
        assert_eq!(cursor.next_code(), u32::from('i'));
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.next_code(), 0);
        assert_eq!(cursor.next_code(), 0);
    }

    #[test]
    fn cursor_reads_whole_characters() {
        let mut cursor = InputCursor::new("é€");
        assert_eq!(cursor.next_code(), 0xE9);
        assert_eq!(cursor.next_code(), 0x20AC);
    }

    #[test]
    fn console_source_maps_eof_to_zero() {
        let mut reader: ConsoleReader = Box::new(|| Ok(None));
        let mut source = InputSource::Console(&mut reader);
        assert_eq!(source.read().expect("read"), 0);
    }

    #[test]
    fn console_source_propagates_errors() {
        let mut reader: ConsoleReader =
            Box::new(|| Err(io::Error::new(io::ErrorKind::Interrupted, "stop")));
        let mut source = InputSource::Console(&mut reader);
        assert!(source.read().is_err());
    }

    #[test]
    fn read_byte_reads_one_at_a_time() {
        let mut input = Cursor::new(b"AB".to_vec());
        assert_eq!(read_byte(&mut input).expect("read"), Some('A'));
        assert_eq!(read_byte(&mut input).expect("read"), Some('B'));
        assert_eq!(read_byte(&mut input).expect("read"), None);
    }

    #[test]
    fn surrogate_cells_become_replacement_chars() {
        assert_eq!(cell_to_char(72), 'H');
        assert_eq!(cell_to_char(0xD800), char::REPLACEMENT_CHARACTER);
        assert_eq!(cell_to_char(0x263A), '☺');
    }

    #[test]
    fn output_buffer_appends_in_order() {
        let mut out = OutputBuffer::default();
        out.push('o');
        out.push('k');
        assert_eq!(out.as_str(), "ok");
        assert_eq!(out.into_string(), "ok");
    }
}
