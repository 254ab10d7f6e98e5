//! Instruction alphabet and source sanitization.

use std::fmt;

/// One of the eight Brainfuck instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Inc,
    Dec,
    Left,
    Right,
    LoopStart,
    LoopEnd,
    Output,
    Input,
}

impl Op {
    /// Map a source character to its instruction; anything else is `None`.
    pub fn from_char(c: char) -> Option<Op> {
        Some(match c {
            '+' => Op::Inc,
            '-' => Op::Dec,
            '<' => Op::Left,
            '>' => Op::Right,
            '[' => Op::LoopStart,
            ']' => Op::LoopEnd,
            '.' => Op::Output,
            ',' => Op::Input,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Op::Inc => '+',
            Op::Dec => '-',
            Op::Left => '<',
            Op::Right => '>',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
            Op::Output => '.',
            Op::Input => ',',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A sanitized program: only instruction characters, in source order.
///
/// Everything outside `+-<>[].,` is dropped, including text a reader might
/// consider a comment. An empty program is valid and runs in zero steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub fn sanitize(source: &str) -> Program {
        Program {
            ops: source.chars().filter_map(Op::from_char).collect(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
