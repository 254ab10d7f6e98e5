use crate::error::BrainfuckError;
use crate::program::{Op, Program};

/// Matching positions of every `[` and `]` in a program.
///
/// `target(i)` is defined only where the program holds a bracket, and
/// `target(target(i)) == Some(i)` for each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketMap {
    jumps: Vec<Option<usize>>,
}

impl BracketMap {
    /// Resolve loop brackets in one left-to-right pass.
    ///
    /// A `]` with nothing open fails immediately; any `[` still open at the
    /// end fails with the innermost one's position.
    pub fn build(program: &Program) -> Result<BracketMap, BrainfuckError> {
        let mut jumps: Vec<Option<usize>> = vec![None; program.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, op) in program.ops().iter().enumerate() {
            match op {
                Op::LoopStart => stack.push(i),
                Op::LoopEnd => {
                    let Some(open_index) = stack.pop() else {
                        return Err(BrainfuckError::UnmatchedCloseBrace { ip: i });
                    };
                    jumps[open_index] = Some(i);
                    jumps[i] = Some(open_index);
                }
                _ => {}
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(BrainfuckError::UnmatchedOpenBrace { ip: unmatched_open });
        }

        Ok(BracketMap { jumps })
    }

    pub fn target(&self, ip: usize) -> Option<usize> {
        self.jumps.get(ip).copied().flatten()
    }

    /// Number of matched bracket pairs.
    pub fn pairs(&self) -> usize {
        self.jumps.iter().filter(|j| j.is_some()).count() / 2
    }
}
