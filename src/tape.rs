use serde::Deserialize;
use std::fmt;

/// Wraparound width of a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum CellWidth {
    #[default]
    Eight,
    Sixteen,
}

impl CellWidth {
    pub const fn mask(self) -> u16 {
        match self {
            CellWidth::Eight => 0x00FF,
            CellWidth::Sixteen => 0xFFFF,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            CellWidth::Eight => 8,
            CellWidth::Sixteen => 16,
        }
    }
}

impl TryFrom<u8> for CellWidth {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(CellWidth::Eight),
            16 => Ok(CellWidth::Sixteen),
            other => Err(format!("cell width must be 8 or 16, got {other}")),
        }
    }
}

impl fmt::Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Fixed-length circular memory with a single cell pointer.
///
/// Moving past either end wraps to the other, and cell arithmetic wraps
/// modulo 2^width. Neither can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u16>,
    pointer: usize,
    width: CellWidth,
}

impl Tape {
    /// A zeroed tape. `len` must be at least 1; callers validate it through
    /// [`InterpreterConfig::validate`](crate::config::InterpreterConfig::validate).
    pub fn new(len: usize, width: CellWidth) -> Tape {
        debug_assert!(len > 0, "tape length must be non-zero");
        Tape {
            cells: vec![0; len],
            pointer: 0,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn width(&self) -> CellWidth {
        self.width
    }

    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    pub fn get(&self) -> u16 {
        self.cells[self.pointer]
    }

    /// Store `value` in the current cell, reduced modulo the cell width.
    pub fn set(&mut self, value: u32) {
        self.cells[self.pointer] = (value & u32::from(self.width.mask())) as u16;
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1) & self.width.mask();
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1) & self.width.mask();
    }

    pub fn move_right(&mut self) {
        self.pointer = (self.pointer + 1) % self.cells.len();
    }

    pub fn move_left(&mut self) {
        let len = self.cells.len();
        self.pointer = (self.pointer + len - 1) % len;
    }
}
