use std::fmt;
use std::num::NonZeroU8;
use std::str::FromStr;

use itertools::iproduct;
use thiserror::Error;

pub const WIDTH: usize = 9;
pub const HEIGHT: usize = 9;
pub const NUM_CELLS: usize = WIDTH * HEIGHT;
pub const MAX_VALUE: u8 = 9;

const NUM_BYTES: usize = NUM_CELLS.div_ceil(2);

/// A [Board] is a 9x9 sudoku board.
/// Each cell either holds a committed digit in 1..=9 or is empty.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    // Every byte stores two cells. The low 4 bits hold the first cell, the high 4 bits the second.
    // A nibble of 0 encodes an empty cell. Cells are ordered by rows, first left-to-right, then top-to-bottom.
    compressed_board: [u8; NUM_BYTES],
}

#[derive(Clone, Copy)]
enum CellSubindex {
    LowHalfByte,
    HighHalfByte,
}

pub struct CellRef<T> {
    byte: T,
    subindex: CellSubindex,
}

impl CellRef<&u8> {
    #[inline]
    pub fn get(&self) -> Option<NonZeroU8> {
        let value = match self.subindex {
            CellSubindex::LowHalfByte => self.byte & 0x0F,
            CellSubindex::HighHalfByte => self.byte >> 4,
        };
        assert!(value <= MAX_VALUE);
        NonZeroU8::new(value)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

impl CellRef<&mut u8> {
    #[inline]
    pub fn get(&self) -> Option<NonZeroU8> {
        CellRef::<&u8> {
            byte: self.byte,
            subindex: self.subindex,
        }
        .get()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }

    #[inline]
    pub fn set(&mut self, value: Option<NonZeroU8>) {
        let value = value.map_or(0, NonZeroU8::get);
        assert!(value <= MAX_VALUE);
        match self.subindex {
            CellSubindex::LowHalfByte => *self.byte = (*self.byte & 0xF0) | value,
            CellSubindex::HighHalfByte => *self.byte = (*self.byte & 0x0F) | (value << 4),
        }
    }
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Board {
            compressed_board: [0; NUM_BYTES],
        }
    }

    fn index(x: usize, y: usize) -> (usize, CellSubindex) {
        assert!(x < WIDTH && y < HEIGHT);
        let index = y * WIDTH + x;
        let subindex = if index % 2 == 0 {
            CellSubindex::LowHalfByte
        } else {
            CellSubindex::HighHalfByte
        };
        (index / 2, subindex)
    }

    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> CellRef<&'_ u8> {
        let (index, subindex) = Self::index(x, y);
        CellRef {
            byte: &self.compressed_board[index],
            subindex,
        }
    }

    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> CellRef<&'_ mut u8> {
        let (index, subindex) = Self::index(x, y);
        CellRef {
            byte: &mut self.compressed_board[index],
            subindex,
        }
    }

    pub fn is_filled(&self) -> bool {
        iproduct!(0..HEIGHT, 0..WIDTH).all(|(y, x)| !self.cell(x, y).is_empty())
    }

    pub fn num_empty(&self) -> usize {
        iproduct!(0..HEIGHT, 0..WIDTH)
            .filter(|&(y, x)| self.cell(x, y).is_empty())
            .count()
    }

    /// True iff some row, column or 3x3 box contains the same digit twice.
    /// Empty cells never count as duplicates.
    pub fn has_conflicts(&self) -> bool {
        let row_conflict =
            (0..HEIGHT).any(|y| self.house_has_duplicates((0..WIDTH).map(|x| (x, y))));
        let column_conflict =
            (0..WIDTH).any(|x| self.house_has_duplicates((0..HEIGHT).map(|y| (x, y))));
        let box_conflict = iproduct!(0..3, 0..3).any(|(box_x, box_y)| {
            self.house_has_duplicates(iproduct!(
                3 * box_x..3 * box_x + 3,
                3 * box_y..3 * box_y + 3
            ))
        });
        row_conflict || column_conflict || box_conflict
    }

    fn house_has_duplicates(&self, cells: impl Iterator<Item = (usize, usize)>) -> bool {
        let mut seen = 0u16;
        for (x, y) in cells {
            if let Some(value) = self.cell(x, y).get() {
                let bit = 1 << (value.get() - 1);
                if seen & bit != 0 {
                    return true;
                }
                seen |= bit;
            }
        }
        false
    }
}

/// Errors from constructing a [Board] out of malformed input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("expected {NUM_CELLS} cells, found {0}")]
    WrongCellCount(usize),

    #[error("invalid cell character {0:?}, expected '1'..='9' or '_'")]
    InvalidCellCharacter(char),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses a board from 81 cell characters, '1'..='9' for a digit and '_' for an empty cell.
    /// Whitespace is ignored so the input can be laid out as a readable 9x9 grid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<Option<NonZeroU8>> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|character| match character {
                '_' => Ok(None),
                '1'..='9' => Ok(NonZeroU8::new(character as u8 - b'0')),
                _ => Err(ParseBoardError::InvalidCellCharacter(character)),
            })
            .collect::<Result<_, _>>()?;
        if cells.len() != NUM_CELLS {
            return Err(ParseBoardError::WrongCellCount(cells.len()));
        }
        let mut board = Board::new_empty();
        for (index, value) in cells.into_iter().enumerate() {
            board.cell_mut(index % WIDTH, index / WIDTH).set(value);
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Renders the board as a fixed-width text grid with a `+---` separator line
    /// at the top and after every third row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "+---".repeat(WIDTH) + "+";
        writeln!(f, "{separator}")?;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                match self.cell(x, y).get() {
                    Some(value) => write!(f, "| {value} ")?,
                    None => write!(f, "|   ")?,
                }
            }
            writeln!(f, "|")?;
            if (y + 1) % 3 == 0 {
                writeln!(f, "{separator}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    // Compact form, same layout that [Board::from_str] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                match self.cell(x, y).get() {
                    Some(value) => write!(f, "{value}")?,
                    None => write!(f, "_")?,
                }
                if x % 3 == 2 && x != WIDTH - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
