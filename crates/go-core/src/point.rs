//! Board point representation.

use crate::CoordError;
use std::fmt;

/// Smallest supported board side.
pub const MIN_BOARD_SIZE: u8 = 5;

/// Largest supported board side.
pub const MAX_BOARD_SIZE: u8 = 25;

/// Column letters in GTP order. There is no `I` column.
const COLUMN_LETTERS: &[u8; MAX_BOARD_SIZE as usize] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Returns the GTP letter for a zero-based column.
#[inline]
pub fn column_letter(column: u8) -> Option<char> {
    COLUMN_LETTERS.get(column as usize).map(|&b| b as char)
}

fn column_from_letter(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase() as u8;
    COLUMN_LETTERS
        .iter()
        .position(|&b| b == upper)
        .map(|i| i as u8)
}

/// A point on a square board of side `size`.
///
/// Points are indexed column-major: `index = column * size + row`, so
/// `A1 = 0`, `A2 = 1`, ..., `B1 = size`. A point does not remember the
/// board size; callers pass it to every conversion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point(u16);

impl Point {
    /// Creates a point from zero-based column and row, checking bounds.
    #[inline]
    pub const fn new(column: u8, row: u8, size: u8) -> Option<Self> {
        if column < size && row < size {
            Some(Point(column as u16 * size as u16 + row as u16))
        } else {
            None
        }
    }

    /// Creates a point from its index, checking bounds.
    #[inline]
    pub const fn from_index(index: usize, size: u8) -> Option<Self> {
        if index < size as usize * size as usize {
            Some(Point(index as u16))
        } else {
            None
        }
    }

    /// Returns the index into a column-major grid.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the zero-based column.
    #[inline]
    pub const fn column(self, size: u8) -> u8 {
        (self.0 / size as u16) as u8
    }

    /// Returns the zero-based row.
    #[inline]
    pub const fn row(self, size: u8) -> u8 {
        (self.0 % size as u16) as u8
    }

    /// Parses a GTP vertex such as `D4` or `t19`.
    ///
    /// Fails with [`CoordError::InvalidPoint`] when the column letter is `I`,
    /// when the column or row lies outside a board of `size`, or when the
    /// text is not a letter followed by a number.
    pub fn parse(s: &str, size: u8) -> Result<Self, CoordError> {
        let invalid = || CoordError::InvalidPoint(s.to_string());
        let s_trimmed = s.trim();
        let mut chars = s_trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if letter.eq_ignore_ascii_case(&'i') {
            return Err(CoordError::InvalidPoint(format!(
                "{}: there is no I column",
                s_trimmed
            )));
        }
        let column = column_from_letter(letter).ok_or_else(invalid)?;
        let number = chars.as_str();
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: u8 = number.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Point::new(column, row - 1, size).ok_or_else(invalid)
    }

    /// Returns the GTP vertex for this point on a board of `size`.
    pub fn to_vertex(self, size: u8) -> String {
        let letter = column_letter(self.column(size)).unwrap_or('?');
        format!("{}{}", letter, self.row(size) + 1)
    }

    /// Returns the orthogonal neighbors of this point on a board of `size`.
    pub fn neighbors(self, size: u8) -> impl Iterator<Item = Point> {
        let size = size as u16;
        let area = size * size;
        let p = self.0;
        let row = p % size;
        [
            (p >= size).then(|| p - size),
            (p + size < area).then(|| p + size),
            (row != 0).then(|| p - 1),
            (row != size - 1).then(|| p + 1),
        ]
        .into_iter()
        .flatten()
        .map(Point)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", self.0)
    }
}
