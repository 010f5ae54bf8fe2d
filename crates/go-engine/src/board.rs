//! Board representation with group and liberty search.
//!
//! All searches use an explicit work-list and a visited set instead of
//! recursion, so memory stays bounded by the board area and the visiting
//! order is deterministic.

use crate::RuleError;
use go_core::{column_letter, Color, Point, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use std::fmt;

/// A square grid of stones.
///
/// Two boards compare equal when they have the same size and the same stone
/// on every point, which makes a `Board` usable as a full-board snapshot for
/// repetition detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    cells: Vec<Option<Color>>,
}

impl Board {
    /// Creates an empty board of side `size`.
    pub fn new(size: u8) -> Result<Self, RuleError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(RuleError::InvalidBoardSize(size));
        }
        Ok(Board {
            size,
            cells: vec![None; size as usize * size as usize],
        })
    }

    /// Returns the board side.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the number of points on the board.
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Returns the stone on `point`, or `None` for an empty point.
    ///
    /// Points outside the board read as empty.
    #[inline]
    pub fn get(&self, point: Point) -> Option<Color> {
        self.cells.get(point.index()).copied().flatten()
    }

    /// Returns true if `point` lies on this board.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.index() < self.cells.len()
    }

    /// Puts `stone` on `point` without applying any rules.
    pub fn set(&mut self, point: Point, stone: Option<Color>) {
        if let Some(cell) = self.cells.get_mut(point.index()) {
            *cell = stone;
        }
    }

    /// Returns true if no stones are on the board.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Iterates over every point of the board in index order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let size = self.size;
        (0..self.cells.len()).filter_map(move |i| Point::from_index(i, size))
    }

    /// Counts the stones of `color` on the board.
    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Removes the group of `color` containing `point` if it has no liberties.
    ///
    /// Returns the number of stones removed. Nothing happens if `point` does
    /// not hold a stone of `color`. The search stops at the first liberty
    /// found.
    pub fn capture_group(&mut self, point: Point, color: Color) -> usize {
        if self.get(point) != Some(color) {
            return 0;
        }
        let mut visited = vec![false; self.cells.len()];
        let mut group = Vec::new();
        let mut to_visit = vec![point];
        while let Some(current) = to_visit.pop() {
            match self.get(current) {
                None => return 0,
                Some(c) if c != color => continue,
                Some(_) => {}
            }
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            group.push(current);
            to_visit.extend(current.neighbors(self.size));
        }

        for &stone in &group {
            self.set(stone, None);
        }
        group.len()
    }

    /// Computes the area of each color, indexed by [`Color::index`].
    ///
    /// A point counts for a color when it holds one of its stones, or when it
    /// is empty and its maximal empty region borders stones of that color
    /// only. Regions bordering both colors, or none, are neutral.
    pub fn area_counts(&self) -> [usize; 2] {
        let mut area = [0usize; 2];
        let mut visited = vec![false; self.cells.len()];
        for point in self.points() {
            match self.get(point) {
                Some(color) => area[color.index()] += 1,
                None if !visited[point.index()] => {
                    let (region, reaches) = self.empty_region(point, &mut visited);
                    match reaches {
                        [true, false] => area[Color::Black.index()] += region,
                        [false, true] => area[Color::White.index()] += region,
                        _ => {}
                    }
                }
                None => {}
            }
        }
        area
    }

    /// Flood-fills the empty region containing `start`.
    ///
    /// Returns the region size and which colors border it.
    fn empty_region(&self, start: Point, visited: &mut [bool]) -> (usize, [bool; 2]) {
        let mut reaches = [false; 2];
        let mut region = 0;
        let mut to_visit = vec![start];
        while let Some(current) = to_visit.pop() {
            match self.get(current) {
                Some(color) => reaches[color.index()] = true,
                None => {
                    if visited[current.index()] {
                        continue;
                    }
                    visited[current.index()] = true;
                    region += 1;
                    to_visit.extend(current.neighbors(self.size));
                }
            }
        }
        (region, reaches)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = (0..self.size)
            .filter_map(column_letter)
            .map(|c| format!(" {}", c))
            .collect();
        writeln!(f, "  {}", letters)?;
        for row in (0..self.size).rev() {
            write!(f, "{:>2}", row + 1)?;
            for column in 0..self.size {
                let symbol = match Point::new(column, row, self.size).and_then(|p| self.get(p)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, " {}", symbol)?;
            }
            writeln!(f, " {}", row + 1)?;
        }
        write!(f, "  {}", letters)
    }
}
