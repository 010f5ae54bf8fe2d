//! Stone color representation.

use crate::CoordError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the two players in Go.
///
/// The discriminants match the numeric GTP encoding (`1` for Black,
/// `2` for White). Empty board cells are modelled as `Option<Color>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Black = 1,
    White = 2,
}

impl Color {
    /// Both colors, Black first.
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns the index (0 for Black, 1 for White).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Returns the GTP argument form (`b` or `w`).
    #[inline]
    pub const fn to_gtp(self) -> &'static str {
        match self {
            Color::Black => "b",
            Color::White => "w",
        }
    }

    /// Parses a GTP color argument.
    ///
    /// Accepts `1`, `2`, `b`, `w`, `black` and `white`, ignoring case and
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, CoordError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "b" | "black" => Ok(Color::Black),
            "2" | "w" | "white" => Ok(Color::White),
            _ => Err(CoordError::InvalidColor(s.to_string())),
        }
    }
}

impl FromStr for Color {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}
