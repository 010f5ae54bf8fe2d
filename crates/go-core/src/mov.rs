//! Move representation.

use crate::{CoordError, Point};

/// A Go move: a stone placement, a pass, or a resignation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Place a stone on a point.
    Place(Point),
    /// Pass the turn.
    Pass,
    /// Resign the game.
    Resign,
}

impl Move {
    /// Parses a GTP move argument: `pass`, `resign` (any case) or a vertex.
    pub fn parse(s: &str, size: u8) -> Result<Self, CoordError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else if trimmed.eq_ignore_ascii_case("resign") {
            Ok(Move::Resign)
        } else {
            Point::parse(trimmed, size).map(Move::Place)
        }
    }

    /// Returns the canonical GTP text for this move.
    pub fn to_gtp(self, size: u8) -> String {
        match self {
            Move::Place(point) => point.to_vertex(size),
            Move::Pass => "pass".to_string(),
            Move::Resign => "resign".to_string(),
        }
    }

    #[inline]
    pub const fn is_pass(self) -> bool {
        matches!(self, Move::Pass)
    }

    #[inline]
    pub const fn is_resign(self) -> bool {
        matches!(self, Move::Resign)
    }
}
