//! Core types for Go.
//!
//! This crate provides the fundamental types shared by the rules engine,
//! the GTP protocol layer and the match arena:
//! - [`Color`] for stone colors
//! - [`Point`] for board coordinates and GTP vertex notation
//! - [`Move`] for plays, passes and resignations
//! - GTP score strings (`B+3.5`, `W+R`, `0`)

mod color;
mod mov;
mod point;
mod score;

pub use color::Color;
pub use mov::Move;
pub use point::{column_letter, Point, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use score::{format_score, parse_score, RESIGNATION_SCORE};

use thiserror::Error;

/// Errors raised while decoding textual colors, vertices and scores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid point: {0}")]
    InvalidPoint(String),
    #[error("invalid score: {0}")]
    InvalidScore(String),
}
