//! Go rules engine used as an impartial referee.
//!
//! This crate provides:
//! - [`Board`] - a square grid of stones with group and liberty search
//! - [`Game`] - full game state: move validation, captures, positional
//!   superko, pass/resignation tracking and area scoring
//! - [`GameResult`] - typed view of a finished game
//!
//! Scoring follows Tromp-Taylor area rules: a player's score is the number
//! of points occupied by their stones plus the empty regions that border
//! only their stones. No prisoners are counted.
//!
//! # Example
//!
//! ```
//! use go_core::Color;
//! use go_engine::Game;
//!
//! let mut game = Game::with_size(9).unwrap();
//! game.set_komi(7.0);
//! game.play_gtp("b", "e5").unwrap();
//! assert_eq!(game.final_score(), 81.0 - 7.0);
//! assert_eq!(game.color_to_move(), Some(Color::White));
//! ```

mod board;
mod error;
mod game;

pub use board::Board;
pub use error::RuleError;
pub use game::{Game, GameResult, DEFAULT_BOARD_SIZE, DEFAULT_KOMI};
