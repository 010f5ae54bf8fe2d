//! Full game management with history tracking.
//!
//! The [`Game`] struct is the referee's view of a game:
//! - Board state, komi and side to move
//! - Consecutive passes and resignation
//! - Every prior full-board position, for repetition detection
//! - Area scoring

use crate::{Board, RuleError};
use go_core::{Color, Move, Point, RESIGNATION_SCORE};
use std::collections::HashSet;
use std::fmt;

/// Board side used by [`Game::new`].
pub const DEFAULT_BOARD_SIZE: u8 = 19;

/// Komi used by [`Game::new`].
pub const DEFAULT_KOMI: f64 = 7.5;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameResult {
    /// One side resigned; the other side wins.
    Resignation { winner: Color },
    /// The game was scored. Positive scores favor Black.
    Score(f64),
}

impl GameResult {
    /// Returns the winning color, or `None` for a drawn (jigo) score.
    pub fn winner(&self) -> Option<Color> {
        match *self {
            GameResult::Resignation { winner } => Some(winner),
            GameResult::Score(score) if score > 0.0 => Some(Color::Black),
            GameResult::Score(score) if score < 0.0 => Some(Color::White),
            GameResult::Score(_) => None,
        }
    }

    /// Returns the winning margin for scored games.
    pub fn margin(&self) -> Option<f64> {
        match *self {
            GameResult::Resignation { .. } => None,
            GameResult::Score(score) => Some(score.abs()),
        }
    }
}

/// A Go game with positional superko and Tromp-Taylor scoring.
///
/// The game is `InProgress` until two consecutive passes or a resignation,
/// after which it is `Finished` and rejects further moves until the board is
/// cleared or resized.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current position.
    board: Board,
    /// Score compensation for White.
    komi: f64,
    /// Number of consecutive passes.
    passes: u32,
    /// Color that resigned, if any.
    resigned: Option<Color>,
    /// Color expected to move next.
    to_move: Color,
    /// Positions that occurred before the current one.
    history: HashSet<Board>,
    /// Number of moves accepted since the last reset.
    move_count: usize,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a 19x19 game with komi 7.5.
    pub fn new() -> Self {
        Game {
            board: Board::new(DEFAULT_BOARD_SIZE)
                .unwrap_or_else(|_| unreachable!("default size is supported")),
            komi: DEFAULT_KOMI,
            passes: 0,
            resigned: None,
            to_move: Color::Black,
            history: HashSet::new(),
            move_count: 0,
        }
    }

    /// Creates a game on a board of side `size` with the default komi.
    pub fn with_size(size: u8) -> Result<Self, RuleError> {
        let mut game = Game::new();
        game.set_board_size(size)?;
        Ok(game)
    }

    /// Returns the board side.
    pub fn size(&self) -> u8 {
        self.board.size()
    }

    /// Returns the current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the komi.
    pub fn komi(&self) -> f64 {
        self.komi
    }

    /// Returns the number of consecutive passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Returns the color that resigned, if any.
    pub fn resigned(&self) -> Option<Color> {
        self.resigned
    }

    /// Returns the number of moves accepted since the last reset.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Returns the stone on `point`.
    pub fn stone_at(&self, point: Point) -> Option<Color> {
        self.board.get(point)
    }

    /// Changes the board size, clearing the board and all history.
    pub fn set_board_size(&mut self, size: u8) -> Result<(), RuleError> {
        self.board = Board::new(size)?;
        self.reset();
        Ok(())
    }

    /// Clears the board, the pass and resignation state and all history.
    pub fn clear_board(&mut self) {
        self.board = Board::new(self.board.size())
            .unwrap_or_else(|_| unreachable!("current size is supported"));
        self.reset();
    }

    fn reset(&mut self) {
        self.passes = 0;
        self.resigned = None;
        self.to_move = Color::Black;
        self.history.clear();
        self.move_count = 0;
    }

    /// Sets the komi. Does not reset the game.
    pub fn set_komi(&mut self, komi: f64) {
        self.komi = komi;
    }

    /// Returns true once a side resigned or both sides passed in a row.
    pub fn finished(&self) -> bool {
        self.resigned.is_some() || self.passes >= 2
    }

    /// Returns the color to move, or `None` if the game has finished.
    pub fn color_to_move(&self) -> Option<Color> {
        if self.finished() {
            None
        } else {
            Some(self.to_move)
        }
    }

    /// Places fixed handicap stones for Black; White moves next.
    ///
    /// Only allowed before any move has been played on an empty board.
    pub fn place_handicap(&mut self, points: &[Point]) -> Result<(), RuleError> {
        if self.move_count > 0 || self.passes > 0 || self.finished() || !self.board.is_empty() {
            return Err(RuleError::HandicapNotAllowed);
        }
        let mut board = self.board.clone();
        for &point in points {
            if !board.contains(point) {
                return Err(RuleError::InvalidPoint(format!("{:?}", point)));
            }
            if board.get(point).is_some() {
                return Err(RuleError::OccupiedPoint(point.to_vertex(self.size())));
            }
            board.set(point, Some(Color::Black));
        }
        self.board = board;
        self.to_move = Color::White;
        Ok(())
    }

    /// Plays a move given as GTP color and move arguments.
    pub fn play_gtp(&mut self, color: &str, mv: &str) -> Result<(), RuleError> {
        let color = Color::parse(color)?;
        let mv = Move::parse(mv, self.size())?;
        self.play(color, mv)
    }

    /// Plays a move for `color`.
    ///
    /// Either color may play regardless of whose turn it is; the side to move
    /// afterwards is the opposite of `color`. A rejected move leaves the
    /// game unchanged.
    pub fn play(&mut self, color: Color, mv: Move) -> Result<(), RuleError> {
        if self.finished() {
            return Err(RuleError::GameFinished);
        }
        match mv {
            Move::Pass => {
                self.passes += 1;
                self.to_move = color.opposite();
            }
            Move::Resign => {
                self.resigned = Some(color);
            }
            Move::Place(point) => {
                let next = self.resolve_placement(color, point)?;
                let previous = std::mem::replace(&mut self.board, next);
                self.history.insert(previous);
                self.passes = 0;
                self.resigned = None;
                self.to_move = color.opposite();
            }
        }
        self.move_count += 1;
        Ok(())
    }

    /// Returns true if `color` may place a stone on `point`.
    pub fn is_legal(&self, color: Color, point: Point) -> bool {
        !self.finished() && self.resolve_placement(color, point).is_ok()
    }

    /// Computes the board after `color` plays on `point`, with captures.
    fn resolve_placement(&self, color: Color, point: Point) -> Result<Board, RuleError> {
        if !self.board.contains(point) {
            return Err(RuleError::InvalidPoint(format!("{:?}", point)));
        }
        if self.board.get(point).is_some() {
            return Err(RuleError::OccupiedPoint(point.to_vertex(self.size())));
        }

        let mut next = self.board.clone();
        next.set(point, Some(color));
        let opponent = color.opposite();
        for neighbor in point.neighbors(self.size()) {
            next.capture_group(neighbor, opponent);
        }
        next.capture_group(point, color);

        if self.history.contains(&next) {
            return Err(RuleError::RepeatedPosition);
        }
        Ok(next)
    }

    /// Returns Black's score minus White's score, komi included.
    ///
    /// After a resignation the result is [`RESIGNATION_SCORE`], positive if
    /// White resigned and negative if Black resigned.
    pub fn final_score(&self) -> f64 {
        match self.resigned {
            Some(Color::Black) => -RESIGNATION_SCORE,
            Some(Color::White) => RESIGNATION_SCORE,
            None => {
                let area = self.board.area_counts();
                area[Color::Black.index()] as f64 - area[Color::White.index()] as f64 - self.komi
            }
        }
    }

    /// Returns the result once the game has finished.
    pub fn result(&self) -> Option<GameResult> {
        if !self.finished() {
            return None;
        }
        Some(match self.resigned {
            Some(color) => GameResult::Resignation {
                winner: color.opposite(),
            },
            None => GameResult::Score(self.final_score()),
        })
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
