//! Game execution logic for running matches between GTP Go engines.
//!
//! [`MatchRunner`] plays one game between two [`Agent`]s, relaying every
//! move to the opponent and, when one is supplied, to a referee [`Game`]
//! that validates moves and scores the final position.

use crate::gtp_client::{ClientError, GameSettings, GtpClient};
use go_core::{format_score, parse_score, Color, Move, Point};
use go_engine::{Game, RuleError};
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a match.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Communication with one of the engines failed.
    #[error("{color} engine: {source}")]
    Client {
        color: Color,
        #[source]
        source: ClientError,
    },
    /// An engine produced a move the referee rejects.
    #[error("{color} played illegal move {mv:?}: {source}")]
    IllegalMove {
        color: Color,
        mv: String,
        #[source]
        source: RuleError,
    },
    /// The referee could not be set up for the game.
    #[error("Referee setup failed: {0}")]
    Referee(#[source] RuleError),
    /// The game ended by passes but nobody could score it.
    #[error("No score available: no referee and no engine reported a usable score")]
    MissingScore,
}

/// A player the runner can drive.
///
/// [`GtpClient`] is the production implementation.
pub trait Agent {
    fn is_running(&self) -> bool;
    fn start(&mut self) -> Result<(), ClientError>;
    /// Display name, e.g. `GNU Go 3.8`.
    fn full_name(&mut self) -> Result<String, ClientError>;
    /// Prepares a new game; returns fixed handicap vertices, if any.
    fn init_game(&mut self, settings: &GameSettings) -> Result<Vec<String>, ClientError>;
    fn genmove(&mut self, color: Color) -> Result<String, ClientError>;
    fn play(&mut self, color: Color, mv: &str) -> Result<(), ClientError>;
    fn final_score(&mut self) -> Result<String, ClientError>;
}

impl Agent for GtpClient {
    fn is_running(&self) -> bool {
        GtpClient::is_running(self)
    }

    fn start(&mut self) -> Result<(), ClientError> {
        GtpClient::start(self)
    }

    fn full_name(&mut self) -> Result<String, ClientError> {
        GtpClient::full_name(self)
    }

    fn init_game(&mut self, settings: &GameSettings) -> Result<Vec<String>, ClientError> {
        GtpClient::init_game(self, settings)
    }

    fn genmove(&mut self, color: Color) -> Result<String, ClientError> {
        GtpClient::genmove(self, color)
    }

    fn play(&mut self, color: Color, mv: &str) -> Result<(), ClientError> {
        GtpClient::play(self, color, mv)
    }

    fn final_score(&mut self) -> Result<String, ClientError> {
        GtpClient::final_score(self)
    }
}

/// A single move as relayed between the engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub color: Color,
    /// Normalized GTP text: an uppercase vertex, `pass` or `resign`.
    #[serde(rename = "move")]
    pub mv: String,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Resignation,
    /// Two consecutive passes; the final position was scored.
    Score,
    /// The configured move limit was reached.
    MoveLimit,
}

/// The result of a completed game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub black_name: String,
    pub white_name: String,
    /// `None` for a drawn (jigo) or unscored game.
    pub winner: Option<Color>,
    /// Winning margin in points; `None` after a resignation.
    pub margin: Option<f64>,
    pub termination: Termination,
    pub moves: Vec<MoveRecord>,
    /// Score reported by the black engine's `final_score`, Black positive.
    pub black_score: Option<f64>,
    /// Score reported by the white engine's `final_score`, Black positive.
    pub white_score: Option<f64>,
}

impl MatchResult {
    /// Formats the result as a GTP score string (`B+R`, `W+3.5`, `0`).
    ///
    /// Unscored games show as `?`.
    pub fn score_string(&self) -> String {
        match (self.termination, self.winner, self.margin) {
            (Termination::Resignation, Some(Color::Black), _) => "B+R".to_string(),
            (Termination::Resignation, Some(Color::White), _) => "W+R".to_string(),
            (_, Some(Color::Black), Some(margin)) => format_score(margin),
            (_, Some(Color::White), Some(margin)) => format_score(-margin),
            (_, None, Some(_)) => format_score(0.0),
            _ => "?".to_string(),
        }
    }
}

/// Executes games between two agents.
///
/// # Example
///
/// ```ignore
/// let mut black = GtpClient::new("gnugo", vec!["--mode".into(), "gtp".into()]);
/// let mut white = GtpClient::new("./bot-random", vec![]);
/// let mut referee = Game::new();
/// let runner = MatchRunner::new(GameSettings::default());
/// let result = runner.run_match(&mut black, &mut white, Some(&mut referee))?;
/// println!("{}", result.score_string());
/// ```
#[derive(Debug, Clone)]
pub struct MatchRunner {
    settings: GameSettings,
    max_moves: Option<usize>,
}

impl MatchRunner {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            max_moves: None,
        }
    }

    /// Ends games after `max_moves` moves (passes included).
    pub fn with_max_moves(mut self, max_moves: Option<usize>) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Plays one game.
    ///
    /// Starts the agents if needed, initializes both (and the referee) with
    /// the runner's settings, then alternates `genmove` requests, relaying
    /// each move to the opponent and the referee. With a handicap, Black's
    /// handicap stones are placed on the referee and White moves first.
    ///
    /// # Errors
    ///
    /// Any client error aborts the match. A move rejected by the referee,
    /// or one that cannot be parsed, is [`MatchError::IllegalMove`].
    pub fn run_match<'a>(
        &self,
        black: &'a mut dyn Agent,
        white: &'a mut dyn Agent,
        mut referee: Option<&mut Game>,
    ) -> Result<MatchResult, MatchError> {
        let size = self.settings.board_size;
        let mut agents: [&mut dyn Agent; 2] = [black, white];

        for color in Color::ALL {
            let agent = &mut agents[color.index()];
            if !agent.is_running() {
                agent.start().map_err(client_error(color))?;
            }
        }
        let black_name = agents[0].full_name().map_err(client_error(Color::Black))?;
        let white_name = agents[1].full_name().map_err(client_error(Color::White))?;
        tracing::info!("Starting game: {} (B) vs {} (W)", black_name, white_name);

        let handicap = agents[0]
            .init_game(&self.settings)
            .map_err(client_error(Color::Black))?;
        let white_handicap = agents[1]
            .init_game(&self.settings)
            .map_err(client_error(Color::White))?;

        let stones = if self.settings.handicap > 0 {
            let stones = handicap_points(&handicap, size, Color::Black)?;
            let white_stones = handicap_points(&white_handicap, size, Color::White)?;
            if white_stones != stones {
                tracing::warn!(
                    "Handicap placements differ: black {:?}, white {:?}",
                    handicap,
                    white_handicap
                );
                return Err(MatchError::IllegalMove {
                    color: Color::White,
                    mv: white_handicap.join(" "),
                    source: RuleError::InvalidPoint(white_handicap.join(" ")),
                });
            }
            stones
        } else {
            Vec::new()
        };

        if let Some(game) = referee.as_deref_mut() {
            game.set_board_size(size).map_err(MatchError::Referee)?;
            game.set_komi(self.settings.komi);
            if !stones.is_empty() {
                game.place_handicap(&stones)
                    .map_err(|source| MatchError::IllegalMove {
                        color: Color::Black,
                        mv: handicap.join(" "),
                        source,
                    })?;
            }
        }

        let mut to_move = if self.settings.handicap > 0 {
            Color::White
        } else {
            Color::Black
        };
        let mut moves = Vec::new();
        let mut passes = 0;

        let termination = loop {
            if self.max_moves.is_some_and(|limit| moves.len() >= limit) {
                tracing::info!("Move limit reached after {} moves", moves.len());
                break Termination::MoveLimit;
            }

            let reply = agents[to_move.index()]
                .genmove(to_move)
                .map_err(client_error(to_move))?;
            let mv = Move::parse(&reply, size).map_err(|e| MatchError::IllegalMove {
                color: to_move,
                mv: reply.clone(),
                source: e.into(),
            })?;
            if let Some(game) = referee.as_deref_mut() {
                game.play(to_move, mv)
                    .map_err(|source| MatchError::IllegalMove {
                        color: to_move,
                        mv: reply.clone(),
                        source,
                    })?;
            }

            let text = mv.to_gtp(size);
            tracing::debug!("{} {}", to_move, text);
            moves.push(MoveRecord {
                color: to_move,
                mv: text.clone(),
            });

            if mv.is_resign() {
                break Termination::Resignation;
            }

            let opponent = to_move.opposite();
            agents[opponent.index()]
                .play(to_move, &text)
                .map_err(client_error(opponent))?;

            passes = if mv.is_pass() { passes + 1 } else { 0 };
            if passes >= 2 {
                break Termination::Score;
            }
            to_move = opponent;
        };

        let mut result = MatchResult {
            black_name,
            white_name,
            winner: None,
            margin: None,
            termination,
            moves,
            black_score: None,
            white_score: None,
        };

        if termination == Termination::Resignation {
            result.winner = Some(to_move.opposite());
            tracing::info!("{} resigned", to_move);
            return Ok(result);
        }

        let required = referee.is_none();
        result.black_score = self_score(&mut *agents[0], Color::Black, required)?;
        result.white_score = self_score(&mut *agents[1], Color::White, required)?;

        let score = match referee.as_deref() {
            Some(game) => Some(game.final_score()),
            None => agreed_score(result.black_score, result.white_score),
        };
        match score {
            Some(score) => {
                result.winner = winner_of(score);
                result.margin = Some(score.abs());
            }
            None if termination == Termination::Score => return Err(MatchError::MissingScore),
            None => {}
        }

        tracing::info!(
            "Game over after {} moves: {}",
            result.moves.len(),
            result.score_string()
        );
        Ok(result)
    }
}

fn client_error(color: Color) -> impl Fn(ClientError) -> MatchError {
    move |source| MatchError::Client { color, source }
}

/// Parses handicap vertices reported by `color`'s engine, in sorted order.
fn handicap_points(vertices: &[String], size: u8, color: Color) -> Result<Vec<Point>, MatchError> {
    let mut points = vertices
        .iter()
        .map(|v| Point::parse(v, size))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| MatchError::IllegalMove {
            color,
            mv: vertices.join(" "),
            source: e.into(),
        })?;
    points.sort();
    if points.windows(2).any(|w| w[0] == w[1]) {
        return Err(MatchError::IllegalMove {
            color,
            mv: vertices.join(" "),
            source: RuleError::InvalidPoint(vertices.join(" ")),
        });
    }
    Ok(points)
}

/// Asks an agent for its own score.
///
/// An unparsable score is logged and ignored. A failure response is only
/// tolerated when the score is not `required`; any other client error
/// aborts the match.
fn self_score(
    agent: &mut dyn Agent,
    color: Color,
    required: bool,
) -> Result<Option<f64>, MatchError> {
    match agent.final_score() {
        Ok(text) => match parse_score(&text) {
            Ok(score) => Ok(Some(score)),
            Err(e) => {
                tracing::warn!("{} engine reported unusable score: {}", color, e);
                Ok(None)
            }
        },
        Err(ClientError::Protocol(gtp::GtpError::Engine(msg))) if !required => {
            tracing::warn!("{} engine cannot score: {}", color, msg);
            Ok(None)
        }
        Err(source) => Err(MatchError::Client { color, source }),
    }
}

/// Combines the engines' self-reported scores.
///
/// When both report and disagree, Black's report wins.
fn agreed_score(black: Option<f64>, white: Option<f64>) -> Option<f64> {
    match (black, white) {
        (Some(b), Some(w)) => {
            if b != w {
                tracing::warn!(
                    "Engines disagree on the score: black says {}, white says {}",
                    format_score(b),
                    format_score(w)
                );
            }
            Some(b)
        }
        (b, w) => b.or(w),
    }
}

fn winner_of(score: f64) -> Option<Color> {
    if score > 0.0 {
        Some(Color::Black)
    } else if score < 0.0 {
        Some(Color::White)
    } else {
        None
    }
}
