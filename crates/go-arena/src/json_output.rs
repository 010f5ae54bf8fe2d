//! JSON records for finished games.
//!
//! Each game becomes one JSON object with the players, the result and the
//! full move list, suitable for line-oriented logs (one record per line).

use crate::match_runner::{MatchResult, MoveRecord, Termination};
use chrono::Utc;
use go_core::Color;
use serde::Serialize;

/// JSON representation of a complete game.
#[derive(Serialize)]
struct GameJson<'a> {
    /// Unique identifier for the game.
    id: &'a str,
    /// Configured name of the engine playing black.
    black: &'a str,
    /// Configured name of the engine playing white.
    white: &'a str,
    /// Names the engines reported for themselves.
    black_engine: &'a str,
    white_engine: &'a str,
    /// GTP score string, e.g. `B+3.5` or `W+R`.
    result: String,
    winner: Option<Color>,
    margin: Option<f64>,
    termination: Termination,
    #[serde(skip_serializing_if = "Option::is_none")]
    black_self_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    white_self_score: Option<f64>,
    moves: &'a [MoveRecord],
    /// RFC 3339 timestamp when the record was created.
    created_at: String,
}

/// Serializes a finished game as a single-line JSON record.
///
/// `black` and `white` are the names the engines were launched under.
pub fn game_json(
    id: &str,
    black: &str,
    white: &str,
    result: &MatchResult,
) -> serde_json::Result<String> {
    let json = GameJson {
        id,
        black,
        white,
        black_engine: &result.black_name,
        white_engine: &result.white_name,
        result: result.score_string(),
        winner: result.winner,
        margin: result.margin,
        termination: result.termination,
        black_self_score: result.black_score,
        white_self_score: result.white_score,
        moves: &result.moves,
        created_at: Utc::now().to_rfc3339(),
    };
    serde_json::to_string(&json)
}
