//! GTP score strings.
//!
//! Scores are signed from Black's point of view: positive means Black is
//! ahead. GTP writes them as `B+3.5`, `W+0.5` or `0`, with `R` (or
//! `Resign`) standing in for the margin of a resignation.

use crate::CoordError;

/// Score reported for a game decided by resignation.
///
/// Larger than any area margin on the largest supported board.
pub const RESIGNATION_SCORE: f64 = 10_000.0;

/// Formats a signed score as a GTP `final_score` payload.
pub fn format_score(score: f64) -> String {
    if score == 0.0 {
        return "0".to_string();
    }
    let winner = if score > 0.0 { 'B' } else { 'W' };
    let margin = score.abs();
    if margin >= RESIGNATION_SCORE {
        format!("{}+R", winner)
    } else {
        format!("{}+{}", winner, margin)
    }
}

/// Parses a GTP `final_score` payload into a signed score.
pub fn parse_score(s: &str) -> Result<f64, CoordError> {
    let invalid = || CoordError::InvalidScore(s.to_string());
    let trimmed = s.trim();
    if trimmed == "0"
        || trimmed.eq_ignore_ascii_case("draw")
        || trimmed.eq_ignore_ascii_case("jigo")
    {
        return Ok(0.0);
    }
    let (winner, margin) = trimmed.split_once('+').ok_or_else(invalid)?;
    let sign = match winner.to_ascii_uppercase().as_str() {
        "B" => 1.0,
        "W" => -1.0,
        _ => return Err(invalid()),
    };
    if margin.eq_ignore_ascii_case("r") || margin.eq_ignore_ascii_case("resign") {
        return Ok(sign * RESIGNATION_SCORE);
    }
    let margin: f64 = margin.parse().map_err(|_| invalid())?;
    if !margin.is_finite() || margin < 0.0 {
        return Err(invalid());
    }
    Ok(sign * margin)
}
