//! Random move bot - plays a random legal move.
//!
//! This is the simplest possible GTP bot, useful as a template
//! for more sophisticated bots. It never fills its own single-point eyes
//! and passes when nothing else is left.

use clap::Parser;
use go_core::{format_score, Color, Move, Point};
use go_engine::Game;
use gtp::{stdio_engine, Command, KNOWN_COMMANDS, PROTOCOL_VERSION};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// GTP engine that plays random legal moves.
#[derive(Parser)]
#[command(name = "bot-random")]
#[command(about = "GTP Go bot that plays random legal moves")]
struct Args {
    /// Seed for the move generator
    #[arg(long)]
    seed: Option<u64>,
}

struct RandomBot {
    game: Game,
    rng: StdRng,
}

impl RandomBot {
    fn new(rng: StdRng) -> Self {
        Self {
            game: Game::new(),
            rng,
        }
    }

    /// Executes one command, returning the success payload or the failure
    /// message.
    fn handle(&mut self, command: &Command) -> Result<String, String> {
        let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
        match (command.verb.as_str(), args.as_slice()) {
            ("protocol_version", []) => Ok(PROTOCOL_VERSION.to_string()),
            ("name", []) => Ok("RandomBot".to_string()),
            ("version", []) => Ok(env!("CARGO_PKG_VERSION").to_string()),
            ("known_command", [verb]) => Ok(KNOWN_COMMANDS.contains(verb).to_string()),
            ("list_commands", []) => Ok(KNOWN_COMMANDS.join("\n")),
            ("quit", []) => Ok(String::new()),
            ("boardsize", [size]) => {
                let size: u8 = size.parse().map_err(|_| "boardsize not an integer")?;
                self.game
                    .set_board_size(size)
                    .map_err(|_| "unacceptable size".to_string())?;
                Ok(String::new())
            }
            ("clear_board", []) => {
                self.game.clear_board();
                Ok(String::new())
            }
            ("komi", [komi]) => {
                let komi: f64 = komi.parse().map_err(|_| "komi not a float")?;
                self.game.set_komi(komi);
                Ok(String::new())
            }
            ("play", [color, mv]) => {
                self.game
                    .play_gtp(color, mv)
                    .map_err(|e| format!("illegal move: {}", e))?;
                Ok(String::new())
            }
            ("genmove", [color]) => {
                let color = Color::parse(color).map_err(|e| e.to_string())?;
                let mv = self.choose_move(color);
                self.game.play(color, mv).map_err(|e| e.to_string())?;
                Ok(mv.to_gtp(self.game.size()))
            }
            ("final_score", []) => Ok(format_score(self.game.final_score())),
            ("showboard", []) => Ok(format!("\n{}", self.game)),
            ("time_settings", [main, byo_time, byo_stones]) => {
                for value in [main, byo_time, byo_stones] {
                    value.parse::<u32>().map_err(|_| "syntax error")?;
                }
                Ok(String::new())
            }
            ("fixed_handicap", [stones]) => {
                let stones: usize = stones.parse().map_err(|_| "handicap not an integer")?;
                let points = handicap_points(self.game.size(), stones)
                    .ok_or_else(|| "invalid number of stones".to_string())?;
                self.game
                    .place_handicap(&points)
                    .map_err(|_| "board not empty".to_string())?;
                let size = self.game.size();
                Ok(points
                    .iter()
                    .map(|p| p.to_vertex(size))
                    .collect::<Vec<_>>()
                    .join(" "))
            }
            (verb, _) if KNOWN_COMMANDS.contains(&verb) => Err("syntax error".to_string()),
            _ => Err("unknown command".to_string()),
        }
    }

    /// Picks a random legal placement outside our own eyes, or passes.
    fn choose_move(&mut self, color: Color) -> Move {
        let board = self.game.board();
        let candidates: Vec<Point> = board
            .points()
            .filter(|&p| board.get(p).is_none())
            .filter(|&p| !is_own_eye(&self.game, color, p))
            .filter(|&p| self.game.is_legal(color, p))
            .collect();
        candidates
            .choose(&mut self.rng)
            .map(|&p| Move::Place(p))
            .unwrap_or(Move::Pass)
    }
}

/// An empty point whose neighbors are all `color` stones.
fn is_own_eye(game: &Game, color: Color, point: Point) -> bool {
    point
        .neighbors(game.size())
        .all(|n| game.stone_at(n) == Some(color))
}

/// Fixed handicap placement for `stones` stones on a board of `size`.
///
/// Returns `None` when the board is too small or `stones` is outside the
/// range the board supports (2..=4 on even and 7x7 boards, 2..=9 otherwise).
fn handicap_points(size: u8, stones: usize) -> Option<Vec<Point>> {
    if size < 7 {
        return None;
    }
    let max = if size % 2 == 0 || size == 7 { 4 } else { 9 };
    if !(2..=max).contains(&stones) {
        return None;
    }

    let edge = if size >= 13 { 3 } else { 2 };
    let (lo, hi, mid) = (edge, size - 1 - edge, size / 2);
    let at = |column, row| Point::new(column, row, size);

    let mut coords = vec![(lo, lo), (hi, hi)];
    if stones >= 3 {
        coords.push((hi, lo));
    }
    if stones >= 4 {
        coords.push((lo, hi));
    }
    if stones >= 6 {
        coords.push((lo, mid));
        coords.push((hi, mid));
    }
    if stones >= 8 {
        coords.push((mid, lo));
        coords.push((mid, hi));
    }
    if stones % 2 == 1 && stones >= 5 {
        coords.push((mid, mid));
    }
    coords.into_iter().map(|(c, r)| at(c, r)).collect()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut bot = RandomBot::new(rng);
    let mut engine = stdio_engine();

    while let Some(command) = engine.read_command()? {
        match bot.handle(&command) {
            Ok(payload) => engine.send_success(&command, &payload)?,
            Err(message) => engine.send_failure(&command, &message)?,
        }
        if command.verb == "quit" {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot() -> RandomBot {
        RandomBot::new(StdRng::seed_from_u64(7))
    }

    fn run(bot: &mut RandomBot, line: &str) -> Result<String, String> {
        bot.handle(&Command::parse(line).unwrap())
    }

    #[test]
    fn identifies_itself() {
        let mut bot = bot();
        assert_eq!(run(&mut bot, "protocol_version"), Ok("2".to_string()));
        assert_eq!(run(&mut bot, "name"), Ok("RandomBot".to_string()));
        assert_eq!(run(&mut bot, "known_command genmove"), Ok("true".to_string()));
        assert_eq!(run(&mut bot, "known_command undo"), Ok("false".to_string()));
        let listed = run(&mut bot, "list_commands").unwrap();
        assert_eq!(listed.lines().count(), KNOWN_COMMANDS.len());
    }

    #[test]
    fn rejects_unknown_and_malformed_commands() {
        let mut bot = bot();
        assert_eq!(run(&mut bot, "undo"), Err("unknown command".to_string()));
        assert_eq!(run(&mut bot, "play b"), Err("syntax error".to_string()));
        assert!(run(&mut bot, "boardsize 3").is_err());
        assert!(run(&mut bot, "komi abc").is_err());
    }

    #[test]
    fn genmove_plays_on_its_own_board() {
        let mut bot = bot();
        run(&mut bot, "boardsize 9").unwrap();
        let reply = run(&mut bot, "genmove b").unwrap();
        let point = Point::parse(&reply, 9).unwrap();
        assert_eq!(bot.game.stone_at(point), Some(Color::Black));
        assert_eq!(bot.game.color_to_move(), Some(Color::White));
    }

    #[test]
    fn relayed_moves_are_validated() {
        let mut bot = bot();
        run(&mut bot, "boardsize 9").unwrap();
        run(&mut bot, "play b e5").unwrap();
        assert!(run(&mut bot, "play w e5").is_err());
    }

    #[test]
    fn passes_when_only_eyes_remain() {
        let mut bot = bot();
        run(&mut bot, "boardsize 5").unwrap();
        // Black fills everything except two single-point eyes.
        let points: Vec<Point> = bot.game.board().points().collect();
        for point in points {
            let vertex = point.to_vertex(5);
            if vertex != "A1" && vertex != "E5" {
                run(&mut bot, &format!("play b {}", vertex)).unwrap();
            }
        }
        assert_eq!(run(&mut bot, "genmove b"), Ok("pass".to_string()));
    }

    #[test]
    fn scores_and_shows_the_board() {
        let mut bot = bot();
        run(&mut bot, "boardsize 9").unwrap();
        run(&mut bot, "komi 7.5").unwrap();
        assert_eq!(run(&mut bot, "final_score"), Ok("W+7.5".to_string()));
        run(&mut bot, "play b e5").unwrap();
        assert_eq!(run(&mut bot, "final_score"), Ok("B+73.5".to_string()));
        let board = run(&mut bot, "showboard").unwrap();
        assert!(board.contains('X'));
    }

    #[test]
    fn fixed_handicap_places_standard_points() {
        let mut bot = bot();
        assert_eq!(
            run(&mut bot, "fixed_handicap 4"),
            Ok("D4 Q16 Q4 D16".to_string())
        );
        assert_eq!(bot.game.color_to_move(), Some(Color::White));
        assert!(run(&mut bot, "fixed_handicap 2").is_err());

        run(&mut bot, "boardsize 9").unwrap();
        assert_eq!(
            run(&mut bot, "fixed_handicap 5"),
            Ok("C3 G7 G3 C7 E5".to_string())
        );
    }

    #[test]
    fn handicap_limits_depend_on_board() {
        assert!(handicap_points(19, 1).is_none());
        assert_eq!(handicap_points(19, 9).map(|p| p.len()), Some(9));
        assert!(handicap_points(19, 10).is_none());
        assert!(handicap_points(10, 5).is_none());
        assert!(handicap_points(7, 5).is_none());
        assert!(handicap_points(5, 2).is_none());
    }

    #[test]
    fn time_settings_are_accepted() {
        let mut bot = bot();
        assert_eq!(run(&mut bot, "time_settings 0 1 1"), Ok(String::new()));
        assert!(run(&mut bot, "time_settings 0 x 1").is_err());
    }
}
