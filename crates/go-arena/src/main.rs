use clap::{Parser, Subcommand};
use go_arena::config::{ArenaConfig, ConfigError, EngineConfig, PresetConfig};
use go_arena::json_output;
use go_arena::match_runner::{MatchError, MatchResult, MatchRunner};
use go_core::Color;
use go_engine::Game;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;

#[derive(Parser)]
#[command(name = "go-arena")]
#[command(about = "Go engine match runner")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "arena.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a match between two engines; colors alternate every game
    Match {
        /// Engine playing black in the first game
        black: String,
        /// Engine playing white in the first game
        white: String,
        /// Number of games to play (overrides the preset)
        #[arg(short, long)]
        games: Option<u32>,
        /// Preset configuration to use
        #[arg(short, long)]
        preset: Option<String>,
        /// Trust the engines' own scores instead of refereeing
        #[arg(long)]
        no_referee: bool,
        /// Print one JSON record per game
        #[arg(long)]
        json: bool,
    },
    /// List configured engines
    Engines,
}

/// Wins per engine, in command-line order.
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    wins: [u32; 2],
    draws: u32,
    errors: u32,
}

impl Tally {
    /// Credits a finished game; `black_slot` is the command-line position of
    /// the engine that played black.
    fn record(&mut self, black_slot: usize, result: &MatchResult) {
        match result.winner {
            Some(Color::Black) => self.wins[black_slot] += 1,
            Some(Color::White) => self.wins[1 - black_slot] += 1,
            None => self.draws += 1,
        }
    }
}

/// Picks the preset and applies command-line overrides.
fn resolve_preset(
    config: &ArenaConfig,
    preset: Option<&str>,
    games: Option<u32>,
    no_referee: bool,
) -> Result<PresetConfig, ConfigError> {
    let mut resolved = match preset {
        Some(name) => config.get_preset(name)?.clone(),
        None => PresetConfig::default(),
    };
    if let Some(games) = games {
        resolved.games = games;
    }
    if no_referee {
        resolved.referee = false;
    }
    Ok(resolved)
}

/// Plays one game with freshly started engines.
fn play_game(
    black: &EngineConfig,
    white: &EngineConfig,
    preset: &PresetConfig,
) -> Result<MatchResult, MatchError> {
    let mut black = black.client();
    let mut white = white.client();
    let mut referee = preset.referee.then(Game::new);
    let runner = MatchRunner::new(preset.settings()).with_max_moves(preset.max_moves);
    let result = runner.run_match(&mut black, &mut white, referee.as_mut());
    black.stop();
    white.stop();
    result
}

async fn run_match(
    config: &ArenaConfig,
    names: [String; 2],
    preset: PresetConfig,
    json: bool,
) -> anyhow::Result<Tally> {
    let engines = [
        config.resolve_engine(&names[0]),
        config.resolve_engine(&names[1]),
    ];

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received, finishing current game");
            shutdown_clone.store(true, Ordering::SeqCst);
        }
    });

    tracing::info!(
        "Running {} games: {} vs {}",
        preset.games,
        names[0],
        names[1]
    );

    let mut tally = Tally::default();
    for game in 0..preset.games {
        if shutdown.load(Ordering::SeqCst) {
            tracing::info!("Stopping after {} games", game);
            break;
        }

        let black_slot = (game % 2) as usize;
        let white_slot = 1 - black_slot;
        let black = engines[black_slot].clone();
        let white = engines[white_slot].clone();
        let settings = preset.clone();
        let outcome =
            tokio::task::spawn_blocking(move || play_game(&black, &white, &settings)).await?;

        match outcome {
            Ok(result) => {
                tally.record(black_slot, &result);
                if json {
                    let id = uuid::Uuid::new_v4().to_string();
                    let line = json_output::game_json(
                        &id,
                        &names[black_slot],
                        &names[white_slot],
                        &result,
                    )?;
                    println!("{}", line);
                } else {
                    println!(
                        "Game {}: {} (B) vs {} (W): {} ({} moves)",
                        game + 1,
                        names[black_slot],
                        names[white_slot],
                        result.score_string(),
                        result.moves.len()
                    );
                }
            }
            Err(e) => {
                tracing::error!("Game {} failed: {}", game + 1, e);
                tally.errors += 1;
            }
        }
    }
    Ok(tally)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = ArenaConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Match {
            black,
            white,
            games,
            preset,
            no_referee,
            json,
        } => {
            let preset = resolve_preset(&config, preset.as_deref(), games, no_referee)?;
            let names = [black, white];
            let tally = run_match(&config, names.clone(), preset, json).await?;
            if !json {
                println!(
                    "\nSession Results: {} {} - {} {} ({} draws, {} errors)",
                    names[0], tally.wins[0], tally.wins[1], names[1], tally.draws, tally.errors
                );
            }
        }
        Commands::Engines => {
            if config.engines.is_empty() {
                println!("No engines configured in {}", cli.config.display());
            }
            for (name, engine) in &config.engines {
                println!(
                    "{}: {} {}",
                    name,
                    engine.command.display(),
                    engine.args.join(" ")
                );
            }
        }
    }
    Ok(())
}
