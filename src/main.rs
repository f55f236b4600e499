//! Headless Gem Cascade runner (default binary).
//!
//! Generates a board and auto-plays the first predicted move each turn, acknowledging
//! every animation request immediately. Configuration comes from `GEM_CASCADE_*`
//! environment variables; `--turns` and `--seed` override on the command line.
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every match.

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gem_cascade::core::{EngineConfig, GameBoard};

const DEFAULT_TURNS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AutoplayConfig {
    turns: u32,
    seed: Option<u32>,
}

fn parse_autoplay_args(args: &[String]) -> Result<AutoplayConfig> {
    let mut turns = DEFAULT_TURNS;
    let mut seed = None;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--turns" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --turns"))?;
                turns = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --turns value: {}", v))?;
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(AutoplayConfig { turns, seed })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let autoplay = parse_autoplay_args(&args)?;

    let mut config = EngineConfig::from_env()?;
    if let Some(seed) = autoplay.seed {
        config = config.with_seed(seed);
    }

    run(config, autoplay.turns)
}

fn run(config: EngineConfig, turns: u32) -> Result<()> {
    let size = config.tile_count;
    let mut board = GameBoard::new(config)?;
    let attempts = board.generate()?;
    info!(attempts, "board ready");

    for turn in 1..=turns {
        let Some(mv) = board.possible_moves().first().copied() else {
            return Err(anyhow!("no move available on turn {}", turn));
        };
        let target = mv
            .target(size)
            .ok_or_else(|| anyhow!("predicted move {:?} leaves the board", mv))?;

        let outcome = board.try_swap(mv.origin, target)?;
        let played = board.settle()?;
        info!(
            turn,
            accepted = outcome.accepted,
            rounds = outcome.rounds,
            points = outcome.points,
            played,
            "turn played"
        );
    }

    print!("{}", board.field());
    println!(
        "score: {}  turns: {}  reshuffles: {}",
        board.score(),
        board.turns(),
        board.reshuffles()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_autoplay_args_uses_defaults() {
        let cfg = parse_autoplay_args(&[]).unwrap();
        assert_eq!(
            cfg,
            AutoplayConfig {
                turns: DEFAULT_TURNS,
                seed: None
            }
        );
    }

    #[test]
    fn parse_autoplay_args_parses_turns_and_seed() {
        let cfg = parse_autoplay_args(&args(&["--turns", "5", "--seed", "42"])).unwrap();
        assert_eq!(
            cfg,
            AutoplayConfig {
                turns: 5,
                seed: Some(42)
            }
        );
    }

    #[test]
    fn parse_autoplay_args_rejects_bad_input() {
        assert!(parse_autoplay_args(&args(&["--turns"])).is_err());
        assert!(parse_autoplay_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_autoplay_args(&args(&["--speed"])).is_err());
    }

    #[test]
    fn run_plays_requested_turns() {
        run(EngineConfig::default().with_seed(3), 3).unwrap();
    }
}
