use anyhow::Context;
use pokemon_battle_core::engine::{calculate_damage, generate_instructions};
use pokemon_battle_core::evaluate::evaluate;
use pokemon_battle_core::sim::State;
use pokemon_battle_search::config::load_config_or_default;
use pokemon_battle_search::{iterative_deepening_search_with, monte_carlo_search_with};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-battle-search <generate-instructions|calculate-damage|mcts|iterative-deepening|evaluate> \
(--state STATE | --state-file PATH) [--config config.json] [--ms MS] [--seed SEED] [--threads N] \
[--max-depth D] [--no-prune] [--s1 ACTION] [--s2 ACTION] [--s2-first]"
    );
    std::process::exit(1);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    GenerateInstructions,
    CalculateDamage,
    Mcts,
    IterativeDeepening,
    Evaluate,
}

#[derive(Debug)]
struct CliOptions {
    command: Command,
    state: String,
    config_path: Option<PathBuf>,
    duration_ms: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    max_depth: Option<u8>,
    ab_prune: bool,
    side_one: String,
    side_two: String,
    side_one_moves_first: bool,
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut args = env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("generate-instructions") => Command::GenerateInstructions,
        Some("calculate-damage") => Command::CalculateDamage,
        Some("mcts") => Command::Mcts,
        Some("iterative-deepening") => Command::IterativeDeepening,
        Some("evaluate") => Command::Evaluate,
        Some("--help") | Some("-h") | None => usage(),
        Some(other) => anyhow::bail!("Unknown command {other}"),
    };

    let mut state = None;
    let mut config_path = None;
    let mut duration_ms = 100u64;
    let mut seed = None;
    let mut threads = None;
    let mut max_depth = None;
    let mut ab_prune = true;
    let mut side_one = None;
    let mut side_two = None;
    let mut side_one_moves_first = true;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state" => {
                state = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--state requires a serialized state"))?,
                );
            }
            "--state-file" => {
                let path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow::anyhow!("--state-file requires a path"))?;
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read state file at {}", path.display()))?;
                state = Some(raw);
            }
            "--config" => {
                config_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--config requires a path (e.g. --config search.json)")
                })?);
            }
            "--ms" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--ms requires milliseconds"))?;
                duration_ms = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = Some(val.parse()?);
            }
            "--threads" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--threads requires a number"))?;
                threads = Some(val.parse()?);
            }
            "--max-depth" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-depth requires a number"))?;
                max_depth = Some(val.parse()?);
            }
            "--no-prune" => ab_prune = false,
            "--s1" => {
                side_one = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--s1 requires an action"))?,
                );
            }
            "--s2" => {
                side_two = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--s2 requires an action"))?,
                );
            }
            "--s2-first" => side_one_moves_first = false,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let needs_actions = matches!(
        command,
        Command::GenerateInstructions | Command::CalculateDamage
    );
    if needs_actions && (side_one.is_none() || side_two.is_none()) {
        anyhow::bail!("{command:?} requires --s1 and --s2");
    }

    Ok(CliOptions {
        command,
        state: state.ok_or_else(|| anyhow::anyhow!("--state or --state-file is required"))?,
        config_path,
        duration_ms,
        seed,
        threads,
        max_depth,
        ab_prune,
        side_one: side_one.unwrap_or_default(),
        side_two: side_two.unwrap_or_default(),
        side_one_moves_first,
    })
}

fn run(opts: CliOptions) -> anyhow::Result<serde_json::Value> {
    let state = State::deserialize(&opts.state).context("Failed to decode state")?;
    let mut config = load_config_or_default(opts.config_path.as_deref())?;
    if let Some(seed) = opts.seed {
        config.mcts.seed = Some(seed);
    }
    if let Some(threads) = opts.threads {
        config.mcts.threads = threads;
    }
    if let Some(depth) = opts.max_depth {
        config.expectiminimax.max_depth = Some(depth);
    }
    config.expectiminimax.ab_prune &= opts.ab_prune;
    config.validate()?;

    let output = match opts.command {
        Command::GenerateInstructions => {
            let branches = generate_instructions(&state, &opts.side_one, &opts.side_two)?;
            serde_json::to_value(branches)?
        }
        Command::CalculateDamage => {
            let (one, two) = calculate_damage(
                &state,
                &opts.side_one,
                &opts.side_two,
                opts.side_one_moves_first,
            )?;
            json!({ "side_one": one, "side_two": two })
        }
        Command::Mcts => {
            let result = monte_carlo_search_with(&state, opts.duration_ms, &config.mcts)?;
            serde_json::to_value(result)?
        }
        Command::IterativeDeepening => {
            let result =
                iterative_deepening_search_with(&state, opts.duration_ms, &config.expectiminimax)?;
            let (safest, value) = result.safest();
            json!({ "result": result, "safest": safest, "safest_value": value })
        }
        Command::Evaluate => json!({ "evaluation": evaluate(&state) }),
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pokemon_battle_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = parse_args()?;
    let output = run(opts)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
