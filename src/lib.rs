pub mod config;
pub mod matrix;
pub mod mcts;
pub mod search;

use pokemon_battle_core::error::EngineError;
use pokemon_battle_core::sim::{MoveChoice, State};
use std::time::Duration;
use tracing::debug;

pub use crate::config::{load_config, ExpectiminimaxConfig, MctsConfig, SearchConfig};
pub use crate::matrix::{pick_safest, PayoffMatrix};
pub use crate::mcts::{perform_mcts, perform_mcts_parallel, MctsResult, MctsSideResult};
pub use crate::search::{iterative_deepen_expectiminimax, IterativeDeepeningResult};

/// Stochastic search from `state` for `duration_ms` with default tuning.
pub fn monte_carlo_search(state: &State, duration_ms: u64) -> Result<MctsResult, EngineError> {
    monte_carlo_search_with(state, duration_ms, &MctsConfig::default())
}

pub fn monte_carlo_search_with(
    state: &State,
    duration_ms: u64,
    config: &MctsConfig,
) -> Result<MctsResult, EngineError> {
    state.validate()?;
    let (side_one_options, side_two_options) = state.get_all_options();
    let max_time = Duration::from_millis(duration_ms);
    debug!(
        s1 = side_one_options.len(),
        s2 = side_two_options.len(),
        duration_ms,
        threads = config.threads,
        "starting mcts"
    );
    let result = if config.threads > 1 {
        perform_mcts_parallel(state, side_one_options, side_two_options, max_time, config)
    } else {
        let mut scratch = state.clone();
        perform_mcts(&mut scratch, side_one_options, side_two_options, max_time, config)
    };
    Ok(result)
}

/// Exact search from `state` for `duration_ms` with default tuning.
pub fn iterative_deepening_search(
    state: &State,
    duration_ms: u64,
) -> Result<IterativeDeepeningResult, EngineError> {
    iterative_deepening_search_with(state, duration_ms, &ExpectiminimaxConfig::default())
}

pub fn iterative_deepening_search_with(
    state: &State,
    duration_ms: u64,
    config: &ExpectiminimaxConfig,
) -> Result<IterativeDeepeningResult, EngineError> {
    state.validate()?;
    let (side_one_options, side_two_options) = state.get_all_options();
    let mut scratch = state.clone();
    Ok(iterative_deepen_expectiminimax(
        &mut scratch,
        side_one_options,
        side_two_options,
        Duration::from_millis(duration_ms),
        config,
    ))
}

/// Side one's maximin option from an exact search result.
pub fn get_safest_action(result: &IterativeDeepeningResult) -> (MoveChoice, f32) {
    result.safest()
}
