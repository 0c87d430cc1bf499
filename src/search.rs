//! Depth-limited expectiminimax over joint actions, deepened until a time
//! budget runs out.

use pokemon_battle_core::evaluate::evaluate;
use pokemon_battle_core::sim::{generate_instructions_from_move_pair, MoveChoice, State};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::ExpectiminimaxConfig;
use crate::matrix::{pick_safest, row_minimums, PayoffMatrix};

/// Deepening stops here regardless of the time left.
const DEPTH_LIMIT: u8 = 64;

/// Point in time after which a search gives up at the next node.
#[derive(Clone, Copy, Debug)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Deadline(Instant::now().checked_add(budget))
    }

    pub fn never() -> Self {
        Deadline(None)
    }

    pub fn expired(&self) -> bool {
        self.0.map_or(false, |at| Instant::now() >= at)
    }
}

/// The deadline passed before the tree was complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

/// Payoff of every `(side one, side two)` option pair, row-major, searched
/// `depth` turns deep. Cells skipped by pruning are `None`.
///
/// `state` is restored before returning, also when aborting.
pub fn expectiminimax_search(
    state: &mut State,
    depth: u8,
    side_one_options: &[MoveChoice],
    side_two_options: &[MoveChoice],
    ab_prune: bool,
    deadline: &Deadline,
) -> Result<Vec<Option<f32>>, Aborted> {
    if deadline.expired() {
        return Err(Aborted);
    }
    let remaining = depth.saturating_sub(1);
    let cells = side_one_options.len() * side_two_options.len();

    let over = state.battle_is_over();
    if over != 0.0 {
        let value = 100.0 * remaining as f32 * over + evaluate(state);
        return Ok(vec![Some(value); cells]);
    }

    let mut matrix = Vec::with_capacity(cells);
    let mut alpha = f32::MIN;
    for side_one_move in side_one_options {
        let mut beta = f32::MAX;
        let mut skip = false;
        for side_two_move in side_two_options {
            if skip {
                matrix.push(None);
                continue;
            }
            let score = joint_action_value(
                state,
                remaining,
                side_one_move,
                side_two_move,
                deadline,
            )?;
            matrix.push(Some(score));
            if ab_prune {
                beta = beta.min(score);
                if score <= alpha {
                    skip = true;
                }
            }
        }
        if ab_prune && beta > alpha {
            alpha = beta;
        }
    }
    Ok(matrix)
}

/// Expected value of one joint action over its branches.
fn joint_action_value(
    state: &mut State,
    remaining: u8,
    side_one_move: &MoveChoice,
    side_two_move: &MoveChoice,
    deadline: &Deadline,
) -> Result<f32, Aborted> {
    let branches = generate_instructions_from_move_pair(state, side_one_move, side_two_move);
    let mut score = 0.0;
    for branch in &branches {
        state.apply_instructions(&branch.instruction_list);
        let value = if remaining == 0 {
            Ok(evaluate(state))
        } else {
            subgame_value(state, remaining, deadline)
        };
        state.reverse_instructions(&branch.instruction_list);
        score += branch.percentage * value?;
    }
    Ok(score)
}

fn subgame_value(state: &mut State, depth: u8, deadline: &Deadline) -> Result<f32, Aborted> {
    let (side_one_options, side_two_options) = state.get_all_options();
    // Pruning never changes the maximin value of a sub-game.
    let matrix = expectiminimax_search(
        state,
        depth,
        &side_one_options,
        &side_two_options,
        true,
        deadline,
    )?;
    Ok(pick_safest(&matrix, side_one_options.len(), side_two_options.len()).1)
}

#[derive(Clone, Debug, Serialize)]
pub struct IterativeDeepeningResult {
    /// Side one's options in the row order of `matrix`.
    pub s1_options: Vec<MoveChoice>,
    pub s2_options: Vec<MoveChoice>,
    pub matrix: PayoffMatrix,
    pub depth_searched: u8,
}

impl IterativeDeepeningResult {
    /// Side one's maximin option and its guaranteed payoff.
    pub fn safest(&self) -> (MoveChoice, f32) {
        let (index, value) = self.matrix.safest();
        let choice = self.s1_options.get(index).copied().unwrap_or(MoveChoice::None);
        (choice, value)
    }
}

/// Side one's options sorted by descending row minimum, so strong rows are
/// searched first and raise the pruning bound early.
fn reorder_by_row_minimum(
    matrix: &[Option<f32>],
    side_one_options: &[MoveChoice],
    cols: usize,
) -> Vec<MoveChoice> {
    let minimums = row_minimums(matrix, side_one_options.len(), cols);
    let mut ranked: Vec<(MoveChoice, f32)> = side_one_options
        .iter()
        .zip(minimums)
        .map(|(choice, minimum)| (*choice, minimum.unwrap_or(f32::MIN)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(choice, _)| choice).collect()
}

/// Searches depth 1 to completion, then deeper levels until the budget
/// expires, and returns the deepest completed matrix.
pub fn iterative_deepen_expectiminimax(
    state: &mut State,
    side_one_options: Vec<MoveChoice>,
    side_two_options: Vec<MoveChoice>,
    max_time: Duration,
    config: &ExpectiminimaxConfig,
) -> IterativeDeepeningResult {
    let start = Instant::now();
    let deadline = Deadline::after(max_time);
    let cols = side_two_options.len();
    let max_depth = config.max_depth.unwrap_or(DEPTH_LIMIT).clamp(1, DEPTH_LIMIT);

    let first = expectiminimax_search(
        state,
        1,
        &side_one_options,
        &side_two_options,
        config.ab_prune,
        &Deadline::never(),
    )
    .unwrap_or_else(|_| vec![None; side_one_options.len() * cols]);
    let mut best = IterativeDeepeningResult {
        matrix: PayoffMatrix::from_search(side_one_options.len(), cols, first),
        s1_options: side_one_options,
        s2_options: side_two_options,
        depth_searched: 1,
    };
    debug!(depth = 1, elapsed_ms = start.elapsed().as_millis() as u64, "depth completed");

    while best.depth_searched < max_depth && !deadline.expired() {
        let depth = best.depth_searched + 1;
        let s1_options = reorder_by_row_minimum(best.matrix.values(), &best.s1_options, cols);
        match expectiminimax_search(
            state,
            depth,
            &s1_options,
            &best.s2_options,
            config.ab_prune,
            &deadline,
        ) {
            Ok(matrix) => {
                trace!(
                    depth,
                    pruned = matrix.iter().filter(|v| v.is_none()).count(),
                    "pruned cells"
                );
                best.matrix = PayoffMatrix::from_search(s1_options.len(), cols, matrix);
                best.s1_options = s1_options;
                best.depth_searched = depth;
                debug!(
                    depth,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "depth completed"
                );
            }
            Err(Aborted) => {
                debug!(depth, "deadline reached, keeping previous depth");
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_deadline_does_not_expire() {
        assert!(!Deadline::never().expired());
        assert!(Deadline::after(Duration::ZERO).expired());
    }

    #[test]
    fn expired_deadline_aborts_immediately() {
        let mut state = State::default();
        let result = expectiminimax_search(
            &mut state,
            2,
            &[MoveChoice::None],
            &[MoveChoice::None],
            true,
            &Deadline::after(Duration::ZERO),
        );
        assert_eq!(result, Err(Aborted));
    }

    #[test]
    fn finished_battle_scores_by_remaining_depth() {
        let mut state = State::default();
        for pokemon in state.side_two.pokemon.iter_mut() {
            pokemon.hp = 0;
        }
        let matrix = expectiminimax_search(
            &mut state,
            3,
            &[MoveChoice::None],
            &[MoveChoice::None],
            true,
            &Deadline::never(),
        )
        .expect("complete");
        assert_eq!(matrix, vec![Some(200.0 + evaluate(&state))]);
    }

    #[test]
    fn reorder_puts_the_safest_row_first() {
        let options = [MoveChoice::Move(0), MoveChoice::Move(1), MoveChoice::Move(2)];
        let matrix = vec![Some(1.0), Some(-3.0), Some(4.0), Some(2.0), Some(0.0), None];
        assert_eq!(
            reorder_by_row_minimum(&matrix, &options, 2),
            vec![MoveChoice::Move(1), MoveChoice::Move(2), MoveChoice::Move(0)]
        );
    }
}
