//! Turn resolution: expands a pair of choices into every probability-weighted
//! outcome as a list of [`StateInstructions`].
//!
//! Generation works on a frontier of partial branches. Each phase is run with
//! the branch's instructions applied to the state so it observes the effects
//! of everything before it; instructions a phase adds are applied as they are
//! pushed and rewound before the branch is handed back. Forks share the
//! prefix of their parent and differ only in what they append.
//!
//! Phases are split by concern:
//! - [`ordering`] decides who acts first,
//! - [`switching`] handles leaving and entering the field,
//! - [`moves`] runs the per-move pipeline,
//! - [`end_of_turn`] applies residual effects.

pub(crate) mod end_of_turn;
pub(crate) mod moves;
pub(crate) mod ordering;
pub(crate) mod switching;

use tracing::trace;

use crate::sim::choice::MoveChoice;
use crate::sim::instruction::{Instruction, StateInstructions};
use crate::sim::state::{SideReference, State};

use ordering::{move_order, MoveOrder};

/// Branches whose probability falls below this are discarded.
pub const MIN_BRANCH_PROBABILITY: f32 = 1e-6;

/// A partial outcome plus the per-action flags later phases consult.
#[derive(Clone, Debug)]
pub(crate) struct Branch {
    pub instructions: StateInstructions,
    /// The acting Pokémon's move stops here.
    pub halted: bool,
    /// The current move connected with its target.
    pub landed: bool,
    /// The current move's damage went into a substitute.
    pub hit_substitute: bool,
    /// A pivot or Baton Pass paused the turn before end-of-turn effects.
    pub suspended: bool,
    /// The second mover was forced out before it could act.
    pub dragged: bool,
}

impl Branch {
    pub(crate) fn new(percentage: f32) -> Self {
        Branch {
            instructions: StateInstructions {
                percentage,
                instruction_list: Vec::new(),
            },
            halted: false,
            landed: false,
            hit_substitute: false,
            suspended: false,
            dragged: false,
        }
    }

    fn start_action(&mut self) {
        self.halted = false;
        self.landed = false;
        self.hit_substitute = false;
    }
}

/// Applies `instruction` to the state and records it on the branch.
pub(crate) fn push(state: &mut State, branch: &mut Branch, instruction: Instruction) {
    state.apply_one_instruction(&instruction);
    branch.instructions.instruction_list.push(instruction);
}

/// Runs `build` on the branch, then rewinds whatever it applied.
pub(crate) fn extend<F>(state: &mut State, mut branch: Branch, build: F) -> Branch
where
    F: FnOnce(&mut State, &mut Branch),
{
    let start = branch.instructions.instruction_list.len();
    build(state, &mut branch);
    state.reverse_instructions(&branch.instructions.instruction_list[start..]);
    branch
}

/// Copies `branch` scaled by `probability` and extends the copy with `build`.
pub(crate) fn fork<F>(state: &mut State, branch: &Branch, probability: f32, build: F) -> Branch
where
    F: FnOnce(&mut State, &mut Branch),
{
    let mut child = branch.clone();
    child.instructions.update_percentage(probability);
    extend(state, child, build)
}

/// Two-way split taking `on_hit` with `probability` and `on_miss` otherwise.
/// Certain outcomes produce a single branch.
pub(crate) fn split<H, M>(
    state: &mut State,
    branch: Branch,
    probability: f32,
    on_hit: H,
    on_miss: M,
) -> Vec<Branch>
where
    H: FnOnce(&mut State, &mut Branch),
    M: FnOnce(&mut State, &mut Branch),
{
    if probability >= 1.0 {
        return vec![extend(state, branch, on_hit)];
    }
    if probability <= 0.0 {
        return vec![extend(state, branch, on_miss)];
    }
    let hit = fork(state, &branch, probability, on_hit);
    let miss = fork(state, &branch, 1.0 - probability, on_miss);
    vec![hit, miss]
}

/// Runs `phase` once per branch with that branch applied to the state.
pub(crate) fn for_each_branch<F>(state: &mut State, frontier: Vec<Branch>, mut phase: F) -> Vec<Branch>
where
    F: FnMut(&mut State, Branch) -> Vec<Branch>,
{
    let mut next = Vec::with_capacity(frontier.len());
    for branch in frontier {
        if branch.suspended {
            next.push(branch);
            continue;
        }
        let applied = branch.instructions.instruction_list.clone();
        state.apply_instructions(&applied);
        next.extend(phase(state, branch));
        state.reverse_instructions(&applied);
    }
    next
}

/// Merges branches with identical instruction lists, drops negligible ones and
/// renormalises the remainder to sum to one.
pub(crate) fn combine_duplicate_instructions(branches: Vec<StateInstructions>) -> Vec<StateInstructions> {
    let mut combined: Vec<StateInstructions> = Vec::with_capacity(branches.len());
    for branch in branches {
        match combined
            .iter_mut()
            .find(|existing| existing.instruction_list == branch.instruction_list)
        {
            Some(existing) => existing.percentage += branch.percentage,
            None => combined.push(branch),
        }
    }
    combined.retain(|branch| branch.percentage >= MIN_BRANCH_PROBABILITY);
    let total: f32 = combined.iter().map(|branch| branch.percentage).sum();
    if total > 0.0 {
        for branch in combined.iter_mut() {
            branch.percentage /= total;
        }
    }
    combined
}

/// Replacing a fainted Pokémon, or a lone switch against no action, does not
/// advance the turn.
fn end_of_turn_triggered(state: &State, side_one: &MoveChoice, side_two: &MoveChoice) -> bool {
    if state.side_one.active().is_fainted() || state.side_two.active().is_fainted() {
        return false;
    }
    !(side_one.is_switch() && *side_two == MoveChoice::None)
        && !(*side_one == MoveChoice::None && side_two.is_switch())
}

fn run_action(
    state: &mut State,
    frontier: Vec<Branch>,
    side: SideReference,
    choice: &MoveChoice,
    opponent_choice: &MoveChoice,
    moves_first: bool,
) -> Vec<Branch> {
    let frontier = frontier
        .into_iter()
        .map(|mut branch| {
            branch.start_action();
            branch
        })
        .collect();
    match choice {
        MoveChoice::None => frontier,
        MoveChoice::Switch(index) => for_each_branch(state, frontier, |state, branch| {
            vec![extend(state, branch, |state, branch| {
                switching::switch_out_and_in(state, branch, side, *index)
            })]
        }),
        MoveChoice::Move(index) => {
            moves::run_move(state, frontier, side, *index, opponent_choice, moves_first)
        }
    }
}

/// Resolves the pending forced switch(es) left by a pivot or Baton Pass, then
/// the move the other side had saved, then end-of-turn effects.
fn resolve_forced_switches(
    state: &mut State,
    side_one_choice: &MoveChoice,
    side_two_choice: &MoveChoice,
) -> Vec<Branch> {
    let (forced_side, forced_choice, other_choice) = if state.side_one.force_switch {
        (SideReference::SideOne, side_one_choice, side_two_choice)
    } else {
        (SideReference::SideTwo, side_two_choice, side_one_choice)
    };
    let other_side = forced_side.other();

    let mut frontier = vec![extend(state, Branch::new(1.0), |state, branch| {
        let forced = state.get_side(forced_side);
        if forced.slow_uturn_move {
            push(state, branch, Instruction::ToggleSlowUturn { side: forced_side });
        }
        push(state, branch, Instruction::ToggleForceSwitch { side: forced_side });
        let saved = state.get_side(other_side).switch_out_move_second_saved_move;
        if saved != MoveChoice::None {
            push(
                state,
                branch,
                Instruction::SetSecondMoveSwitchOutMove {
                    side: other_side,
                    new_choice: MoveChoice::None,
                    previous_choice: saved,
                },
            );
        }
    })];
    frontier = run_action(state, frontier, forced_side, forced_choice, other_choice, true);
    if *other_choice != MoveChoice::None {
        // The saved move fires against whatever came in.
        frontier = run_action(state, frontier, other_side, other_choice, &MoveChoice::None, false);
    }
    frontier
}

fn resolve_team_preview(state: &mut State, side_one_choice: &MoveChoice, side_two_choice: &MoveChoice) -> Vec<Branch> {
    vec![extend(state, Branch::new(1.0), |state, branch| {
        for (side, choice) in [
            (SideReference::SideOne, side_one_choice),
            (SideReference::SideTwo, side_two_choice),
        ] {
            if let MoveChoice::Switch(index) = choice {
                if *index != state.get_side(side).active_index {
                    switching::switch_out_and_in(state, branch, side, *index);
                }
            }
        }
    })]
}

/// Expands one turn in place. The state is left exactly as it was passed in.
pub fn generate_instructions_from_move_pair(
    state: &mut State,
    side_one_choice: &MoveChoice,
    side_two_choice: &MoveChoice,
) -> Vec<StateInstructions> {
    let finished: Vec<Branch> = if state.team_preview {
        resolve_team_preview(state, side_one_choice, side_two_choice)
    } else if state.side_one.force_switch || state.side_two.force_switch {
        let frontier = resolve_forced_switches(state, side_one_choice, side_two_choice);
        end_of_turn::run(state, frontier)
    } else {
        let orders = match move_order(state, side_one_choice, side_two_choice) {
            MoveOrder::SideOneFirst => vec![(SideReference::SideOne, 1.0)],
            MoveOrder::SideTwoFirst => vec![(SideReference::SideTwo, 1.0)],
            MoveOrder::SpeedTie => vec![(SideReference::SideOne, 0.5), (SideReference::SideTwo, 0.5)],
        };
        let mut finished = Vec::new();
        for (first, percentage) in orders {
            let (first_choice, second_choice) = match first {
                SideReference::SideOne => (side_one_choice, side_two_choice),
                SideReference::SideTwo => (side_two_choice, side_one_choice),
            };
            let mut frontier = vec![Branch::new(percentage)];
            frontier = run_action(state, frontier, first, first_choice, second_choice, true);
            frontier = run_action(state, frontier, first.other(), second_choice, first_choice, false);
            if end_of_turn_triggered(state, side_one_choice, side_two_choice) {
                frontier = end_of_turn::run(state, frontier);
            }
            finished.extend(frontier);
        }
        finished
    };

    let branches = combine_duplicate_instructions(
        finished.into_iter().map(|branch| branch.instructions).collect(),
    );
    trace!(branches = branches.len(), "generated turn outcomes");
    branches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::conditions::PokemonStatus;

    #[test]
    fn combine_merges_identical_lists_and_renormalises() {
        let damage = Instruction::Damage {
            side: SideReference::SideTwo,
            amount: 10,
        };
        let branches = vec![
            StateInstructions {
                percentage: 0.25,
                instruction_list: vec![damage.clone()],
            },
            StateInstructions {
                percentage: 0.25,
                instruction_list: vec![],
            },
            StateInstructions {
                percentage: 0.25,
                instruction_list: vec![damage.clone()],
            },
            StateInstructions {
                percentage: 0.25,
                instruction_list: vec![],
            },
        ];
        let combined = combine_duplicate_instructions(branches);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].instruction_list, vec![damage]);
        assert!((combined[0].percentage - 0.5).abs() < 1e-6);
    }

    #[test]
    fn combine_drops_negligible_branches() {
        let branches = vec![
            StateInstructions {
                percentage: 1e-8,
                instruction_list: vec![Instruction::DecrementWeatherTurnsRemaining],
            },
            StateInstructions {
                percentage: 0.5,
                instruction_list: vec![],
            },
        ];
        let combined = combine_duplicate_instructions(branches);
        assert_eq!(combined.len(), 1);
        assert!((combined[0].percentage - 1.0).abs() < 1e-6);
    }

    #[test]
    fn split_rewinds_state_between_forks() {
        let mut state = State::default();
        let original = state.clone();
        let burn = |state: &mut State, branch: &mut Branch| {
            push(
                state,
                branch,
                Instruction::ChangeStatus {
                    side: SideReference::SideOne,
                    pokemon_index: 0,
                    old_status: PokemonStatus::None,
                    new_status: PokemonStatus::Burn,
                },
            )
        };
        let branches = split(&mut state, Branch::new(1.0), 0.3, burn, |_, _| {});
        assert_eq!(state, original);
        assert_eq!(branches.len(), 2);
        assert!((branches[0].instructions.percentage - 0.3).abs() < 1e-6);
        assert_eq!(branches[0].instructions.instruction_list.len(), 1);
        assert!(branches[1].instructions.instruction_list.is_empty());
    }

    #[test]
    fn replacement_switch_skips_end_of_turn() {
        let mut state = State::default();
        assert!(!end_of_turn_triggered(&state, &MoveChoice::Switch(1), &MoveChoice::None));
        assert!(!end_of_turn_triggered(&state, &MoveChoice::None, &MoveChoice::Switch(2)));
        assert!(end_of_turn_triggered(&state, &MoveChoice::Move(0), &MoveChoice::Switch(2)));
        state.side_one.active_mut().hp = 0;
        state.side_two.active_mut().hp = 0;
        assert!(!end_of_turn_triggered(&state, &MoveChoice::Switch(1), &MoveChoice::Switch(2)));
    }
}
