//! Entry points for callers working with action names instead of indices.

use tracing::{debug, trace};

use crate::data::moves::MoveId;
use crate::data::normalize_id;
use crate::error::EngineError;
use crate::sim::choice::MoveChoice;
use crate::sim::damage::calculate_both_damage_rolls;
use crate::sim::generate::generate_instructions_from_move_pair;
use crate::sim::instruction::StateInstructions;
use crate::sim::state::{SideReference, State};

/// Resolves `action` for `side` and checks it is among the side's legal
/// options this turn.
pub fn parse_action(
    state: &State,
    side: SideReference,
    action: &str,
) -> Result<MoveChoice, EngineError> {
    let choice = MoveChoice::from_string(action, state, side)?;
    if !state.options_for(side).contains(&choice) {
        return Err(EngineError::illegal(
            side,
            format!("{} is not a legal option this turn", action.trim()),
        ));
    }
    Ok(choice)
}

/// Every outcome of the two actions, with probabilities summing to 1.
///
/// The input state is left untouched; generation runs on a private copy.
pub fn generate_instructions(
    state: &State,
    action_one: &str,
    action_two: &str,
) -> Result<Vec<StateInstructions>, EngineError> {
    state.validate()?;
    let side_one_choice = parse_action(state, SideReference::SideOne, action_one)?;
    let side_two_choice = parse_action(state, SideReference::SideTwo, action_two)?;
    let mut scratch = state.clone();
    let branches =
        generate_instructions_from_move_pair(&mut scratch, &side_one_choice, &side_two_choice);
    debug!(
        side_one = %action_one,
        side_two = %action_two,
        branches = branches.len(),
        "generated instructions"
    );
    Ok(branches)
}

fn damage_move(name: &str) -> Result<Option<MoveId>, EngineError> {
    match normalize_id(name).as_str() {
        "switch" | "none" | "" => Ok(None),
        _ => MoveId::from_id(name).map(Some),
    }
}

/// Non-critical damage rolls of each side's move against the other active
/// Pokémon. `"switch"` stands for a side that is switching out.
pub fn calculate_damage(
    state: &State,
    move_one: &str,
    move_two: &str,
    side_one_moves_first: bool,
) -> Result<(Vec<i16>, Vec<i16>), EngineError> {
    state.validate()?;
    let one = damage_move(move_one)?;
    let two = damage_move(move_two)?;
    let rolls = calculate_both_damage_rolls(state, one, two, side_one_moves_first);
    trace!(
        side_one = rolls.0.len(),
        side_two = rolls.1.len(),
        "damage rolls"
    );
    Ok(rolls)
}

/// Legal options for both sides rendered as action names.
pub fn legal_actions(state: &State) -> (Vec<String>, Vec<String>) {
    let (one, two) = state.get_all_options();
    (
        one.iter().map(|c| c.to_string(&state.side_one)).collect(),
        two.iter().map(|c| c.to_string(&state.side_two)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Move;

    fn state() -> State {
        let mut state = State::default();
        state.side_one.pokemon[1].id = "pikachu";
        for side in [&mut state.side_one, &mut state.side_two] {
            let active = side.active_mut();
            active.moves[0] = Move::from_id("tackle").expect("tackle");
            active.moves[1] = Move::from_id("splash").expect("splash");
        }
        state.side_one.active_mut().speed = 150;
        state
    }

    #[test]
    fn generated_probabilities_sum_to_one() {
        let state = state();
        let branches = generate_instructions(&state, "tackle", "tackle").expect("generate");
        let total: f32 = branches.iter().map(|b| b.percentage).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_move_name_is_an_identifier_error() {
        let err = generate_instructions(&state(), "notamove", "tackle").unwrap_err();
        assert!(matches!(err, EngineError::UnknownIdentifier { .. }));
    }

    #[test]
    fn move_the_active_lacks_is_illegal() {
        let err = generate_instructions(&state(), "tackle", "earthquake").unwrap_err();
        assert!(matches!(
            err,
            EngineError::IllegalAction {
                side: SideReference::SideTwo,
                ..
            }
        ));
    }

    #[test]
    fn disabled_move_is_illegal() {
        let mut state = state();
        state.side_one.active_mut().moves[0].disabled = true;
        assert!(matches!(
            generate_instructions(&state, "tackle", "tackle"),
            Err(EngineError::IllegalAction { .. })
        ));
    }

    #[test]
    fn switch_by_species_name_is_accepted() {
        let branches = generate_instructions(&state(), "switch pikachu", "splash").expect("generate");
        assert!(!branches.is_empty());
    }

    #[test]
    fn malformed_state_is_rejected() {
        let mut state = state();
        state.side_one.active_index = 9;
        assert!(matches!(
            generate_instructions(&state, "tackle", "tackle"),
            Err(EngineError::MalformedState(_))
        ));
    }

    #[test]
    fn switching_side_deals_no_damage() {
        let (one, two) = calculate_damage(&state(), "tackle", "switch", true).expect("damage");
        assert_eq!(one.len(), 16);
        assert!(two.is_empty());
    }

    #[test]
    fn legal_actions_name_moves_and_switches() {
        let (one, _) = legal_actions(&state());
        assert_eq!(&one[..3], &["tackle", "splash", "pikachu"]);
    }
}
