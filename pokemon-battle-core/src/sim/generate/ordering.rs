use std::cmp::Ordering;

use crate::data::abilities::Ability;
use crate::data::conditions::{PokemonStatus, Terrain};
use crate::data::items::Item;
use crate::data::moves::{MoveCategory, MoveEffect};
use crate::sim::choice::MoveChoice;
use crate::sim::state::{SideReference, State};
use crate::sim::stats::stage_multiplier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOrder {
    SideOneFirst,
    SideTwoFirst,
    /// Equal speed: both orders happen with equal probability.
    SpeedTie,
}

pub fn effective_speed(state: &State, side: SideReference) -> i32 {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    let mut speed = active.speed as f32 * stage_multiplier(side_ref.boosts.speed);
    if active.item == Item::ChoiceScarf {
        speed *= 1.5;
    }
    if side_ref.side_conditions.tailwind > 0 {
        speed *= 2.0;
    }
    if active.ability.doubles_speed_in(state.effective_weather()) {
        speed *= 2.0;
    }
    if active.status == PokemonStatus::Paralyze {
        speed *= 0.5;
    }
    speed.floor() as i32
}

pub fn effective_priority(state: &State, side: SideReference, move_index: usize) -> i8 {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    let data = active.moves[move_index].id.data();
    let mut priority = data.priority;
    if active.ability == Ability::Prankster && data.category == MoveCategory::Status {
        priority += 1;
    }
    if data.id == "grassyglide"
        && state.terrain_is_active(Terrain::GrassyTerrain)
        && side_ref.active_is_grounded()
    {
        priority += 1;
    }
    priority
}

fn by_speed(state: &State) -> MoveOrder {
    let one = effective_speed(state, SideReference::SideOne);
    let two = effective_speed(state, SideReference::SideTwo);
    let mut ordering = one.cmp(&two);
    if state.trick_room.active {
        ordering = ordering.reverse();
    }
    match ordering {
        Ordering::Greater => MoveOrder::SideOneFirst,
        Ordering::Less => MoveOrder::SideTwoFirst,
        Ordering::Equal => MoveOrder::SpeedTie,
    }
}

fn is_pursuit(state: &State, side: SideReference, choice: &MoveChoice) -> bool {
    match choice {
        MoveChoice::Move(index) => {
            state.get_side(side).active().moves[*index].id.data().effect == MoveEffect::Pursuit
        }
        _ => false,
    }
}

/// Who acts first this turn. Switches precede moves, except Pursuit against
/// a switching target.
pub fn move_order(state: &State, side_one: &MoveChoice, side_two: &MoveChoice) -> MoveOrder {
    match (side_one, side_two) {
        (MoveChoice::None, MoveChoice::None) => MoveOrder::SideOneFirst,
        (MoveChoice::None, _) => MoveOrder::SideTwoFirst,
        (_, MoveChoice::None) => MoveOrder::SideOneFirst,
        (MoveChoice::Switch(_), MoveChoice::Switch(_)) => by_speed(state),
        (MoveChoice::Switch(_), MoveChoice::Move(_)) => {
            if is_pursuit(state, SideReference::SideTwo, side_two) {
                MoveOrder::SideTwoFirst
            } else {
                MoveOrder::SideOneFirst
            }
        }
        (MoveChoice::Move(_), MoveChoice::Switch(_)) => {
            if is_pursuit(state, SideReference::SideOne, side_one) {
                MoveOrder::SideOneFirst
            } else {
                MoveOrder::SideTwoFirst
            }
        }
        (MoveChoice::Move(one), MoveChoice::Move(two)) => {
            let one = effective_priority(state, SideReference::SideOne, *one);
            let two = effective_priority(state, SideReference::SideTwo, *two);
            match one.cmp(&two) {
                Ordering::Greater => MoveOrder::SideOneFirst,
                Ordering::Less => MoveOrder::SideTwoFirst,
                Ordering::Equal => by_speed(state),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::conditions::Weather;
    use crate::sim::state::Move;

    fn state(speed_one: i16, speed_two: i16) -> State {
        let mut state = State::default();
        state.side_one.active_mut().speed = speed_one;
        state.side_two.active_mut().speed = speed_two;
        for side in [&mut state.side_one, &mut state.side_two] {
            let active = side.active_mut();
            active.moves[0] = Move::from_id("tackle").expect("tackle");
            active.moves[1] = Move::from_id("quickattack").expect("quickattack");
            active.moves[2] = Move::from_id("pursuit").expect("pursuit");
            active.moves[3] = Move::from_id("thunderwave").expect("thunderwave");
        }
        state
    }

    #[test]
    fn faster_side_moves_first() {
        let state = state(120, 100);
        assert_eq!(
            move_order(&state, &MoveChoice::Move(0), &MoveChoice::Move(0)),
            MoveOrder::SideOneFirst
        );
    }

    #[test]
    fn equal_speed_is_a_tie() {
        let state = state(100, 100);
        assert_eq!(
            move_order(&state, &MoveChoice::Move(0), &MoveChoice::Move(0)),
            MoveOrder::SpeedTie
        );
    }

    #[test]
    fn trick_room_reverses_speed() {
        let mut state = state(120, 100);
        state.trick_room.active = true;
        assert_eq!(
            move_order(&state, &MoveChoice::Move(0), &MoveChoice::Move(0)),
            MoveOrder::SideTwoFirst
        );
    }

    #[test]
    fn priority_beats_speed() {
        let state = state(50, 100);
        assert_eq!(
            move_order(&state, &MoveChoice::Move(1), &MoveChoice::Move(0)),
            MoveOrder::SideOneFirst
        );
    }

    #[test]
    fn prankster_boosts_status_moves() {
        let mut state = state(50, 100);
        state.side_one.active_mut().ability = Ability::Prankster;
        assert_eq!(
            move_order(&state, &MoveChoice::Move(3), &MoveChoice::Move(0)),
            MoveOrder::SideOneFirst
        );
    }

    #[test]
    fn switches_go_first_except_against_pursuit() {
        let state = state(50, 100);
        assert_eq!(
            move_order(&state, &MoveChoice::Switch(1), &MoveChoice::Move(0)),
            MoveOrder::SideOneFirst
        );
        assert_eq!(
            move_order(&state, &MoveChoice::Switch(1), &MoveChoice::Move(2)),
            MoveOrder::SideTwoFirst
        );
    }

    #[test]
    fn speed_modifiers_stack() {
        let mut state = state(100, 100);
        state.side_one.active_mut().item = Item::ChoiceScarf;
        assert_eq!(effective_speed(&state, SideReference::SideOne), 150);
        state.side_one.side_conditions.tailwind = 3;
        assert_eq!(effective_speed(&state, SideReference::SideOne), 300);
        state.side_one.active_mut().status = PokemonStatus::Paralyze;
        assert_eq!(effective_speed(&state, SideReference::SideOne), 150);
        state.side_two.active_mut().ability = Ability::SwiftSwim;
        state.weather.weather_type = Weather::Rain;
        assert_eq!(effective_speed(&state, SideReference::SideTwo), 200);
        state.side_two.boosts.speed = -1;
        assert_eq!(effective_speed(&state, SideReference::SideTwo), 133);
    }
}
