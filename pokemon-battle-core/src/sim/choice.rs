use serde::Serialize;

use crate::data::conditions::PokemonVolatileStatus;
use crate::data::moves::{MoveCategory, MoveId};
use crate::data::normalize_id;
use crate::data::species::species_data;
use crate::data::types::PokemonType;
use crate::error::{EngineError, IdentifierKind};
use crate::sim::state::{Side, SideReference, State};

/// One side's action for a turn. Indices point into the active Pokémon's
/// move slots or the side's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MoveChoice {
    Move(usize),
    Switch(usize),
    None,
}

impl MoveChoice {
    /// Resolves `switch <species>`, a bare species id of a reserve, a move id
    /// the active Pokémon knows, or `none`. Naming a species that cannot come
    /// in is illegal; naming something that is not a species is unknown.
    pub fn from_string(text: &str, state: &State, side: SideReference) -> Result<MoveChoice, EngineError> {
        let trimmed = text.trim();
        let side_ref = state.get_side(side);
        if let Some(species) = trimmed
            .strip_prefix("switch ")
            .or_else(|| trimmed.strip_prefix("switch:"))
        {
            let id = normalize_id(species);
            if let Some(resolved) = find_switch(state, side, &id) {
                return resolved.map(MoveChoice::Switch);
            }
            if species_data(&id).is_ok() {
                return Err(EngineError::illegal(side, format!("{} is not on the roster", id)));
            }
            return Err(EngineError::unknown(IdentifierKind::Choice, text));
        }

        let id = normalize_id(trimmed);
        if id == "none" {
            return Ok(MoveChoice::None);
        }
        if let Some(resolved) = find_switch(state, side, &id) {
            return resolved.map(MoveChoice::Switch);
        }
        let move_id = match MoveId::from_id(&id) {
            Ok(move_id) => move_id,
            Err(_) if species_data(&id).is_ok() => {
                return Err(EngineError::illegal(side, format!("{} is not on the roster", id)));
            }
            Err(err) => return Err(err),
        };
        side_ref
            .active()
            .knows_move(move_id)
            .map(MoveChoice::Move)
            .ok_or_else(|| EngineError::illegal(side, format!("active pokemon does not know {}", move_id)))
    }

    /// Renders the move id, the species id of the switch target, or `none`.
    pub fn to_string(&self, side: &Side) -> String {
        match self {
            MoveChoice::Move(index) => side.active().moves[*index].id.as_str().to_string(),
            MoveChoice::Switch(index) => side.pokemon[*index].id.to_string(),
            MoveChoice::None => "none".to_string(),
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, MoveChoice::Switch(_))
    }
}

/// `None` when no roster member carries `id`. A living reserve is preferred
/// over an active or fainted namesake.
fn find_switch(state: &State, side: SideReference, id: &str) -> Option<Result<usize, EngineError>> {
    let side_ref = state.get_side(side);
    let mut blocked = None;
    for (index, pokemon) in side_ref.pokemon.iter().enumerate() {
        if pokemon.id != id {
            continue;
        }
        let in_play = index == side_ref.active_index && !state.team_preview;
        if !in_play && pokemon.is_alive() {
            return Some(Ok(index));
        }
        blocked.get_or_insert(if in_play {
            format!("{} is already active", id)
        } else {
            format!("{} has fainted", id)
        });
    }
    blocked.map(|reason| Err(EngineError::illegal(side, reason)))
}

fn must_switch(side: &Side) -> bool {
    side.force_switch || side.active().is_fainted()
}

fn switch_options(side: &Side) -> Vec<MoveChoice> {
    side.switch_targets().map(MoveChoice::Switch).collect()
}

fn is_trapped(side: &Side) -> bool {
    if side.active().has_type(PokemonType::Ghost) {
        return false;
    }
    side.force_trapped || side.has_volatile(PokemonVolatileStatus::PartiallyTrapped)
}

fn regular_options(side: &Side) -> Vec<MoveChoice> {
    let active = side.active();
    let taunted = side.has_volatile(PokemonVolatileStatus::Taunt);
    let mut options: Vec<MoveChoice> = active
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.id.is_none() && !m.disabled && m.pp > 0)
        .filter(|(_, m)| !(taunted && m.id.data().category == MoveCategory::Status))
        .map(|(index, _)| MoveChoice::Move(index))
        .collect();
    if !is_trapped(side) {
        options.extend(switch_options(side));
    }
    options
}

fn or_none(mut options: Vec<MoveChoice>) -> Vec<MoveChoice> {
    if options.is_empty() {
        options.push(MoveChoice::None);
    }
    options
}

impl State {
    /// Legal actions for side one and side two, never empty.
    pub fn get_all_options(&self) -> (Vec<MoveChoice>, Vec<MoveChoice>) {
        if self.battle_is_over() != 0.0 {
            return (vec![MoveChoice::None], vec![MoveChoice::None]);
        }

        if self.team_preview {
            let preview = |side: &Side| -> Vec<MoveChoice> {
                or_none(
                    side.pokemon
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.is_alive())
                        .map(|(index, _)| MoveChoice::Switch(index))
                        .collect(),
                )
            };
            return (preview(&self.side_one), preview(&self.side_two));
        }

        let one_forced = must_switch(&self.side_one);
        let two_forced = must_switch(&self.side_two);
        if one_forced || two_forced {
            // The side waiting on a pivot replays the move it had locked in.
            let forced = |side: &Side, is_forced: bool| {
                if is_forced {
                    or_none(switch_options(side))
                } else {
                    vec![side.switch_out_move_second_saved_move]
                }
            };
            return (
                forced(&self.side_one, one_forced),
                forced(&self.side_two, two_forced),
            );
        }

        (
            or_none(regular_options(&self.side_one)),
            or_none(regular_options(&self.side_two)),
        )
    }

    pub fn options_for(&self, side: SideReference) -> Vec<MoveChoice> {
        let (side_one, side_two) = self.get_all_options();
        match side {
            SideReference::SideOne => side_one,
            SideReference::SideTwo => side_two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::moves::MoveId;
    use crate::sim::state::Move;

    fn state_with_moves() -> State {
        let mut state = State::default();
        for side in [&mut state.side_one, &mut state.side_two] {
            let active = side.active_mut();
            active.moves[0] = Move::from_id("tackle").expect("tackle");
            active.moves[1] = Move::from_id("swordsdance").expect("swordsdance");
        }
        state
    }

    #[test]
    fn regular_turn_offers_moves_then_switches() {
        let state = state_with_moves();
        let (side_one, _) = state.get_all_options();
        assert_eq!(
            side_one,
            vec![
                MoveChoice::Move(0),
                MoveChoice::Move(1),
                MoveChoice::Switch(1),
                MoveChoice::Switch(2),
                MoveChoice::Switch(3),
                MoveChoice::Switch(4),
                MoveChoice::Switch(5),
            ]
        );
    }

    #[test]
    fn taunt_hides_status_moves() {
        let mut state = state_with_moves();
        state
            .side_one
            .volatile_statuses
            .insert(PokemonVolatileStatus::Taunt);
        let options = state.options_for(SideReference::SideOne);
        assert!(options.contains(&MoveChoice::Move(0)));
        assert!(!options.contains(&MoveChoice::Move(1)));
    }

    #[test]
    fn trapped_side_cannot_switch_unless_ghost() {
        let mut state = state_with_moves();
        state.side_one.force_trapped = true;
        assert!(!state
            .options_for(SideReference::SideOne)
            .iter()
            .any(MoveChoice::is_switch));
        state.side_one.active_mut().types = (PokemonType::Ghost, PokemonType::Typeless);
        assert!(state
            .options_for(SideReference::SideOne)
            .iter()
            .any(MoveChoice::is_switch));
    }

    #[test]
    fn fainted_active_forces_switch_and_opponent_waits() {
        let mut state = state_with_moves();
        state.side_two.active_mut().hp = 0;
        let (side_one, side_two) = state.get_all_options();
        assert_eq!(side_one, vec![MoveChoice::None]);
        assert_eq!(side_two.len(), 5);
        assert!(side_two.iter().all(MoveChoice::is_switch));
    }

    #[test]
    fn pivot_leaves_opponent_with_its_saved_move() {
        let mut state = state_with_moves();
        state.side_one.force_switch = true;
        state.side_two.switch_out_move_second_saved_move = MoveChoice::Move(0);
        let (side_one, side_two) = state.get_all_options();
        assert!(side_one.iter().all(MoveChoice::is_switch));
        assert_eq!(side_two, vec![MoveChoice::Move(0)]);
    }

    #[test]
    fn slow_pivot_resolves_through_the_forced_switch() {
        let mut state = state_with_moves();
        state.side_one.slow_uturn_move = true;
        let regular = state.options_for(SideReference::SideOne);
        assert!(regular.contains(&MoveChoice::Switch(1)));

        state.side_one.force_switch = true;
        let (side_one, side_two) = state.get_all_options();
        assert_eq!(side_one.len(), 5);
        assert!(side_one.iter().all(MoveChoice::is_switch));
        assert_eq!(side_two, vec![MoveChoice::None]);
    }

    #[test]
    fn no_legal_action_yields_none() {
        let mut state = State::default();
        state.side_one.pokemon.truncate(1);
        let options = state.options_for(SideReference::SideOne);
        assert_eq!(options, vec![MoveChoice::None]);
    }

    #[test]
    fn team_preview_offers_every_living_slot() {
        let mut state = State::default();
        state.team_preview = true;
        state.side_one.pokemon[3].hp = 0;
        let options = state.options_for(SideReference::SideOne);
        assert_eq!(options.len(), 5);
        assert!(options.contains(&MoveChoice::Switch(0)));
        assert!(!options.contains(&MoveChoice::Switch(3)));
    }

    #[test]
    fn from_string_resolves_moves_and_switches() {
        let mut state = state_with_moves();
        state.side_one.pokemon[2].id = "pikachu";
        let side = SideReference::SideOne;
        assert_eq!(
            MoveChoice::from_string("Tackle", &state, side),
            Ok(MoveChoice::Move(0))
        );
        assert_eq!(
            MoveChoice::from_string("switch pikachu", &state, side),
            Ok(MoveChoice::Switch(2))
        );
        assert_eq!(
            MoveChoice::from_string("pikachu", &state, side),
            Ok(MoveChoice::Switch(2))
        );
        assert_eq!(MoveChoice::from_string("none", &state, side), Ok(MoveChoice::None));
        assert!(matches!(
            MoveChoice::from_string("thunderbolt", &state, side),
            Err(EngineError::IllegalAction { .. })
        ));
        assert!(matches!(
            MoveChoice::from_string("flyingpress", &state, side),
            Err(EngineError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn from_string_rejects_switches_that_cannot_happen() {
        let mut state = state_with_moves();
        state.side_one.pokemon[0].id = "garchomp";
        state.side_one.pokemon[3].id = "gengar";
        state.side_one.pokemon[3].hp = 0;
        let side = SideReference::SideOne;
        for text in ["switch garchomp", "garchomp", "switch gengar", "switch charizard"] {
            assert!(
                matches!(
                    MoveChoice::from_string(text, &state, side),
                    Err(EngineError::IllegalAction { side: SideReference::SideOne, .. })
                ),
                "{text}"
            );
        }
        assert!(matches!(
            MoveChoice::from_string("switch notapokemon", &state, side),
            Err(EngineError::UnknownIdentifier {
                kind: IdentifierKind::Choice,
                ..
            })
        ));

        state.team_preview = true;
        assert_eq!(
            MoveChoice::from_string("switch garchomp", &state, side),
            Ok(MoveChoice::Switch(0))
        );
    }

    #[test]
    fn to_string_round_trips_through_from_string() {
        let mut state = state_with_moves();
        state.side_one.pokemon[4].id = "gengar";
        let side = SideReference::SideOne;
        for choice in [MoveChoice::Move(1), MoveChoice::Switch(4), MoveChoice::None] {
            let text = choice.to_string(&state.side_one);
            assert_eq!(MoveChoice::from_string(&text, &state, side), Ok(choice));
        }
        assert_eq!(MoveChoice::Move(0).to_string(&state.side_one), MoveId::from_id("tackle").unwrap().as_str());
    }
}
