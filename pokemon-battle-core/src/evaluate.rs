//! Static position score used at search leaves. Positive favours side one.

use crate::data::abilities::Ability;
use crate::data::conditions::{PokemonStatus, PokemonVolatileStatus};
use crate::data::moves::MoveCategory;
use crate::sim::state::{Pokemon, Side, State};

const POKEMON_ALIVE: f32 = 30.0;
const POKEMON_HP: f32 = 100.0;

const ATTACK_BOOST: f32 = 30.0;
const DEFENSE_BOOST: f32 = 15.0;
const SPECIAL_ATTACK_BOOST: f32 = 30.0;
const SPECIAL_DEFENSE_BOOST: f32 = 15.0;
const SPEED_BOOST: f32 = 30.0;

const FROZEN: f32 = -40.0;
const ASLEEP: f32 = -25.0;
const PARALYZED: f32 = -25.0;
const TOXIC: f32 = -30.0;
const POISONED: f32 = -10.0;
const BURNED: f32 = -25.0;

const LEECH_SEED: f32 = -30.0;
const SUBSTITUTE: f32 = 40.0;
const CONFUSION: f32 = -20.0;

const REFLECT: f32 = 20.0;
const LIGHT_SCREEN: f32 = 20.0;
const AURORA_VEIL: f32 = 40.0;
const SAFEGUARD: f32 = 5.0;
const TAILWIND: f32 = 7.0;
const STICKY_WEB: f32 = -25.0;
const STEALTH_ROCK: f32 = -10.0;
const SPIKES: f32 = -7.0;
const TOXIC_SPIKES: f32 = -7.0;

/// Diminishing weight of each stage from -6 to +6.
const BOOST_MULTIPLIERS: [f32; 13] = [
    -3.3, -3.15, -3.0, -2.5, -2.0, -1.0, 0.0, 1.0, 2.0, 2.5, 3.0, 3.15, 3.3,
];

fn boost_multiplier(stage: i8) -> f32 {
    BOOST_MULTIPLIERS[(stage.clamp(-6, 6) + 6) as usize]
}

/// Burn hurts in proportion to how many physical moves the holder relies on.
fn burn_penalty(pokemon: &Pokemon) -> f32 {
    if pokemon.ability == Ability::Guts {
        return -2.0 * BURNED;
    }
    let mut physical = pokemon
        .moves
        .iter()
        .filter(|m| m.id.data().category == MoveCategory::Physical)
        .count() as f32;
    if pokemon.special_attack > pokemon.attack {
        physical /= 2.0;
    }
    physical * BURNED
}

fn evaluate_pokemon(pokemon: &Pokemon) -> f32 {
    let mut score = POKEMON_ALIVE + POKEMON_HP * pokemon.hp_fraction();
    score += match pokemon.status {
        PokemonStatus::Burn => burn_penalty(pokemon),
        PokemonStatus::Freeze => FROZEN,
        PokemonStatus::Sleep => ASLEEP,
        PokemonStatus::Paralyze => PARALYZED,
        PokemonStatus::Toxic => TOXIC,
        PokemonStatus::Poison => POISONED,
        PokemonStatus::None => 0.0,
    };
    score
}

fn evaluate_side(side: &Side) -> f32 {
    let alive = side.alive_count() as f32;
    let mut score: f32 = side
        .pokemon
        .iter()
        .filter(|p| p.is_alive())
        .map(evaluate_pokemon)
        .sum();

    for volatile in &side.volatile_statuses {
        score += match volatile {
            PokemonVolatileStatus::LeechSeed => LEECH_SEED,
            PokemonVolatileStatus::Substitute => SUBSTITUTE,
            PokemonVolatileStatus::Confusion => CONFUSION,
            _ => 0.0,
        };
    }

    let boosts = &side.boosts;
    score += boost_multiplier(boosts.attack) * ATTACK_BOOST
        + boost_multiplier(boosts.defense) * DEFENSE_BOOST
        + boost_multiplier(boosts.special_attack) * SPECIAL_ATTACK_BOOST
        + boost_multiplier(boosts.special_defense) * SPECIAL_DEFENSE_BOOST
        + boost_multiplier(boosts.speed) * SPEED_BOOST;

    let conditions = &side.side_conditions;
    score += conditions.reflect as f32 * REFLECT
        + conditions.light_screen as f32 * LIGHT_SCREEN
        + conditions.aurora_veil as f32 * AURORA_VEIL
        + conditions.safeguard as f32 * SAFEGUARD
        + conditions.tailwind as f32 * TAILWIND
        + conditions.sticky_web as f32 * STICKY_WEB
        + conditions.stealth_rock as f32 * STEALTH_ROCK * alive
        + conditions.spikes as f32 * SPIKES * alive
        + conditions.toxic_spikes as f32 * TOXIC_SPIKES * alive;
    score
}

/// Heuristic value of the position from side one's point of view.
pub fn evaluate(state: &State) -> f32 {
    evaluate_side(&state.side_one) - evaluate_side(&state.side_two)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Move;

    #[test]
    fn mirrored_position_is_even() {
        assert_eq!(evaluate(&State::default()), 0.0);
    }

    #[test]
    fn hp_loss_and_faints_swing_the_score() {
        let mut state = State::default();
        state.side_two.active_mut().hp = 50;
        assert!((evaluate(&state) - 50.0).abs() < 1e-4);
        state.side_two.pokemon[1].hp = 0;
        assert!((evaluate(&state) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn boosts_follow_the_multiplier_table() {
        let mut state = State::default();
        state.side_one.boosts.attack = 2;
        state.side_one.boosts.speed = -1;
        assert!((evaluate(&state) - (2.0 * 30.0 - 30.0)).abs() < 1e-4);
    }

    #[test]
    fn burn_penalty_scales_with_physical_moves() {
        let mut state = State::default();
        let active = state.side_one.active_mut();
        active.status = PokemonStatus::Burn;
        active.moves[0] = Move::from_id("tackle").expect("tackle");
        active.moves[1] = Move::from_id("earthquake").expect("earthquake");
        assert!((evaluate(&state) + 50.0).abs() < 1e-4);
        state.side_one.active_mut().special_attack = 200;
        assert!((evaluate(&state) + 25.0).abs() < 1e-4);
    }

    #[test]
    fn hazards_weigh_by_remaining_pokemon() {
        let mut state = State::default();
        state.side_one.side_conditions.stealth_rock = 1;
        assert!((evaluate(&state) + 60.0).abs() < 1e-4);
    }
}
