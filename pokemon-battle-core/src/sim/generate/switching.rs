use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::types::{type_effectiveness, PokemonType};
use crate::sim::generate::{push, Branch};
use crate::sim::instruction::Instruction;
use crate::sim::state::{LastUsedMove, SideReference, State};

/// Weather and terrain set by a move or ability last this long, or
/// [`EXTENDED_FIELD_TURNS`] with the matching item.
pub(crate) const FIELD_TURNS: i8 = 5;
pub(crate) const EXTENDED_FIELD_TURNS: i8 = 8;

pub(crate) fn damage_active(state: &mut State, branch: &mut Branch, side: SideReference, amount: i16) {
    let hp = state.get_side(side).active().hp;
    let amount = amount.min(hp);
    if amount > 0 {
        push(state, branch, Instruction::Damage { side, amount });
    }
}

pub(crate) fn heal_active(state: &mut State, branch: &mut Branch, side: SideReference, amount: i16) {
    let active = state.get_side(side).active();
    if active.is_fainted() {
        return;
    }
    let amount = amount.min(active.maxhp - active.hp);
    if amount > 0 {
        push(state, branch, Instruction::Heal { side, amount });
    }
}

/// Adds a clamped stage change, skipping no-ops.
pub(crate) fn boost(state: &mut State, branch: &mut Branch, side: SideReference, stat: PokemonBoostableStat, amount: i8) {
    let current = state.get_side(side).boosts.get(stat);
    let applied = (current + amount).clamp(-6, 6) - current;
    if applied != 0 {
        push(
            state,
            branch,
            Instruction::Boost {
                side,
                stat,
                amount: applied,
            },
        );
    }
}

pub(crate) fn set_weather(state: &mut State, branch: &mut Branch, weather: Weather, setter: SideReference) {
    if state.weather.weather_type == weather {
        return;
    }
    let turns = if state.get_side(setter).active().item.extends_weather(weather) {
        EXTENDED_FIELD_TURNS
    } else {
        FIELD_TURNS
    };
    push(
        state,
        branch,
        Instruction::ChangeWeather {
            new_weather: weather,
            new_turns_remaining: turns,
            previous_weather: state.weather.weather_type,
            previous_turns_remaining: state.weather.turns_remaining,
        },
    );
}

pub(crate) fn set_terrain(state: &mut State, branch: &mut Branch, terrain: Terrain, setter: SideReference) {
    if state.terrain.terrain_type == terrain {
        return;
    }
    let turns = if state.get_side(setter).active().item == Item::TerrainExtender {
        EXTENDED_FIELD_TURNS
    } else {
        FIELD_TURNS
    };
    push(
        state,
        branch,
        Instruction::ChangeTerrain {
            new_terrain: terrain,
            new_turns_remaining: turns,
            previous_terrain: state.terrain.terrain_type,
            previous_turns_remaining: state.terrain.turns_remaining,
        },
    );
}

fn leave_field(state: &mut State, branch: &mut Branch, side: SideReference) {
    let baton_passing = state.get_side(side).baton_passing;
    if baton_passing {
        push(state, branch, Instruction::ToggleBatonPassing { side });
    }

    let volatiles: Vec<PokemonVolatileStatus> = state
        .get_side(side)
        .volatile_statuses
        .iter()
        .copied()
        .filter(|v| !(baton_passing && v.survives_baton_pass()))
        .collect();
    for volatile_status in volatiles {
        push(
            state,
            branch,
            Instruction::RemoveVolatileStatus {
                side,
                volatile_status,
            },
        );
        let duration = state
            .get_side(side)
            .volatile_status_durations
            .get(volatile_status)
            .unwrap_or(0);
        if duration != 0 {
            push(
                state,
                branch,
                Instruction::ChangeVolatileStatusDuration {
                    side,
                    volatile_status,
                    amount: -duration,
                },
            );
        }
    }

    if !baton_passing {
        for stat in PokemonBoostableStat::ALL {
            let stage = state.get_side(side).boosts.get(*stat);
            if stage != 0 {
                push(
                    state,
                    branch,
                    Instruction::Boost {
                        side,
                        stat: *stat,
                        amount: -stage,
                    },
                );
            }
        }
        let substitute = state.get_side(side).substitute_health;
        if substitute != 0 {
            push(
                state,
                branch,
                Instruction::SetSubstituteHealth {
                    side,
                    new_health: 0,
                    old_health: substitute,
                },
            );
        }
    }

    let toxic_count = state.get_side(side).side_conditions.toxic_count;
    if toxic_count != 0 {
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition: PokemonSideCondition::ToxicCount,
                amount: -toxic_count,
            },
        );
    }

    let disabled: Vec<usize> = state
        .get_side(side)
        .active()
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| m.disabled && !m.id.is_none())
        .map(|(index, _)| index)
        .collect();
    for move_index in disabled {
        push(state, branch, Instruction::EnableMove { side, move_index });
    }

    let active = state.get_side(side).active();
    if active.is_alive() {
        let (ability, status, regen) = (active.ability, active.status, active.maxhp / 3);
        let index = state.get_side(side).active_index;
        if ability == Ability::Regenerator {
            heal_active(state, branch, side, regen);
        }
        if ability == Ability::NaturalCure && status != PokemonStatus::None {
            push(
                state,
                branch,
                Instruction::ChangeStatus {
                    side,
                    pokemon_index: index,
                    old_status: status,
                    new_status: PokemonStatus::None,
                },
            );
        }
    }
}

fn enter_hazards(state: &mut State, branch: &mut Branch, side: SideReference) {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if active.item == Item::HeavyDutyBoots {
        return;
    }
    let conditions = side_ref.side_conditions;
    let grounded = side_ref.active_is_grounded();
    let magic_guard = active.ability == Ability::MagicGuard;
    let maxhp = active.maxhp;
    let types = active.types;
    let index = side_ref.active_index;

    if conditions.stealth_rock > 0 && !magic_guard {
        let multiplier = type_effectiveness(PokemonType::Rock, types);
        damage_active(state, branch, side, (maxhp as f32 * multiplier / 8.0) as i16);
    }
    if conditions.spikes > 0 && grounded && !magic_guard {
        let fraction = match conditions.spikes {
            1 => 1.0 / 8.0,
            2 => 1.0 / 6.0,
            _ => 1.0 / 4.0,
        };
        damage_active(state, branch, side, (maxhp as f32 * fraction) as i16);
    }
    if conditions.toxic_spikes > 0 && grounded {
        let active = state.get_side(side).active();
        if active.has_type(PokemonType::Poison) {
            push(
                state,
                branch,
                Instruction::ChangeSideCondition {
                    side,
                    condition: PokemonSideCondition::ToxicSpikes,
                    amount: -conditions.toxic_spikes,
                },
            );
        } else if active.is_alive()
            && active.status == PokemonStatus::None
            && !active.has_type(PokemonType::Steel)
            && conditions.safeguard == 0
        {
            let new_status = if conditions.toxic_spikes >= 2 {
                PokemonStatus::Toxic
            } else {
                PokemonStatus::Poison
            };
            push(
                state,
                branch,
                Instruction::ChangeStatus {
                    side,
                    pokemon_index: index,
                    old_status: PokemonStatus::None,
                    new_status,
                },
            );
        }
    }
    if conditions.sticky_web > 0 && grounded && state.get_side(side).active().is_alive() {
        boost(state, branch, side, PokemonBoostableStat::Speed, -1);
    }
}

fn entry_abilities(state: &mut State, branch: &mut Branch, side: SideReference) {
    let active = state.get_side(side).active();
    if active.is_fainted() {
        return;
    }
    let ability = active.ability;
    if ability == Ability::Intimidate {
        let target = state.get_side(side.other()).active();
        if target.is_alive() && target.ability != Ability::ClearBody {
            boost(state, branch, side.other(), PokemonBoostableStat::Attack, -1);
        }
    }
    if let Some(weather) = ability.weather_on_entry() {
        set_weather(state, branch, weather, side);
    }
    if let Some(terrain) = ability.terrain_on_entry() {
        set_terrain(state, branch, terrain, side);
    }
}

/// Replaces the active Pokémon of `side` with roster slot `next_index`,
/// running leave-field cleanup, entry hazards and entry abilities.
pub(crate) fn switch_out_and_in(state: &mut State, branch: &mut Branch, side: SideReference, next_index: usize) {
    let previous_index = state.get_side(side).active_index;
    if previous_index == next_index {
        return;
    }
    leave_field(state, branch, side);
    push(
        state,
        branch,
        Instruction::Switch {
            side,
            previous_index,
            next_index,
        },
    );
    let previous_last_used_move = state.get_side(side).last_used_move;
    let new_last_used_move = LastUsedMove::Switch(next_index);
    if previous_last_used_move != new_last_used_move {
        push(
            state,
            branch,
            Instruction::SetLastUsedMove {
                side,
                new_last_used_move,
                previous_last_used_move,
            },
        );
    }
    enter_hazards(state, branch, side);
    entry_abilities(state, branch, side);
}
