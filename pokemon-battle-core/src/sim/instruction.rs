//! Reversible state mutations.
//!
//! Every [`Instruction`] carries enough data to be undone on its own, so a
//! branch can be applied to a state and later reversed back to the exact
//! previous value without snapshots.

use serde::Serialize;

use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::types::PokemonType;
use crate::sim::choice::MoveChoice;
use crate::sim::state::{LastUsedMove, SideReference, State};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Instruction {
    Switch {
        side: SideReference,
        previous_index: usize,
        next_index: usize,
    },
    Damage {
        side: SideReference,
        amount: i16,
    },
    Heal {
        side: SideReference,
        amount: i16,
    },
    ChangeStatus {
        side: SideReference,
        pokemon_index: usize,
        old_status: PokemonStatus,
        new_status: PokemonStatus,
    },
    Boost {
        side: SideReference,
        stat: PokemonBoostableStat,
        amount: i8,
    },
    ApplyVolatileStatus {
        side: SideReference,
        volatile_status: PokemonVolatileStatus,
    },
    RemoveVolatileStatus {
        side: SideReference,
        volatile_status: PokemonVolatileStatus,
    },
    ChangeVolatileStatusDuration {
        side: SideReference,
        volatile_status: PokemonVolatileStatus,
        amount: i8,
    },
    ChangeSideCondition {
        side: SideReference,
        condition: PokemonSideCondition,
        amount: i8,
    },
    ChangeWeather {
        new_weather: Weather,
        new_turns_remaining: i8,
        previous_weather: Weather,
        previous_turns_remaining: i8,
    },
    DecrementWeatherTurnsRemaining,
    ChangeTerrain {
        new_terrain: Terrain,
        new_turns_remaining: i8,
        previous_terrain: Terrain,
        previous_turns_remaining: i8,
    },
    DecrementTerrainTurnsRemaining,
    ToggleTrickRoom {
        currently_active: bool,
        new_turns_remaining: i8,
        previous_turns_remaining: i8,
    },
    DecrementTrickRoomTurnsRemaining,
    DecrementPP {
        side: SideReference,
        move_index: usize,
        amount: i8,
    },
    DisableMove {
        side: SideReference,
        move_index: usize,
    },
    EnableMove {
        side: SideReference,
        move_index: usize,
    },
    ChangeItem {
        side: SideReference,
        current_item: Item,
        new_item: Item,
    },
    ChangeType {
        side: SideReference,
        new_types: (PokemonType, PokemonType),
        old_types: (PokemonType, PokemonType),
    },
    SetSleepTurns {
        side: SideReference,
        pokemon_index: usize,
        new_turns: i8,
        previous_turns: i8,
    },
    SetRestTurns {
        side: SideReference,
        pokemon_index: usize,
        new_turns: i8,
        previous_turns: i8,
    },
    SetWish {
        side: SideReference,
        wish_amount: i16,
        previous_wish_amount: i16,
    },
    DecrementWish {
        side: SideReference,
    },
    DamageSubstitute {
        side: SideReference,
        amount: i16,
    },
    SetSubstituteHealth {
        side: SideReference,
        new_health: i16,
        old_health: i16,
    },
    ToggleForceSwitch {
        side: SideReference,
    },
    ToggleBatonPassing {
        side: SideReference,
    },
    ToggleSlowUturn {
        side: SideReference,
    },
    SetSecondMoveSwitchOutMove {
        side: SideReference,
        new_choice: MoveChoice,
        previous_choice: MoveChoice,
    },
    SetLastUsedMove {
        side: SideReference,
        new_last_used_move: LastUsedMove,
        previous_last_used_move: LastUsedMove,
    },
}

/// One outcome of a turn: its probability and the mutations that produce it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateInstructions {
    pub percentage: f32,
    pub instruction_list: Vec<Instruction>,
}

impl Default for StateInstructions {
    fn default() -> Self {
        StateInstructions {
            percentage: 1.0,
            instruction_list: Vec::new(),
        }
    }
}

impl StateInstructions {
    pub fn update_percentage(&mut self, modifier: f32) {
        self.percentage *= modifier;
    }
}

impl State {
    pub fn apply_instructions(&mut self, instructions: &[Instruction]) {
        for instruction in instructions {
            self.apply_one_instruction(instruction);
        }
    }

    pub fn reverse_instructions(&mut self, instructions: &[Instruction]) {
        for instruction in instructions.iter().rev() {
            self.reverse_one_instruction(instruction);
        }
    }

    pub fn apply_one_instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Switch {
                side, next_index, ..
            } => self.get_side_mut(*side).active_index = *next_index,
            Instruction::Damage { side, amount } => self.get_side_mut(*side).active_mut().hp -= amount,
            Instruction::Heal { side, amount } => self.get_side_mut(*side).active_mut().hp += amount,
            Instruction::ChangeStatus {
                side,
                pokemon_index,
                new_status,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].status = *new_status,
            Instruction::Boost { side, stat, amount } => {
                *self.get_side_mut(*side).boosts.get_mut(*stat) += amount
            }
            Instruction::ApplyVolatileStatus {
                side,
                volatile_status,
            } => {
                self.get_side_mut(*side)
                    .volatile_statuses
                    .insert(*volatile_status);
            }
            Instruction::RemoveVolatileStatus {
                side,
                volatile_status,
            } => {
                self.get_side_mut(*side)
                    .volatile_statuses
                    .remove(volatile_status);
            }
            Instruction::ChangeVolatileStatusDuration {
                side,
                volatile_status,
                amount,
            } => {
                if let Some(duration) = self
                    .get_side_mut(*side)
                    .volatile_status_durations
                    .get_mut(*volatile_status)
                {
                    *duration += amount;
                }
            }
            Instruction::ChangeSideCondition {
                side,
                condition,
                amount,
            } => *self.get_side_mut(*side).side_conditions.get_mut(*condition) += amount,
            Instruction::ChangeWeather {
                new_weather,
                new_turns_remaining,
                ..
            } => {
                self.weather.weather_type = *new_weather;
                self.weather.turns_remaining = *new_turns_remaining;
            }
            Instruction::DecrementWeatherTurnsRemaining => self.weather.turns_remaining -= 1,
            Instruction::ChangeTerrain {
                new_terrain,
                new_turns_remaining,
                ..
            } => {
                self.terrain.terrain_type = *new_terrain;
                self.terrain.turns_remaining = *new_turns_remaining;
            }
            Instruction::DecrementTerrainTurnsRemaining => self.terrain.turns_remaining -= 1,
            Instruction::ToggleTrickRoom {
                currently_active,
                new_turns_remaining,
                ..
            } => {
                self.trick_room.active = !currently_active;
                self.trick_room.turns_remaining = *new_turns_remaining;
            }
            Instruction::DecrementTrickRoomTurnsRemaining => self.trick_room.turns_remaining -= 1,
            Instruction::DecrementPP {
                side,
                move_index,
                amount,
            } => self.get_side_mut(*side).active_mut().moves[*move_index].pp -= amount,
            Instruction::DisableMove { side, move_index } => {
                self.get_side_mut(*side).active_mut().moves[*move_index].disabled = true
            }
            Instruction::EnableMove { side, move_index } => {
                self.get_side_mut(*side).active_mut().moves[*move_index].disabled = false
            }
            Instruction::ChangeItem { side, new_item, .. } => {
                self.get_side_mut(*side).active_mut().item = *new_item
            }
            Instruction::ChangeType { side, new_types, .. } => {
                self.get_side_mut(*side).active_mut().types = *new_types
            }
            Instruction::SetSleepTurns {
                side,
                pokemon_index,
                new_turns,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].sleep_turns = *new_turns,
            Instruction::SetRestTurns {
                side,
                pokemon_index,
                new_turns,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].rest_turns = *new_turns,
            Instruction::SetWish {
                side, wish_amount, ..
            } => self.get_side_mut(*side).wish = (2, *wish_amount),
            Instruction::DecrementWish { side } => self.get_side_mut(*side).wish.0 -= 1,
            Instruction::DamageSubstitute { side, amount } => {
                self.get_side_mut(*side).substitute_health -= amount
            }
            Instruction::SetSubstituteHealth {
                side, new_health, ..
            } => self.get_side_mut(*side).substitute_health = *new_health,
            Instruction::ToggleForceSwitch { side } => {
                let side = self.get_side_mut(*side);
                side.force_switch = !side.force_switch;
            }
            Instruction::ToggleBatonPassing { side } => {
                let side = self.get_side_mut(*side);
                side.baton_passing = !side.baton_passing;
            }
            Instruction::ToggleSlowUturn { side } => {
                let side = self.get_side_mut(*side);
                side.slow_uturn_move = !side.slow_uturn_move;
            }
            Instruction::SetSecondMoveSwitchOutMove {
                side, new_choice, ..
            } => self.get_side_mut(*side).switch_out_move_second_saved_move = *new_choice,
            Instruction::SetLastUsedMove {
                side,
                new_last_used_move,
                ..
            } => self.get_side_mut(*side).last_used_move = *new_last_used_move,
        }
    }

    pub fn reverse_one_instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Switch {
                side,
                previous_index,
                ..
            } => self.get_side_mut(*side).active_index = *previous_index,
            Instruction::Damage { side, amount } => self.get_side_mut(*side).active_mut().hp += amount,
            Instruction::Heal { side, amount } => self.get_side_mut(*side).active_mut().hp -= amount,
            Instruction::ChangeStatus {
                side,
                pokemon_index,
                old_status,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].status = *old_status,
            Instruction::Boost { side, stat, amount } => {
                *self.get_side_mut(*side).boosts.get_mut(*stat) -= amount
            }
            Instruction::ApplyVolatileStatus {
                side,
                volatile_status,
            } => {
                self.get_side_mut(*side)
                    .volatile_statuses
                    .remove(volatile_status);
            }
            Instruction::RemoveVolatileStatus {
                side,
                volatile_status,
            } => {
                self.get_side_mut(*side)
                    .volatile_statuses
                    .insert(*volatile_status);
            }
            Instruction::ChangeVolatileStatusDuration {
                side,
                volatile_status,
                amount,
            } => {
                if let Some(duration) = self
                    .get_side_mut(*side)
                    .volatile_status_durations
                    .get_mut(*volatile_status)
                {
                    *duration -= amount;
                }
            }
            Instruction::ChangeSideCondition {
                side,
                condition,
                amount,
            } => *self.get_side_mut(*side).side_conditions.get_mut(*condition) -= amount,
            Instruction::ChangeWeather {
                previous_weather,
                previous_turns_remaining,
                ..
            } => {
                self.weather.weather_type = *previous_weather;
                self.weather.turns_remaining = *previous_turns_remaining;
            }
            Instruction::DecrementWeatherTurnsRemaining => self.weather.turns_remaining += 1,
            Instruction::ChangeTerrain {
                previous_terrain,
                previous_turns_remaining,
                ..
            } => {
                self.terrain.terrain_type = *previous_terrain;
                self.terrain.turns_remaining = *previous_turns_remaining;
            }
            Instruction::DecrementTerrainTurnsRemaining => self.terrain.turns_remaining += 1,
            Instruction::ToggleTrickRoom {
                currently_active,
                previous_turns_remaining,
                ..
            } => {
                self.trick_room.active = *currently_active;
                self.trick_room.turns_remaining = *previous_turns_remaining;
            }
            Instruction::DecrementTrickRoomTurnsRemaining => self.trick_room.turns_remaining += 1,
            Instruction::DecrementPP {
                side,
                move_index,
                amount,
            } => self.get_side_mut(*side).active_mut().moves[*move_index].pp += amount,
            Instruction::DisableMove { side, move_index } => {
                self.get_side_mut(*side).active_mut().moves[*move_index].disabled = false
            }
            Instruction::EnableMove { side, move_index } => {
                self.get_side_mut(*side).active_mut().moves[*move_index].disabled = true
            }
            Instruction::ChangeItem {
                side, current_item, ..
            } => self.get_side_mut(*side).active_mut().item = *current_item,
            Instruction::ChangeType { side, old_types, .. } => {
                self.get_side_mut(*side).active_mut().types = *old_types
            }
            Instruction::SetSleepTurns {
                side,
                pokemon_index,
                previous_turns,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].sleep_turns = *previous_turns,
            Instruction::SetRestTurns {
                side,
                pokemon_index,
                previous_turns,
                ..
            } => self.get_side_mut(*side).pokemon[*pokemon_index].rest_turns = *previous_turns,
            Instruction::SetWish {
                side,
                previous_wish_amount,
                ..
            } => self.get_side_mut(*side).wish = (0, *previous_wish_amount),
            Instruction::DecrementWish { side } => self.get_side_mut(*side).wish.0 += 1,
            Instruction::DamageSubstitute { side, amount } => {
                self.get_side_mut(*side).substitute_health += amount
            }
            Instruction::SetSubstituteHealth {
                side, old_health, ..
            } => self.get_side_mut(*side).substitute_health = *old_health,
            Instruction::ToggleForceSwitch { .. }
            | Instruction::ToggleBatonPassing { .. }
            | Instruction::ToggleSlowUturn { .. } => self.apply_one_instruction(instruction),
            Instruction::SetSecondMoveSwitchOutMove {
                side,
                previous_choice,
                ..
            } => self.get_side_mut(*side).switch_out_move_second_saved_move = *previous_choice,
            Instruction::SetLastUsedMove {
                side,
                previous_last_used_move,
                ..
            } => self.get_side_mut(*side).last_used_move = *previous_last_used_move,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Move;

    fn sample_instructions() -> Vec<Instruction> {
        vec![
            Instruction::Damage {
                side: SideReference::SideTwo,
                amount: 40,
            },
            Instruction::Boost {
                side: SideReference::SideOne,
                stat: PokemonBoostableStat::Attack,
                amount: 2,
            },
            Instruction::ApplyVolatileStatus {
                side: SideReference::SideTwo,
                volatile_status: PokemonVolatileStatus::Confusion,
            },
            Instruction::ChangeVolatileStatusDuration {
                side: SideReference::SideTwo,
                volatile_status: PokemonVolatileStatus::Confusion,
                amount: 3,
            },
            Instruction::ChangeSideCondition {
                side: SideReference::SideOne,
                condition: PokemonSideCondition::Spikes,
                amount: 1,
            },
            Instruction::ChangeWeather {
                new_weather: Weather::Rain,
                new_turns_remaining: 5,
                previous_weather: Weather::None,
                previous_turns_remaining: 0,
            },
            Instruction::ToggleTrickRoom {
                currently_active: false,
                new_turns_remaining: 5,
                previous_turns_remaining: 0,
            },
            Instruction::DecrementPP {
                side: SideReference::SideOne,
                move_index: 0,
                amount: 1,
            },
            Instruction::Switch {
                side: SideReference::SideOne,
                previous_index: 0,
                next_index: 2,
            },
            Instruction::ChangeStatus {
                side: SideReference::SideOne,
                pokemon_index: 2,
                old_status: PokemonStatus::None,
                new_status: PokemonStatus::Toxic,
            },
            Instruction::SetWish {
                side: SideReference::SideTwo,
                wish_amount: 50,
                previous_wish_amount: 0,
            },
            Instruction::ToggleForceSwitch {
                side: SideReference::SideTwo,
            },
            Instruction::SetLastUsedMove {
                side: SideReference::SideOne,
                new_last_used_move: LastUsedMove::Switch(2),
                previous_last_used_move: LastUsedMove::None,
            },
        ]
    }

    #[test]
    fn reversing_restores_the_original_state() {
        let mut state = State::default();
        state.side_one.active_mut().moves[0] = Move::from_id("tackle").expect("tackle");
        let original = state.clone();
        let instructions = sample_instructions();

        state.apply_instructions(&instructions);
        assert_ne!(state, original);
        assert_eq!(state.side_two.active().hp, 60);
        assert_eq!(state.side_one.active_index, 2);
        assert_eq!(state.side_one.pokemon[2].status, PokemonStatus::Toxic);
        assert_eq!(state.side_one.pokemon[0].moves[0].pp, 34);
        assert!(state.trick_room.active);
        assert_eq!(state.side_two.wish, (2, 50));

        state.reverse_instructions(&instructions);
        assert_eq!(state, original);
    }

    #[test]
    fn toggles_are_self_inverse() {
        let mut state = State::default();
        let toggle = [Instruction::ToggleBatonPassing {
            side: SideReference::SideOne,
        }];
        state.apply_instructions(&toggle);
        assert!(state.side_one.baton_passing);
        state.reverse_instructions(&toggle);
        assert!(!state.side_one.baton_passing);
    }
}
