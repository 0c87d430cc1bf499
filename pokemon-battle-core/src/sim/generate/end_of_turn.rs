use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::types::PokemonType;
use crate::sim::generate::moves::{can_receive_status, inflict_status};
use crate::sim::generate::switching::{boost, damage_active, heal_active};
use crate::sim::generate::{extend, for_each_branch, push, Branch};
use crate::sim::instruction::Instruction;
use crate::sim::state::{SideReference, State};

const SIDES: [SideReference; 2] = [SideReference::SideOne, SideReference::SideTwo];

const TIMED_SIDE_CONDITIONS: [PokemonSideCondition; 6] = [
    PokemonSideCondition::Reflect,
    PokemonSideCondition::LightScreen,
    PokemonSideCondition::AuroraVeil,
    PokemonSideCondition::Tailwind,
    PokemonSideCondition::Safeguard,
    PokemonSideCondition::Mist,
];

fn each<F>(state: &mut State, frontier: Vec<Branch>, mut build: F) -> Vec<Branch>
where
    F: FnMut(&mut State, &mut Branch),
{
    for_each_branch(state, frontier, |state, branch| {
        vec![extend(state, branch, |state, branch| build(state, branch))]
    })
}

/// Residual effects applied once every branch has finished its actions.
pub(crate) fn run(state: &mut State, frontier: Vec<Branch>) -> Vec<Branch> {
    let frontier = each(state, frontier, weather);
    let frontier = each(state, frontier, terrain);
    let frontier = each(state, frontier, trick_room);
    let frontier = each(state, frontier, |state, branch| {
        for side in SIDES {
            wish(state, branch, side);
        }
    });
    let frontier = each(state, frontier, |state, branch| {
        for side in SIDES {
            residuals(state, branch, side);
        }
    });
    each(state, frontier, |state, branch| {
        for side in SIDES {
            expire_volatiles(state, branch, side);
            expire_side_conditions(state, branch, side);
            timed_volatiles(state, branch, side);
        }
    })
}

fn weather(state: &mut State, branch: &mut Branch) {
    let current = state.weather;
    if current.weather_type == Weather::None {
        return;
    }
    if current.turns_remaining > 0 {
        push(state, branch, Instruction::DecrementWeatherTurnsRemaining);
        if state.weather.turns_remaining == 0 {
            push(
                state,
                branch,
                Instruction::ChangeWeather {
                    new_weather: Weather::None,
                    new_turns_remaining: 0,
                    previous_weather: current.weather_type,
                    previous_turns_remaining: 0,
                },
            );
            return;
        }
    }

    let weather = state.effective_weather();
    if !matches!(weather, Weather::Sand | Weather::Hail) {
        return;
    }
    for side in SIDES {
        let active = state.get_side(side).active();
        let immune = match weather {
            Weather::Sand => [PokemonType::Rock, PokemonType::Ground, PokemonType::Steel]
                .iter()
                .any(|t| active.has_type(*t)),
            _ => active.has_type(PokemonType::Ice),
        };
        if active.is_alive() && !immune && active.ability != Ability::MagicGuard {
            let amount = active.fraction_of_max(1.0 / 16.0);
            damage_active(state, branch, side, amount);
        }
    }
}

fn terrain(state: &mut State, branch: &mut Branch) {
    let current = state.terrain;
    if current.terrain_type == Terrain::None {
        return;
    }
    if current.turns_remaining > 0 {
        push(state, branch, Instruction::DecrementTerrainTurnsRemaining);
        if state.terrain.turns_remaining == 0 {
            push(
                state,
                branch,
                Instruction::ChangeTerrain {
                    new_terrain: Terrain::None,
                    new_turns_remaining: 0,
                    previous_terrain: current.terrain_type,
                    previous_turns_remaining: 0,
                },
            );
            return;
        }
    }
    if current.terrain_type == Terrain::GrassyTerrain {
        for side in SIDES {
            let side_ref = state.get_side(side);
            if side_ref.active_is_grounded() {
                let amount = side_ref.active().fraction_of_max(1.0 / 16.0);
                heal_active(state, branch, side, amount);
            }
        }
    }
}

fn trick_room(state: &mut State, branch: &mut Branch) {
    if !state.trick_room.active || state.trick_room.turns_remaining <= 0 {
        return;
    }
    push(state, branch, Instruction::DecrementTrickRoomTurnsRemaining);
    if state.trick_room.turns_remaining == 0 {
        push(
            state,
            branch,
            Instruction::ToggleTrickRoom {
                currently_active: true,
                new_turns_remaining: 0,
                previous_turns_remaining: 0,
            },
        );
    }
}

fn wish(state: &mut State, branch: &mut Branch, side: SideReference) {
    let (turns, amount) = state.get_side(side).wish;
    if turns <= 0 {
        return;
    }
    push(state, branch, Instruction::DecrementWish { side });
    if turns == 1 {
        heal_active(state, branch, side, amount);
    }
}

fn residuals(state: &mut State, branch: &mut Branch, side: SideReference) {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if active.is_fainted() {
        return;
    }
    let magic_guard = active.ability == Ability::MagicGuard;
    let poison_heal = active.ability == Ability::PoisonHeal;
    let toxic_count = side_ref.side_conditions.toxic_count;
    let status = active.status;

    match status {
        PokemonStatus::Burn if !magic_guard => {
            let amount = active.fraction_of_max(1.0 / 16.0);
            damage_active(state, branch, side, amount);
        }
        PokemonStatus::Poison | PokemonStatus::Toxic if poison_heal => {
            let amount = active.fraction_of_max(1.0 / 8.0);
            heal_active(state, branch, side, amount);
        }
        PokemonStatus::Poison if !magic_guard => {
            let amount = active.fraction_of_max(1.0 / 8.0);
            damage_active(state, branch, side, amount);
        }
        PokemonStatus::Toxic if !magic_guard => {
            let amount = active.fraction_of_max((toxic_count + 1) as f32 / 16.0);
            damage_active(state, branch, side, amount);
        }
        _ => {}
    }
    if state.get_side(side).active().status == PokemonStatus::Toxic {
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition: PokemonSideCondition::ToxicCount,
                amount: 1,
            },
        );
    }

    held_item(state, branch, side, magic_guard);
    volatile_residuals(state, branch, side, magic_guard);

    let active = state.get_side(side).active();
    if active.is_alive() && active.ability == Ability::SpeedBoost {
        boost(state, branch, side, PokemonBoostableStat::Speed, 1);
    }
}

fn held_item(state: &mut State, branch: &mut Branch, side: SideReference, magic_guard: bool) {
    let active = state.get_side(side).active();
    if active.is_fainted() {
        return;
    }
    let item = active.item;
    match item {
        Item::Leftovers => {
            let amount = active.fraction_of_max(1.0 / 16.0);
            heal_active(state, branch, side, amount);
        }
        Item::BlackSludge if active.has_type(PokemonType::Poison) => {
            let amount = active.fraction_of_max(1.0 / 16.0);
            heal_active(state, branch, side, amount);
        }
        Item::BlackSludge if !magic_guard => {
            let amount = active.fraction_of_max(1.0 / 8.0);
            damage_active(state, branch, side, amount);
        }
        item => {
            if let Some(status) = item.end_of_turn_status() {
                if can_receive_status(state, side, status, false) {
                    inflict_status(state, branch, side, status);
                }
            }
        }
    }
}

fn volatile_residuals(state: &mut State, branch: &mut Branch, side: SideReference, magic_guard: bool) {
    if magic_guard {
        return;
    }
    let side_ref = state.get_side(side);
    let active = side_ref.active();

    if side_ref.has_volatile(PokemonVolatileStatus::SaltCure) && active.is_alive() {
        let fraction = if active.has_type(PokemonType::Water) || active.has_type(PokemonType::Steel) {
            1.0 / 4.0
        } else {
            1.0 / 8.0
        };
        let amount = active.fraction_of_max(fraction);
        damage_active(state, branch, side, amount);
    }

    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if side_ref.has_volatile(PokemonVolatileStatus::LeechSeed) && active.is_alive() {
        let drained = active.fraction_of_max(1.0 / 8.0).min(active.hp);
        damage_active(state, branch, side, drained);
        heal_active(state, branch, side.other(), drained);
    }

    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if side_ref.has_volatile(PokemonVolatileStatus::PartiallyTrapped) && active.is_alive() {
        let amount = active.fraction_of_max(1.0 / 8.0);
        damage_active(state, branch, side, amount);
    }
}

fn remove_volatile(state: &mut State, branch: &mut Branch, side: SideReference, volatile_status: PokemonVolatileStatus) {
    push(
        state,
        branch,
        Instruction::RemoveVolatileStatus {
            side,
            volatile_status,
        },
    );
}

fn expire_volatiles(state: &mut State, branch: &mut Branch, side: SideReference) {
    for volatile_status in [PokemonVolatileStatus::Flinch, PokemonVolatileStatus::Roost] {
        if state.get_side(side).has_volatile(volatile_status) {
            remove_volatile(state, branch, side, volatile_status);
        }
    }

    // Consecutive Protect fails; the counter survives only while it keeps succeeding.
    let side_ref = state.get_side(side);
    let protect_count = side_ref.side_conditions.protect;
    if side_ref.has_volatile(PokemonVolatileStatus::Protect) {
        remove_volatile(state, branch, side, PokemonVolatileStatus::Protect);
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition: PokemonSideCondition::Protect,
                amount: 1,
            },
        );
    } else if protect_count > 0 {
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition: PokemonSideCondition::Protect,
                amount: -protect_count,
            },
        );
    }
}

fn expire_side_conditions(state: &mut State, branch: &mut Branch, side: SideReference) {
    for condition in TIMED_SIDE_CONDITIONS {
        if state.get_side(side).side_conditions.get(condition) > 0 {
            push(
                state,
                branch,
                Instruction::ChangeSideCondition {
                    side,
                    condition,
                    amount: -1,
                },
            );
        }
    }
}

fn tick(state: &mut State, branch: &mut Branch, side: SideReference, volatile_status: PokemonVolatileStatus) -> bool {
    let remaining = state
        .get_side(side)
        .volatile_status_durations
        .get(volatile_status)
        .unwrap_or(0);
    if remaining > 0 {
        push(
            state,
            branch,
            Instruction::ChangeVolatileStatusDuration {
                side,
                volatile_status,
                amount: -1,
            },
        );
    }
    remaining <= 1
}

fn timed_volatiles(state: &mut State, branch: &mut Branch, side: SideReference) {
    if state.get_side(side).active().is_fainted() {
        return;
    }
    if state.get_side(side).has_volatile(PokemonVolatileStatus::Taunt)
        && tick(state, branch, side, PokemonVolatileStatus::Taunt)
    {
        remove_volatile(state, branch, side, PokemonVolatileStatus::Taunt);
    }
    if state.get_side(side).has_volatile(PokemonVolatileStatus::Yawn)
        && tick(state, branch, side, PokemonVolatileStatus::Yawn)
    {
        remove_volatile(state, branch, side, PokemonVolatileStatus::Yawn);
        if can_receive_status(state, side, PokemonStatus::Sleep, true) {
            inflict_status(state, branch, side, PokemonStatus::Sleep);
        }
    }
}
