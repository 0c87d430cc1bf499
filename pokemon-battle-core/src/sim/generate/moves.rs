use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::moves::{
    MoveCategory, MoveData, MoveEffect, MoveTarget, Secondary, SecondaryEffect, SideConditionEffect,
    StatBoosts,
};
use crate::data::types::{type_effectiveness, PokemonType};
use crate::sim::choice::MoveChoice;
use crate::sim::damage::{confusion_damage, damage_rolls, move_effectiveness, DamageResult};
use crate::sim::generate::switching::{
    boost, damage_active, heal_active, set_terrain, set_weather, switch_out_and_in, FIELD_TURNS,
};
use crate::sim::generate::{extend, for_each_branch, fork, push, split, Branch};
use crate::sim::instruction::Instruction;
use crate::sim::state::{LastUsedMove, SideReference, State};
use crate::sim::stats::accuracy_stage_multiplier;

const CRIT_CHANCE: f32 = 1.0 / 24.0;
const HIGH_CRIT_CHANCE: f32 = 1.0 / 8.0;
const WAKE_CHANCE: f32 = 1.0 / 3.0;
const MAX_SLEEP_TURNS: i8 = 3;
const THAW_CHANCE: f32 = 0.2;
const FULL_PARALYSIS_CHANCE: f32 = 0.25;
const CONFUSION_SELF_HIT_CHANCE: f32 = 1.0 / 3.0;

const SCREEN_TURNS: i8 = 5;
const LIGHT_CLAY_SCREEN_TURNS: i8 = 8;
const TAILWIND_TURNS: i8 = 4;
const TRICK_ROOM_TURNS: i8 = 5;
const REST_TURNS: i8 = 3;
const CONFUSION_TURNS: i8 = 3;
const TAUNT_TURNS: i8 = 3;
const YAWN_TURNS: i8 = 2;

const HAZARDS: [PokemonSideCondition; 4] = [
    PokemonSideCondition::Spikes,
    PokemonSideCondition::ToxicSpikes,
    PokemonSideCondition::Stealthrock,
    PokemonSideCondition::StickyWeb,
];

/// Everything a phase needs to know about the move being resolved.
#[derive(Clone, Copy)]
struct MoveContext<'a> {
    side: SideReference,
    move_index: usize,
    data: &'static MoveData,
    opponent_choice: &'a MoveChoice,
    moves_first: bool,
}

impl MoveContext<'_> {
    fn target(&self) -> SideReference {
        self.side.other()
    }
}

fn phase<F>(state: &mut State, frontier: Vec<Branch>, mut run: F) -> Vec<Branch>
where
    F: FnMut(&mut State, Branch) -> Vec<Branch>,
{
    for_each_branch(state, frontier, |state, branch| {
        if branch.halted {
            vec![branch]
        } else {
            run(state, branch)
        }
    })
}

fn single<F>(state: &mut State, frontier: Vec<Branch>, mut build: F) -> Vec<Branch>
where
    F: FnMut(&mut State, &mut Branch),
{
    phase(state, frontier, |state, branch| {
        vec![extend(state, branch, |state, branch| build(state, branch))]
    })
}

/// Runs the move in slot `move_index` of `side`'s active Pokémon over every
/// branch of the frontier.
pub(crate) fn run_move(
    state: &mut State,
    frontier: Vec<Branch>,
    side: SideReference,
    move_index: usize,
    opponent_choice: &MoveChoice,
    moves_first: bool,
) -> Vec<Branch> {
    let ctx = MoveContext {
        side,
        move_index,
        data: state.get_side(side).active().moves[move_index].id.data(),
        opponent_choice,
        moves_first,
    };

    let mut frontier = for_each_branch(state, frontier, |state, mut branch| {
        if state.get_side(side).active().is_fainted() || (!moves_first && branch.dragged) {
            branch.halted = true;
        }
        vec![branch]
    });
    frontier = phase(state, frontier, |state, branch| status_check(state, branch, &ctx));
    frontier = single(state, frontier, |state, branch| flinch_and_taunt(state, branch, &ctx));
    frontier = phase(state, frontier, |state, branch| confusion_check(state, branch, &ctx));
    frontier = single(state, frontier, |state, branch| commit(state, branch, &ctx));
    frontier = single(state, frontier, |state, branch| pre_hit_checks(state, branch, &ctx));
    frontier = phase(state, frontier, |state, branch| accuracy_check(state, branch, &ctx));
    frontier = phase(state, frontier, |state, branch| damage(state, branch, &ctx));
    frontier = single(state, frontier, |state, branch| apply_effects(state, branch, &ctx));
    for secondary in ctx.data.secondaries {
        frontier = phase(state, frontier, |state, branch| {
            secondary_effect(state, branch, &ctx, secondary)
        });
    }
    phase(state, frontier, |state, branch| after_move(state, branch, &ctx))
}

fn wake(state: &mut State, branch: &mut Branch, side: SideReference) {
    let side_ref = state.get_side(side);
    let pokemon_index = side_ref.active_index;
    let previous_turns = side_ref.active().sleep_turns;
    push(
        state,
        branch,
        Instruction::ChangeStatus {
            side,
            pokemon_index,
            old_status: PokemonStatus::Sleep,
            new_status: PokemonStatus::None,
        },
    );
    if previous_turns != 0 {
        push(
            state,
            branch,
            Instruction::SetSleepTurns {
                side,
                pokemon_index,
                new_turns: 0,
                previous_turns,
            },
        );
    }
}

fn status_check(state: &mut State, branch: Branch, ctx: &MoveContext) -> Vec<Branch> {
    let side = ctx.side;
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    let pokemon_index = side_ref.active_index;
    let (status, rest_turns, sleep_turns) = (active.status, active.rest_turns, active.sleep_turns);

    match status {
        PokemonStatus::Sleep if rest_turns > 0 => vec![extend(state, branch, |state, branch| {
            push(
                state,
                branch,
                Instruction::SetRestTurns {
                    side,
                    pokemon_index,
                    new_turns: rest_turns - 1,
                    previous_turns: rest_turns,
                },
            );
            if rest_turns == 1 {
                wake(state, branch, side);
            } else {
                branch.halted = true;
            }
        })],
        PokemonStatus::Sleep => {
            let chance = if sleep_turns >= MAX_SLEEP_TURNS {
                1.0
            } else {
                WAKE_CHANCE
            };
            split(
                state,
                branch,
                chance,
                |state, branch| wake(state, branch, side),
                |state, branch| {
                    push(
                        state,
                        branch,
                        Instruction::SetSleepTurns {
                            side,
                            pokemon_index,
                            new_turns: sleep_turns + 1,
                            previous_turns: sleep_turns,
                        },
                    );
                    branch.halted = true;
                },
            )
        }
        PokemonStatus::Freeze => split(
            state,
            branch,
            THAW_CHANCE,
            |state, branch| {
                push(
                    state,
                    branch,
                    Instruction::ChangeStatus {
                        side,
                        pokemon_index,
                        old_status: PokemonStatus::Freeze,
                        new_status: PokemonStatus::None,
                    },
                )
            },
            |_, branch| branch.halted = true,
        ),
        PokemonStatus::Paralyze => split(
            state,
            branch,
            FULL_PARALYSIS_CHANCE,
            |_, branch| branch.halted = true,
            |_, _| {},
        ),
        _ => vec![branch],
    }
}

fn flinch_and_taunt(state: &mut State, branch: &mut Branch, ctx: &MoveContext) {
    let side_ref = state.get_side(ctx.side);
    if side_ref.has_volatile(PokemonVolatileStatus::Flinch)
        || (side_ref.has_volatile(PokemonVolatileStatus::Taunt)
            && ctx.data.category == MoveCategory::Status)
    {
        branch.halted = true;
    }
}

fn confusion_check(state: &mut State, branch: Branch, ctx: &MoveContext) -> Vec<Branch> {
    let side = ctx.side;
    let side_ref = state.get_side(side);
    if !side_ref.has_volatile(PokemonVolatileStatus::Confusion) {
        return vec![branch];
    }
    let duration = side_ref.volatile_status_durations.confusion;
    let decrement = move |state: &mut State, branch: &mut Branch| {
        push(
            state,
            branch,
            Instruction::ChangeVolatileStatusDuration {
                side,
                volatile_status: PokemonVolatileStatus::Confusion,
                amount: -1,
            },
        )
    };
    if duration <= 1 {
        return vec![extend(state, branch, |state, branch| {
            if duration == 1 {
                decrement(state, branch);
            }
            push(
                state,
                branch,
                Instruction::RemoveVolatileStatus {
                    side,
                    volatile_status: PokemonVolatileStatus::Confusion,
                },
            );
        })];
    }
    split(
        state,
        branch,
        CONFUSION_SELF_HIT_CHANCE,
        |state, branch| {
            decrement(state, branch);
            let amount = confusion_damage(state, side);
            damage_active(state, branch, side, amount);
            branch.halted = true;
        },
        decrement,
    )
}

fn commit(state: &mut State, branch: &mut Branch, ctx: &MoveContext) {
    let side = ctx.side;
    let active = state.get_side(side).active();
    if active.moves[ctx.move_index].pp > 0 {
        push(
            state,
            branch,
            Instruction::DecrementPP {
                side,
                move_index: ctx.move_index,
                amount: 1,
            },
        );
    }

    let previous_last_used_move = state.get_side(side).last_used_move;
    let new_last_used_move = LastUsedMove::Move(ctx.move_index);
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

    let active = state.get_side(side).active();
    if active.item.is_choice_item() {
        let locked: Vec<usize> = active
            .moves
            .iter()
            .enumerate()
            .filter(|(index, m)| *index != ctx.move_index && !m.id.is_none() && !m.disabled)
            .map(|(index, _)| index)
            .collect();
        for move_index in locked {
            push(state, branch, Instruction::DisableMove { side, move_index });
        }
    }
}

/// Whether the move is aimed at the opposing Pokémon.
fn targets_opponent(data: &MoveData) -> bool {
    data.category != MoveCategory::Status || data.flags.protect
}

fn is_protect_move(data: &MoveData) -> bool {
    matches!(data.volatile_status, Some(v) if v.volatile_status == PokemonVolatileStatus::Protect)
}

fn opponent_attacks(state: &State, ctx: &MoveContext) -> bool {
    match ctx.opponent_choice {
        MoveChoice::Move(index) => {
            state.get_side(ctx.target()).active().moves[*index].id.data().category
                != MoveCategory::Status
        }
        _ => false,
    }
}

fn pre_hit_checks(state: &mut State, branch: &mut Branch, ctx: &MoveContext) {
    let data = ctx.data;
    let (user, opponent) = state.get_both_sides(ctx.side);
    let target = opponent.active();

    let fails = (data.effect == MoveEffect::SuckerPunch
        && (!ctx.moves_first || !opponent_attacks(state, ctx)))
        || (is_protect_move(data) && user.side_conditions.protect > 0)
        || (targets_opponent(data) && target.is_fainted())
        || (data.flags.protect && opponent.has_volatile(PokemonVolatileStatus::Protect))
        || (data.flags.powder && target.has_type(PokemonType::Grass))
        || (data.category == MoveCategory::Status
            && data.status.is_some()
            && type_effectiveness(data.move_type, target.types) == 0.0);
    if fails {
        branch.halted = true;
    }
}

fn accuracy_check(state: &mut State, branch: Branch, ctx: &MoveContext) -> Vec<Branch> {
    let data = ctx.data;
    if data.accuracy > 100.0 {
        return vec![branch];
    }
    let side = ctx.side;
    let (user, opponent) = state.get_both_sides(side);
    let stage = (user.boosts.accuracy - opponent.boosts.evasion).clamp(-6, 6);
    let hit_chance = (data.accuracy / 100.0 * accuracy_stage_multiplier(stage)).min(1.0);
    let crash = data
        .crash
        .filter(|_| user.active().ability != Ability::MagicGuard)
        .map(|fraction| (user.active().maxhp as f32 * fraction) as i16);

    split(
        state,
        branch,
        hit_chance,
        |_, _| {},
        move |state, branch| {
            if let Some(amount) = crash {
                damage_active(state, branch, side, amount);
            }
            branch.halted = true;
        },
    )
}

/// Damage goes into the target's substitute instead of the Pokémon.
fn hits_substitute(state: &State, ctx: &MoveContext) -> bool {
    let (user, opponent) = state.get_both_sides(ctx.side);
    opponent.has_volatile(PokemonVolatileStatus::Substitute)
        && opponent.substitute_health > 0
        && !ctx.data.flags.sound
        && user.active().ability != Ability::Infiltrator
}

/// Groups a roll set into a knockout bucket and a surviving bucket whose
/// damage is the mean surviving roll.
fn add_buckets(outcomes: &mut Vec<(f32, i16)>, probability: f32, rolls: &[i16], hp: i16) {
    if rolls.is_empty() || probability <= 0.0 {
        return;
    }
    let total = rolls.len() as f32;
    let (knockouts, survivors): (Vec<i16>, Vec<i16>) = rolls.iter().copied().partition(|roll| *roll >= hp);
    let mut add = |chance: f32, amount: i16| {
        match outcomes.iter_mut().find(|(_, existing)| *existing == amount) {
            Some((existing_chance, _)) => *existing_chance += chance,
            None => outcomes.push((chance, amount)),
        }
    };
    if !knockouts.is_empty() {
        add(probability * knockouts.len() as f32 / total, hp);
    }
    if !survivors.is_empty() {
        let sum: i32 = survivors.iter().map(|roll| *roll as i32).sum();
        let mean = (sum / survivors.len() as i32) as i16;
        add(probability * survivors.len() as f32 / total, mean);
    }
}

fn damage(state: &mut State, mut branch: Branch, ctx: &MoveContext) -> Vec<Branch> {
    let data = ctx.data;
    if data.category == MoveCategory::Status {
        return vec![branch];
    }
    let side = ctx.side;
    let target = ctx.target();

    if data.effect == MoveEffect::LevelDamage {
        if move_effectiveness(state, side, data) == 0.0 {
            branch.halted = true;
            return vec![branch];
        }
        let amount = state.get_side(side).active().level as i16;
        return vec![extend(state, branch, |state, branch| {
            deal_damage(state, branch, ctx, amount)
        })];
    }

    let mut base_power = data.base_power;
    if data.effect == MoveEffect::Pursuit && ctx.moves_first && ctx.opponent_choice.is_switch() {
        base_power *= 2.0;
    }
    if data.effect == MoveEffect::KnockOff && state.get_side(target).active().item != Item::NoItem {
        base_power *= 1.5;
    }

    let normal = match damage_rolls(state, side, data, base_power, false) {
        DamageResult::Rolls(rolls) => rolls,
        DamageResult::Immune => {
            return vec![extend(state, branch, |state, branch| {
                let defender = state.get_side(target).active();
                if defender.ability.absorbs_type() == Some(data.move_type) {
                    let amount = defender.maxhp / 4;
                    heal_active(state, branch, target, amount);
                }
                branch.halted = true;
            })];
        }
        DamageResult::NoDamage => return vec![branch],
    };
    let critical = damage_rolls(state, side, data, base_power, true).into_rolls();
    let crit_chance = if data.high_crit {
        HIGH_CRIT_CHANCE
    } else {
        CRIT_CHANCE
    };

    let hp = if hits_substitute(state, ctx) {
        state.get_side(target).substitute_health
    } else {
        state.get_side(target).active().hp
    };
    let mut outcomes = Vec::new();
    add_buckets(&mut outcomes, 1.0 - crit_chance, &normal, hp);
    add_buckets(&mut outcomes, crit_chance, &critical, hp);

    outcomes
        .into_iter()
        .map(|(probability, amount)| {
            fork(state, &branch, probability, |state, branch| {
                deal_damage(state, branch, ctx, amount)
            })
        })
        .collect()
}

fn deal_damage(state: &mut State, branch: &mut Branch, ctx: &MoveContext, amount: i16) {
    let side = ctx.side;
    let target = ctx.target();
    branch.landed = true;

    let dealt = if hits_substitute(state, ctx) {
        branch.hit_substitute = true;
        let substitute = state.get_side(target).substitute_health;
        let dealt = amount.min(substitute);
        push(state, branch, Instruction::DamageSubstitute { side: target, amount: dealt });
        if dealt >= substitute {
            push(
                state,
                branch,
                Instruction::RemoveVolatileStatus {
                    side: target,
                    volatile_status: PokemonVolatileStatus::Substitute,
                },
            );
        }
        dealt
    } else {
        let defender = state.get_side(target).active();
        let (hp, maxhp, item, ability) = (defender.hp, defender.maxhp, defender.item, defender.ability);
        let mut dealt = amount.min(hp);
        let endures = dealt >= hp && hp == maxhp && (item == Item::FocusSash || ability == Ability::Sturdy);
        if endures {
            dealt = hp - 1;
        }
        if dealt > 0 {
            push(state, branch, Instruction::Damage { side: target, amount: dealt });
        }
        let item_used = (endures && ability != Ability::Sturdy) || (item == Item::AirBalloon && dealt > 0);
        if item_used {
            push(
                state,
                branch,
                Instruction::ChangeItem {
                    side: target,
                    current_item: item,
                    new_item: Item::NoItem,
                },
            );
        }
        if ctx.data.flags.contact {
            contact_punishment(state, branch, side, item, ability);
        }
        dealt
    };

    let user = state.get_side(side).active();
    let magic_guard = user.ability == Ability::MagicGuard;
    let life_orb = user.item == Item::LifeOrb;
    let maxhp = user.maxhp;
    if let Some(drain) = ctx.data.drain.filter(|_| dealt > 0) {
        heal_active(state, branch, side, ((dealt as f32 * drain) as i16).max(1));
    }
    if let Some(recoil) = ctx.data.recoil {
        if !magic_guard && dealt > 0 {
            damage_active(state, branch, side, ((dealt as f32 * recoil) as i16).max(1));
        }
    }
    if life_orb && !magic_guard && dealt > 0 {
        damage_active(state, branch, side, maxhp / 10);
    }
}

fn contact_punishment(state: &mut State, branch: &mut Branch, side: SideReference, item: Item, ability: Ability) {
    let user = state.get_side(side).active();
    if user.ability == Ability::MagicGuard {
        return;
    }
    let maxhp = user.maxhp;
    if item == Item::RockyHelmet {
        damage_active(state, branch, side, maxhp / 6);
    }
    if matches!(ability, Ability::RoughSkin | Ability::IronBarbs) {
        damage_active(state, branch, side, maxhp / 8);
    }
}

/// Whether `side`'s active Pokémon can take `status` right now.
pub(crate) fn can_receive_status(state: &State, side: SideReference, status: PokemonStatus, from_opponent: bool) -> bool {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if status == PokemonStatus::None || active.is_fainted() || active.status != PokemonStatus::None {
        return false;
    }
    if active.ability.blocks_status(status) || (from_opponent && side_ref.side_conditions.safeguard > 0) {
        return false;
    }
    let grounded = side_ref.active_is_grounded();
    if grounded && state.terrain_is_active(Terrain::MistyTerrain) {
        return false;
    }
    match status {
        PokemonStatus::Burn => !active.has_type(PokemonType::Fire),
        PokemonStatus::Paralyze => !active.has_type(PokemonType::Electric),
        PokemonStatus::Poison | PokemonStatus::Toxic => {
            !active.has_type(PokemonType::Poison) && !active.has_type(PokemonType::Steel)
        }
        PokemonStatus::Freeze => !active.has_type(PokemonType::Ice),
        PokemonStatus::Sleep => !(grounded && state.terrain_is_active(Terrain::ElectricTerrain)),
        PokemonStatus::None => false,
    }
}

pub(crate) fn inflict_status(state: &mut State, branch: &mut Branch, side: SideReference, new_status: PokemonStatus) {
    let side_ref = state.get_side(side);
    let pokemon_index = side_ref.active_index;
    let active = side_ref.active();
    let (old_status, previous_turns) = (active.status, active.sleep_turns);
    push(
        state,
        branch,
        Instruction::ChangeStatus {
            side,
            pokemon_index,
            old_status,
            new_status,
        },
    );
    if new_status == PokemonStatus::Sleep && previous_turns != 0 {
        push(
            state,
            branch,
            Instruction::SetSleepTurns {
                side,
                pokemon_index,
                new_turns: 0,
                previous_turns,
            },
        );
    }
}

pub(crate) fn apply_volatile(state: &mut State, branch: &mut Branch, side: SideReference, volatile_status: PokemonVolatileStatus) {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    if active.is_fainted() || side_ref.has_volatile(volatile_status) {
        return;
    }
    let (hp, maxhp, status) = (active.hp, active.maxhp, active.status);
    let grass = active.has_type(PokemonType::Grass);
    match volatile_status {
        PokemonVolatileStatus::Substitute => {
            let cost = maxhp / 4;
            if hp <= cost {
                return;
            }
            let old_health = side_ref.substitute_health;
            damage_active(state, branch, side, cost);
            push(
                state,
                branch,
                Instruction::SetSubstituteHealth {
                    side,
                    new_health: cost,
                    old_health,
                },
            );
        }
        PokemonVolatileStatus::LeechSeed if grass => return,
        PokemonVolatileStatus::Yawn if status != PokemonStatus::None => return,
        _ => {}
    }
    push(
        state,
        branch,
        Instruction::ApplyVolatileStatus {
            side,
            volatile_status,
        },
    );

    let turns = match volatile_status {
        PokemonVolatileStatus::Confusion => CONFUSION_TURNS,
        PokemonVolatileStatus::Taunt => TAUNT_TURNS,
        PokemonVolatileStatus::Yawn => YAWN_TURNS,
        _ => return,
    };
    let current = state
        .get_side(side)
        .volatile_status_durations
        .get(volatile_status)
        .unwrap_or(0);
    if current != turns {
        push(
            state,
            branch,
            Instruction::ChangeVolatileStatusDuration {
                side,
                volatile_status,
                amount: turns - current,
            },
        );
    }
}

fn stat_changes(boosts: &StatBoosts) -> [(PokemonBoostableStat, i8); 7] {
    [
        (PokemonBoostableStat::Attack, boosts.attack),
        (PokemonBoostableStat::Defense, boosts.defense),
        (PokemonBoostableStat::SpecialAttack, boosts.special_attack),
        (PokemonBoostableStat::SpecialDefense, boosts.special_defense),
        (PokemonBoostableStat::Speed, boosts.speed),
        (PokemonBoostableStat::Accuracy, boosts.accuracy),
        (PokemonBoostableStat::Evasion, boosts.evasion),
    ]
}

fn apply_boosts(state: &mut State, branch: &mut Branch, side: SideReference, boosts: &StatBoosts, from_opponent: bool) {
    let side_ref = state.get_side(side);
    if side_ref.active().is_fainted() {
        return;
    }
    let drops_blocked = from_opponent
        && (side_ref.active().ability == Ability::ClearBody || side_ref.side_conditions.mist > 0);
    for (stat, amount) in stat_changes(boosts) {
        if amount == 0 || (amount < 0 && drops_blocked) {
            continue;
        }
        boost(state, branch, side, stat, amount);
    }
}

/// Positive fractions heal, negative ones cost that share of max HP.
fn apply_heal(state: &mut State, branch: &mut Branch, side: SideReference, fraction: f32) {
    let maxhp = state.get_side(side).active().maxhp;
    let amount = (maxhp as f32 * fraction.abs()) as i16;
    if fraction > 0.0 {
        heal_active(state, branch, side, amount);
    } else {
        damage_active(state, branch, side, amount);
    }
}

fn set_side_condition(state: &mut State, branch: &mut Branch, ctx: &MoveContext, effect: &SideConditionEffect) {
    let side = match effect.target {
        MoveTarget::User => ctx.side,
        MoveTarget::Opponent => ctx.target(),
    };
    let condition = effect.condition;
    let current = state.get_side(side).side_conditions.get(condition);
    let screen_turns = if state.get_side(ctx.side).active().item == Item::LightClay {
        LIGHT_CLAY_SCREEN_TURNS
    } else {
        SCREEN_TURNS
    };
    let amount = match condition {
        _ if current >= condition.max_layers() => 0,
        PokemonSideCondition::Spikes
        | PokemonSideCondition::ToxicSpikes
        | PokemonSideCondition::Stealthrock
        | PokemonSideCondition::StickyWeb => 1,
        PokemonSideCondition::Reflect | PokemonSideCondition::LightScreen => screen_turns,
        PokemonSideCondition::AuroraVeil => {
            if state.weather_is_active(Weather::Hail) || state.weather_is_active(Weather::Snow) {
                screen_turns
            } else {
                0
            }
        }
        PokemonSideCondition::Tailwind => TAILWIND_TURNS,
        PokemonSideCondition::Safeguard | PokemonSideCondition::Mist => FIELD_TURNS,
        _ => 1,
    };
    if amount != 0 {
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition,
                amount,
            },
        );
    }
}

fn clear_side_condition(state: &mut State, branch: &mut Branch, side: SideReference, condition: PokemonSideCondition) {
    let current = state.get_side(side).side_conditions.get(condition);
    if current != 0 {
        push(
            state,
            branch,
            Instruction::ChangeSideCondition {
                side,
                condition,
                amount: -current,
            },
        );
    }
}

fn remove_volatile(state: &mut State, branch: &mut Branch, side: SideReference, volatile_status: PokemonVolatileStatus) {
    if state.get_side(side).has_volatile(volatile_status) {
        push(
            state,
            branch,
            Instruction::RemoveVolatileStatus {
                side,
                volatile_status,
            },
        );
    }
}

fn special_effect(state: &mut State, branch: &mut Branch, ctx: &MoveContext, reaches_target: bool) {
    let side = ctx.side;
    let target = ctx.target();
    match ctx.data.effect {
        MoveEffect::KnockOff if reaches_target => {
            let current_item = state.get_side(target).active().item;
            if current_item != Item::NoItem {
                push(
                    state,
                    branch,
                    Instruction::ChangeItem {
                        side: target,
                        current_item,
                        new_item: Item::NoItem,
                    },
                );
            }
        }
        MoveEffect::TrickRoom => {
            let currently_active = state.trick_room.active;
            push(
                state,
                branch,
                Instruction::ToggleTrickRoom {
                    currently_active,
                    new_turns_remaining: if currently_active { 0 } else { TRICK_ROOM_TURNS },
                    previous_turns_remaining: state.trick_room.turns_remaining,
                },
            );
        }
        MoveEffect::Wish => {
            let side_ref = state.get_side(side);
            if side_ref.wish.0 == 0 {
                let wish_amount = side_ref.active().maxhp / 2;
                let previous_wish_amount = side_ref.wish.1;
                push(
                    state,
                    branch,
                    Instruction::SetWish {
                        side,
                        wish_amount,
                        previous_wish_amount,
                    },
                );
            }
        }
        MoveEffect::Rest => rest(state, branch, side),
        MoveEffect::HealBell => {
            let cured: Vec<(usize, PokemonStatus)> = state
                .get_side(side)
                .pokemon
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_alive() && p.status != PokemonStatus::None)
                .map(|(index, p)| (index, p.status))
                .collect();
            for (pokemon_index, old_status) in cured {
                push(
                    state,
                    branch,
                    Instruction::ChangeStatus {
                        side,
                        pokemon_index,
                        old_status,
                        new_status: PokemonStatus::None,
                    },
                );
            }
        }
        MoveEffect::Haze => {
            for haze_side in [SideReference::SideOne, SideReference::SideTwo] {
                for stat in PokemonBoostableStat::ALL {
                    let stage = state.get_side(haze_side).boosts.get(*stat);
                    if stage != 0 {
                        boost(state, branch, haze_side, *stat, -stage);
                    }
                }
            }
        }
        MoveEffect::RapidSpin => {
            if state.get_side(side).active().is_alive() {
                for hazard in HAZARDS {
                    clear_side_condition(state, branch, side, hazard);
                }
                remove_volatile(state, branch, side, PokemonVolatileStatus::LeechSeed);
                remove_volatile(state, branch, side, PokemonVolatileStatus::PartiallyTrapped);
            }
        }
        MoveEffect::Defog => {
            for defog_side in [side, target] {
                for hazard in HAZARDS {
                    clear_side_condition(state, branch, defog_side, hazard);
                }
            }
            for screen in [
                PokemonSideCondition::Reflect,
                PokemonSideCondition::LightScreen,
                PokemonSideCondition::AuroraVeil,
                PokemonSideCondition::Safeguard,
                PokemonSideCondition::Mist,
            ] {
                clear_side_condition(state, branch, target, screen);
            }
            if state.terrain.terrain_type != Terrain::None {
                push(
                    state,
                    branch,
                    Instruction::ChangeTerrain {
                        new_terrain: Terrain::None,
                        new_turns_remaining: 0,
                        previous_terrain: state.terrain.terrain_type,
                        previous_turns_remaining: state.terrain.turns_remaining,
                    },
                );
            }
        }
        _ => {}
    }
}

fn rest(state: &mut State, branch: &mut Branch, side: SideReference) {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    let grounded = side_ref.active_is_grounded();
    let blocked = active.ability.blocks_status(PokemonStatus::Sleep)
        || (grounded
            && (state.terrain_is_active(Terrain::ElectricTerrain)
                || state.terrain_is_active(Terrain::MistyTerrain)));
    if active.hp == active.maxhp || blocked || active.status == PokemonStatus::Sleep {
        return;
    }
    let pokemon_index = side_ref.active_index;
    let (old_status, rest_turns, maxhp) = (active.status, active.rest_turns, active.maxhp);
    inflict_status_over(state, branch, side, pokemon_index, old_status);
    push(
        state,
        branch,
        Instruction::SetRestTurns {
            side,
            pokemon_index,
            new_turns: REST_TURNS,
            previous_turns: rest_turns,
        },
    );
    heal_active(state, branch, side, maxhp);
}

/// Rest replaces whatever status the user had.
fn inflict_status_over(state: &mut State, branch: &mut Branch, side: SideReference, pokemon_index: usize, old_status: PokemonStatus) {
    let previous_turns = state.get_side(side).pokemon[pokemon_index].sleep_turns;
    push(
        state,
        branch,
        Instruction::ChangeStatus {
            side,
            pokemon_index,
            old_status,
            new_status: PokemonStatus::Sleep,
        },
    );
    if previous_turns != 0 {
        push(
            state,
            branch,
            Instruction::SetSleepTurns {
                side,
                pokemon_index,
                new_turns: 0,
                previous_turns,
            },
        );
    }
}

fn apply_effects(state: &mut State, branch: &mut Branch, ctx: &MoveContext) {
    let data = ctx.data;
    if data.category == MoveCategory::Status {
        branch.landed = true;
    }
    if !branch.landed {
        return;
    }
    let side = ctx.side;
    let target = ctx.target();
    let reaches_target = state.get_side(target).active().is_alive()
        && if data.category == MoveCategory::Status {
            !hits_substitute(state, ctx)
        } else {
            !branch.hit_substitute
        };

    if let Some(effect) = &data.side_condition {
        set_side_condition(state, branch, ctx, effect);
    }
    special_effect(state, branch, ctx, reaches_target);

    if let Some(effect) = data.volatile_status {
        match effect.target {
            MoveTarget::User => apply_volatile(state, branch, side, effect.volatile_status),
            MoveTarget::Opponent if reaches_target => {
                apply_volatile(state, branch, target, effect.volatile_status)
            }
            MoveTarget::Opponent => {}
        }
    }
    if let Some(effect) = data.status {
        if reaches_target && can_receive_status(state, target, effect.status, true) {
            inflict_status(state, branch, target, effect.status);
        }
    }
    if let Some(effect) = data.boost {
        match effect.target {
            MoveTarget::User => apply_boosts(state, branch, side, &effect.boosts, false),
            MoveTarget::Opponent if reaches_target => {
                apply_boosts(state, branch, target, &effect.boosts, true)
            }
            MoveTarget::Opponent => {}
        }
    }
    if let Some(effect) = data.heal {
        match effect.target {
            MoveTarget::User => apply_heal(state, branch, side, effect.amount),
            MoveTarget::Opponent if reaches_target => apply_heal(state, branch, target, effect.amount),
            MoveTarget::Opponent => {}
        }
    }
    if let Some(weather) = data.weather {
        set_weather(state, branch, weather, side);
    }
    if let Some(terrain) = data.terrain {
        set_terrain(state, branch, terrain, side);
    }
}

fn secondary_effect(state: &mut State, branch: Branch, ctx: &MoveContext, secondary: &Secondary) -> Vec<Branch> {
    if !branch.landed {
        return vec![branch];
    }
    let (side, from_opponent) = match secondary.target {
        MoveTarget::User => (ctx.side, false),
        MoveTarget::Opponent => (ctx.target(), true),
    };
    let affected = state.get_side(side).active();
    if affected.is_fainted()
        || (from_opponent && (branch.hit_substitute || affected.ability == Ability::ShieldDust))
    {
        return vec![branch];
    }
    let applies = match secondary.effect {
        SecondaryEffect::Status(status) => can_receive_status(state, side, status, from_opponent),
        SecondaryEffect::VolatileStatus(PokemonVolatileStatus::Flinch) => ctx.moves_first,
        SecondaryEffect::VolatileStatus(volatile) => !state.get_side(side).has_volatile(volatile),
        SecondaryEffect::Boost(_) | SecondaryEffect::Heal(_) => true,
    };
    if !applies {
        return vec![branch];
    }

    let mut chance = secondary.chance;
    if state.get_side(ctx.side).active().ability == Ability::SereneGrace {
        chance *= 2.0;
    }
    let effect = secondary.effect;
    split(
        state,
        branch,
        (chance / 100.0).min(1.0),
        move |state, branch| match effect {
            SecondaryEffect::Status(status) => inflict_status(state, branch, side, status),
            SecondaryEffect::VolatileStatus(volatile) => apply_volatile(state, branch, side, volatile),
            SecondaryEffect::Boost(boosts) => apply_boosts(state, branch, side, &boosts, from_opponent),
            SecondaryEffect::Heal(fraction) => apply_heal(state, branch, side, fraction),
        },
        |_, _| {},
    )
}

fn after_move(state: &mut State, branch: Branch, ctx: &MoveContext) -> Vec<Branch> {
    if !branch.landed {
        return vec![branch];
    }
    match ctx.data.effect {
        MoveEffect::Drag => {
            let target = ctx.target();
            let target_ref = state.get_side(target);
            if target_ref.active().is_fainted() {
                return vec![branch];
            }
            let reserves: Vec<usize> = target_ref.switch_targets().collect();
            if reserves.is_empty() {
                return vec![branch];
            }
            let probability = 1.0 / reserves.len() as f32;
            reserves
                .into_iter()
                .map(|index| {
                    fork(state, &branch, probability, |state, branch| {
                        switch_out_and_in(state, branch, target, index);
                        branch.dragged = true;
                    })
                })
                .collect()
        }
        MoveEffect::Pivot | MoveEffect::BatonPass => {
            vec![extend(state, branch, |state, branch| pivot(state, branch, ctx))]
        }
        _ => vec![branch],
    }
}

/// Marks the user for a mid-turn switch and pauses the turn until the
/// replacement is chosen.
fn pivot(state: &mut State, branch: &mut Branch, ctx: &MoveContext) {
    let side = ctx.side;
    let user = state.get_side(side);
    if user.active().is_fainted() || !user.has_alive_non_active() {
        return;
    }
    push(state, branch, Instruction::ToggleForceSwitch { side });
    if ctx.data.effect == MoveEffect::BatonPass {
        push(state, branch, Instruction::ToggleBatonPassing { side });
    }
    if ctx.moves_first {
        if let MoveChoice::Move(_) = ctx.opponent_choice {
            let other = ctx.target();
            let previous_choice = state.get_side(other).switch_out_move_second_saved_move;
            push(
                state,
                branch,
                Instruction::SetSecondMoveSwitchOutMove {
                    side: other,
                    new_choice: *ctx.opponent_choice,
                    previous_choice,
                },
            );
        }
    } else if !state.get_side(side).slow_uturn_move {
        push(state, branch, Instruction::ToggleSlowUturn { side });
    }
    branch.suspended = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generate::generate_instructions_from_move_pair;
    use crate::sim::instruction::StateInstructions;
    use crate::sim::state::Move;

    fn with_moves(one: &[&str], two: &[&str]) -> State {
        let mut state = State::default();
        for (side, moves) in [(&mut state.side_one, one), (&mut state.side_two, two)] {
            for (slot, name) in moves.iter().enumerate() {
                side.active_mut().moves[slot] = Move::from_id(name).expect("known move");
            }
        }
        state.side_one.active_mut().speed = 150;
        state
    }

    fn generate(state: &mut State, one: MoveChoice, two: MoveChoice) -> Vec<StateInstructions> {
        let original = state.clone();
        let branches = generate_instructions_from_move_pair(state, &one, &two);
        assert_eq!(*state, original);
        let total: f32 = branches.iter().map(|b| b.percentage).sum();
        assert!((total - 1.0).abs() < 1e-4, "probabilities sum to {total}");
        branches
    }

    fn chance_of(branches: &[StateInstructions], predicate: impl Fn(&Instruction) -> bool) -> f32 {
        branches
            .iter()
            .filter(|b| b.instruction_list.iter().any(&predicate))
            .map(|b| b.percentage)
            .sum()
    }

    fn damages(side: SideReference) -> impl Fn(&Instruction) -> bool {
        move |i| matches!(i, Instruction::Damage { side: s, .. } if *s == side)
    }

    #[test]
    fn tackle_splits_into_crit_and_normal_damage() {
        let mut state = with_moves(&["tackle"], &["splash"]);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(branches.len(), 2);
        assert!((chance_of(&branches, damages(SideReference::SideTwo)) - 1.0).abs() < 1e-4);
        for branch in &branches {
            assert!(branch.instruction_list.contains(&Instruction::DecrementPP {
                side: SideReference::SideOne,
                move_index: 0,
                amount: 1,
            }));
        }
    }

    #[test]
    fn inaccurate_move_misses_at_its_accuracy() {
        let mut state = with_moves(&["hydropump"], &["splash"]);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        let hit = chance_of(&branches, damages(SideReference::SideTwo));
        assert!((hit - 0.8).abs() < 1e-4);
    }

    #[test]
    fn full_paralysis_stops_a_quarter_of_the_time() {
        let mut state = with_moves(&["tackle"], &["splash"]);
        state.side_one.active_mut().status = PokemonStatus::Paralyze;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        let hit = chance_of(&branches, damages(SideReference::SideTwo));
        assert!((hit - 0.75).abs() < 1e-4);
    }

    #[test]
    fn knockout_is_capped_and_focus_sash_survives() {
        let mut state = with_moves(&["tackle"], &["splash"]);
        state.side_two.active_mut().hp = 10;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(branches.len(), 1);
        assert!(branches[0].instruction_list.contains(&Instruction::Damage {
            side: SideReference::SideTwo,
            amount: 10,
        }));

        let mut state = with_moves(&["tackle"], &["splash"]);
        state.side_one.active_mut().attack = 1000;
        state.side_two.active_mut().item = Item::FocusSash;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert!(branches.iter().all(|b| b.instruction_list.contains(&Instruction::Damage {
            side: SideReference::SideTwo,
            amount: 99,
        })));
        assert!(branches.iter().all(|b| b.instruction_list.contains(&Instruction::ChangeItem {
            side: SideReference::SideTwo,
            current_item: Item::FocusSash,
            new_item: Item::NoItem,
        })));
    }

    #[test]
    fn drain_and_recoil_need_damage_dealt() {
        for (name, effect) in [("drainpunch", "heal"), ("doubleedge", "recoil")] {
            let mut state = with_moves(&[name], &["splash"]);
            state.side_one.active_mut().hp = 50;
            let target = state.side_two.active_mut();
            target.hp = 1;
            target.maxhp = 1;
            target.item = Item::FocusSash;
            let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
            let touched = chance_of(&branches, |i| {
                matches!(
                    i,
                    Instruction::Heal { side: SideReference::SideOne, .. }
                        | Instruction::Damage { side: SideReference::SideOne, .. }
                )
            });
            assert_eq!(touched, 0.0, "{name} applied {effect} without dealing damage");
        }
    }

    #[test]
    fn substitute_takes_the_hit() {
        let mut state = with_moves(&["tackle"], &["splash"]);
        state
            .side_two
            .volatile_statuses
            .insert(PokemonVolatileStatus::Substitute);
        state.side_two.substitute_health = 25;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(chance_of(&branches, damages(SideReference::SideTwo)), 0.0);
        assert!(branches.iter().all(|b| b.instruction_list.contains(&Instruction::RemoveVolatileStatus {
            side: SideReference::SideTwo,
            volatile_status: PokemonVolatileStatus::Substitute,
        })));
    }

    #[test]
    fn protect_blocks_the_slower_attack() {
        let mut state = with_moves(&["tackle"], &["protect"]);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(chance_of(&branches, damages(SideReference::SideTwo)), 0.0);
        assert!(branches[0].instruction_list.contains(&Instruction::ChangeSideCondition {
            side: SideReference::SideTwo,
            condition: PokemonSideCondition::Protect,
            amount: 1,
        }));
    }

    #[test]
    fn thunder_wave_fails_against_ground() {
        let mut state = with_moves(&["thunderwave"], &["splash"]);
        state.side_two.active_mut().types = (PokemonType::Ground, PokemonType::Typeless);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(
            chance_of(&branches, |i| matches!(i, Instruction::ChangeStatus { .. })),
            0.0
        );
    }

    #[test]
    fn sucker_punch_needs_an_incoming_attack() {
        let mut state = with_moves(&["suckerpunch"], &["swordsdance", "tackle"]);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert_eq!(chance_of(&branches, damages(SideReference::SideTwo)), 0.0);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(1));
        assert!((chance_of(&branches, damages(SideReference::SideTwo)) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn choice_item_locks_the_other_moves() {
        let mut state = with_moves(&["tackle", "quickattack"], &["splash"]);
        state.side_one.active_mut().item = Item::ChoiceBand;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        assert!(branches.iter().all(|b| b.instruction_list.contains(&Instruction::DisableMove {
            side: SideReference::SideOne,
            move_index: 1,
        })));
    }

    #[test]
    fn fast_uturn_saves_the_opponents_move_and_suspends_the_turn() {
        let mut state = with_moves(&["uturn"], &["tackle"]);
        state.side_one.active_mut().speed = 200;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        for branch in &branches {
            assert!(branch.instruction_list.contains(&Instruction::ToggleForceSwitch {
                side: SideReference::SideOne
            }));
            assert!(branch.instruction_list.contains(&Instruction::SetSecondMoveSwitchOutMove {
                side: SideReference::SideTwo,
                new_choice: MoveChoice::Move(0),
                previous_choice: MoveChoice::None,
            }));
        }
        assert_eq!(chance_of(&branches, damages(SideReference::SideOne)), 0.0);
    }

    #[test]
    fn secondary_boost_always_applies_to_the_user() {
        let mut state = with_moves(&["rapidspin"], &["splash"]);
        state.side_one.side_conditions.stealth_rock = 1;
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        for branch in &branches {
            assert!(branch.instruction_list.contains(&Instruction::Boost {
                side: SideReference::SideOne,
                stat: PokemonBoostableStat::Speed,
                amount: 1,
            }));
            assert!(branch.instruction_list.contains(&Instruction::ChangeSideCondition {
                side: SideReference::SideOne,
                condition: PokemonSideCondition::Stealthrock,
                amount: -1,
            }));
        }
    }

    #[test]
    fn roar_drags_uniformly_over_reserves() {
        let mut state = with_moves(&["roar"], &["tackle"]);
        state.side_two.pokemon.truncate(3);
        let branches = generate(&mut state, MoveChoice::Move(0), MoveChoice::Move(0));
        for next_index in [1, 2] {
            let chance = chance_of(&branches, |i| {
                matches!(i, Instruction::Switch { side: SideReference::SideTwo, next_index: n, .. } if *n == next_index)
            });
            assert!((chance - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn add_buckets_merges_knockouts() {
        let mut outcomes = Vec::new();
        add_buckets(&mut outcomes, 0.5, &[8, 9, 10, 11], 10);
        add_buckets(&mut outcomes, 0.5, &[12, 13, 14, 15], 10);
        assert_eq!(outcomes.len(), 2);
        assert!((outcomes[0].0 - 0.75).abs() < 1e-6);
        assert_eq!(outcomes[0].1, 10);
        assert_eq!(outcomes[1], (0.25, 8));
    }
}
