use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonStatus, PokemonVolatileStatus, Terrain, Weather,
};
use crate::data::items::Item;
use crate::data::moves::{MoveCategory, MoveData, MoveEffect, MoveId};
use crate::data::types::{type_effectiveness, PokemonType};
use crate::sim::state::{Side, SideReference, State};
use crate::sim::stats::stage_multiplier;

/// Number of values in a full damage roll set (85% through 100%).
pub const ROLL_COUNT: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DamageResult {
    /// Status or zero-power move.
    NoDamage,
    Immune,
    Rolls(Vec<i16>),
}

impl DamageResult {
    /// Flattens into the calculator's public roll set: empty for non-damaging
    /// moves, a single zero for immunity.
    pub fn into_rolls(self) -> Vec<i16> {
        match self {
            DamageResult::NoDamage => Vec::new(),
            DamageResult::Immune => vec![0],
            DamageResult::Rolls(rolls) => rolls,
        }
    }
}

pub(crate) fn chain_modifier(previous: f32, next: f32) -> f32 {
    // Showdown: battle.ts#L2272-L2287 (chain)
    let previous = (previous * 4096.0).floor() as u64;
    let next = (next * 4096.0).floor() as u64;
    let chained = (previous * next + 2048) >> 12;
    chained as f32 / 4096.0
}

fn apply_modifier(value: u32, modifier: f32) -> u32 {
    // Showdown: battle.ts#L2302-L2313 (modify)
    if modifier <= 0.0 {
        return 0;
    }
    let modifier = (modifier * 4096.0).floor() as u64;
    let value = value as u64;
    ((value * modifier + 2048 - 1) / 4096) as u32
}

fn apply_random_factor(value: u32, percent: u32) -> u32 {
    // Showdown: battle.ts#L2354-L2359 (randomizer)
    value.saturating_mul(percent.clamp(85, 100)) / 100
}

fn type_effectiveness_steps(type_effectiveness: f32) -> i8 {
    (type_effectiveness.ln() / 2.0_f32.ln()).round() as i8
}

fn apply_type_effectiveness(value: u32, type_effectiveness: f32) -> u32 {
    if type_effectiveness == 0.0 {
        return 0;
    }
    let steps = type_effectiveness_steps(type_effectiveness);
    if steps > 0 {
        value.saturating_mul(1u32 << steps as u32)
    } else if steps < 0 {
        value / (1u32 << (-steps) as u32)
    } else {
        value
    }
}

fn compute_base_damage(attacker_level: i8, attacker_stat: u32, defender_stat: u32, move_power: u32) -> u32 {
    // Showdown: battle-actions.ts#L1715-L1716 (baseDamage)
    let level = attacker_level.max(1) as u32;
    let defense = defender_stat.max(1);
    let mut base_damage = 2 * level / 5 + 2;
    base_damage = base_damage.saturating_mul(move_power);
    base_damage = base_damage.saturating_mul(attacker_stat);
    base_damage /= defense;
    base_damage /= 50;
    base_damage
}

fn staged_stat(raw: i16, stage: i8) -> u32 {
    (raw.max(1) as f32 * stage_multiplier(stage)).floor() as u32
}

/// Defender typing as seen by this move: Roost drops Flying, Scrappy lets
/// Normal and Fighting moves touch Ghost.
fn defending_types(attacker: &Side, defender: &Side, move_data: &MoveData) -> (PokemonType, PokemonType) {
    let mut types = defender.active().types;
    let strip = |types: &mut (PokemonType, PokemonType), removed: PokemonType| {
        if types.0 == removed {
            types.0 = PokemonType::Typeless;
        }
        if types.1 == removed {
            types.1 = PokemonType::Typeless;
        }
    };
    if defender.has_volatile(PokemonVolatileStatus::Roost) {
        strip(&mut types, PokemonType::Flying);
    }
    if attacker.active().ability == Ability::Scrappy
        && matches!(move_data.move_type, PokemonType::Normal | PokemonType::Fighting)
    {
        strip(&mut types, PokemonType::Ghost);
    }
    types
}

/// Type multiplier including ground immunities from Levitate and Air Balloon.
pub fn move_effectiveness(state: &State, attacking_side: SideReference, move_data: &MoveData) -> f32 {
    let (attacker, defender) = state.get_both_sides(attacking_side);
    if move_data.move_type == PokemonType::Ground && !defender.active_is_grounded() {
        return 0.0;
    }
    type_effectiveness(move_data.move_type, defending_types(attacker, defender, move_data))
}

fn weather_modifier(weather: Weather, move_type: PokemonType) -> f32 {
    match (weather, move_type) {
        (Weather::Sun | Weather::HarshSun, PokemonType::Fire) => 1.5,
        (Weather::Rain | Weather::HeavyRain, PokemonType::Water) => 1.5,
        (Weather::Sun, PokemonType::Water) | (Weather::Rain, PokemonType::Fire) => 0.5,
        (Weather::HarshSun, PokemonType::Water) | (Weather::HeavyRain, PokemonType::Fire) => 0.0,
        _ => 1.0,
    }
}

fn terrain_modifier(state: &State, attacker: &Side, defender: &Side, move_data: &MoveData) -> f32 {
    let boost = |terrain_type: PokemonType| {
        if move_data.move_type == terrain_type && attacker.active_is_grounded() {
            1.3
        } else {
            1.0
        }
    };
    match state.terrain.terrain_type {
        Terrain::ElectricTerrain => boost(PokemonType::Electric),
        Terrain::PsychicTerrain => boost(PokemonType::Psychic),
        Terrain::GrassyTerrain if move_data.id == "earthquake" => 0.5,
        Terrain::GrassyTerrain => boost(PokemonType::Grass),
        Terrain::MistyTerrain
            if move_data.move_type == PokemonType::Dragon && defender.active_is_grounded() =>
        {
            0.5
        }
        _ => 1.0,
    }
}

fn base_power_modifier(attacker: &Side, move_data: &MoveData, base_power: f32) -> f32 {
    let active = attacker.active();
    let mut modifier = 1.0;
    if active.ability == Ability::Technician && base_power <= 60.0 {
        modifier = chain_modifier(modifier, 1.5);
    }
    if active.ability.pinch_type() == Some(move_data.move_type) && active.hp * 3 <= active.maxhp {
        modifier = chain_modifier(modifier, 1.5);
    }
    modifier
}

fn attack_modifier(attacker: &Side, defender: &Side, move_data: &MoveData) -> f32 {
    let active = attacker.active();
    let physical = move_data.category == MoveCategory::Physical;
    let mut modifier = 1.0;
    if physical && matches!(active.ability, Ability::HugePower | Ability::PurePower) {
        modifier = chain_modifier(modifier, 2.0);
    }
    if physical && active.ability == Ability::Guts && active.status != PokemonStatus::None {
        modifier = chain_modifier(modifier, 1.5);
    }
    match (active.item, move_data.category) {
        (Item::ChoiceBand, MoveCategory::Physical) | (Item::ChoiceSpecs, MoveCategory::Special) => {
            modifier = chain_modifier(modifier, 1.5);
        }
        _ => {}
    }
    if defender.active().ability == Ability::ThickFat
        && matches!(move_data.move_type, PokemonType::Fire | PokemonType::Ice)
    {
        modifier = chain_modifier(modifier, 0.5);
    }
    modifier
}

fn final_modifier(
    state: &State,
    attacker: &Side,
    defender: &Side,
    move_data: &MoveData,
    effectiveness: f32,
    crit: bool,
) -> f32 {
    let mut modifier = 1.0;
    if !crit && attacker.active().ability != Ability::Infiltrator {
        let conditions = &defender.side_conditions;
        let screened = conditions.aurora_veil > 0
            || (conditions.reflect > 0 && move_data.category == MoveCategory::Physical)
            || (conditions.light_screen > 0 && move_data.category == MoveCategory::Special);
        if screened {
            modifier = chain_modifier(modifier, 0.5);
        }
    }
    modifier = chain_modifier(modifier, terrain_modifier(state, attacker, defender, move_data));
    let target = defender.active();
    if target.ability == Ability::Multiscale && target.hp == target.maxhp {
        modifier = chain_modifier(modifier, 0.5);
    }
    match attacker.active().item {
        Item::LifeOrb => modifier = chain_modifier(modifier, 1.3),
        Item::ExpertBelt if effectiveness > 1.0 => modifier = chain_modifier(modifier, 1.2),
        _ => {}
    }
    modifier
}

/// Attacking and defending stats after stages, Unaware and critical-hit rules.
fn battle_stats(attacker: &Side, defender: &Side, state: &State, move_data: &MoveData, crit: bool) -> (u32, u32) {
    let (attack_stat, defense_stat) = match move_data.category {
        MoveCategory::Physical => (PokemonBoostableStat::Attack, PokemonBoostableStat::Defense),
        _ if move_data.id == "psyshock" => (PokemonBoostableStat::SpecialAttack, PokemonBoostableStat::Defense),
        _ => (PokemonBoostableStat::SpecialAttack, PokemonBoostableStat::SpecialDefense),
    };
    let user = attacker.active();
    let target = defender.active();

    let mut attack_stage = attacker.boosts.get(attack_stat);
    let mut defense_stage = defender.boosts.get(defense_stat);
    if target.ability == Ability::Unaware || (crit && attack_stage < 0) {
        attack_stage = 0;
    }
    if user.ability == Ability::Unaware || (crit && defense_stage > 0) {
        defense_stage = 0;
    }

    let raw_attack = match attack_stat {
        PokemonBoostableStat::Attack => user.attack,
        _ => user.special_attack,
    };
    let raw_defense = match defense_stat {
        PokemonBoostableStat::Defense => target.defense,
        _ => target.special_defense,
    };
    let mut defense = staged_stat(raw_defense, defense_stage);
    if defense_stat == PokemonBoostableStat::SpecialDefense {
        if state.weather_is_active(Weather::Sand) && target.has_type(PokemonType::Rock) {
            defense = apply_modifier(defense, 1.5);
        }
        if target.item == Item::AssaultVest {
            defense = apply_modifier(defense, 1.5);
        }
    } else if state.weather_is_active(Weather::Snow) && target.has_type(PokemonType::Ice) {
        defense = apply_modifier(defense, 1.5);
    }
    (staged_stat(raw_attack, attack_stage), defense)
}

/// Full roll set for `move_data` used by `attacking_side` with an explicit
/// base power (Pursuit and similar adjust it before calling).
pub(crate) fn damage_rolls(
    state: &State,
    attacking_side: SideReference,
    move_data: &MoveData,
    base_power: f32,
    crit: bool,
) -> DamageResult {
    if move_data.category == MoveCategory::Status || base_power <= 0.0 {
        return DamageResult::NoDamage;
    }
    let (attacker, defender) = state.get_both_sides(attacking_side);
    if defender.active().ability.absorbs_type() == Some(move_data.move_type) {
        return DamageResult::Immune;
    }
    let effectiveness = move_effectiveness(state, attacking_side, move_data);
    let weather = weather_modifier(state.effective_weather(), move_data.move_type);
    if effectiveness == 0.0 || weather == 0.0 {
        return DamageResult::Immune;
    }

    let power = apply_modifier(
        base_power.floor() as u32,
        base_power_modifier(attacker, move_data, base_power),
    )
    .max(1);
    let (attack, defense) = battle_stats(attacker, defender, state, move_data, crit);
    let attack = apply_modifier(attack, attack_modifier(attacker, defender, move_data)).max(1);

    // Showdown: battle-actions.ts#L1729
    let mut base_damage = compute_base_damage(attacker.active().level, attack, defense, power) + 2;
    // Showdown: battle-actions.ts#L1743-L1744
    base_damage = apply_modifier(base_damage, weather);
    // Showdown: battle-actions.ts#L1746-L1749
    if crit {
        base_damage = (base_damage as f32 * 1.5).floor() as u32;
    }

    let user = attacker.active();
    let stab = if move_data.move_type != PokemonType::Typeless && user.has_type(move_data.move_type) {
        if user.ability == Ability::Adaptability {
            2.0
        } else {
            1.5
        }
    } else {
        1.0
    };
    let burned = user.status == PokemonStatus::Burn
        && move_data.category == MoveCategory::Physical
        && user.ability != Ability::Guts;
    let final_mod = final_modifier(state, attacker, defender, move_data, effectiveness, crit);

    let rolls = (85..=100)
        .map(|percent| {
            // Showdown: battle-actions.ts#L1752-L1753
            let mut damage = apply_random_factor(base_damage, percent);
            damage = apply_modifier(damage, stab);
            damage = apply_type_effectiveness(damage, effectiveness);
            if burned {
                damage = apply_modifier(damage, 0.5);
            }
            damage = apply_modifier(damage, final_mod);
            damage.clamp(1, i16::MAX as u32) as i16
        })
        .collect();
    DamageResult::Rolls(rolls)
}

/// Self-hit from confusion: a 40 power typeless physical hit with the user's
/// own staged Attack and Defense, averaged over the roll range.
pub(crate) fn confusion_damage(state: &State, side: SideReference) -> i16 {
    let side_ref = state.get_side(side);
    let active = side_ref.active();
    let attack = staged_stat(active.attack, side_ref.boosts.attack);
    let defense = staged_stat(active.defense, side_ref.boosts.defense).max(1);
    let damage = compute_base_damage(active.level, attack, defense, 40) + 2;
    ((damage as f32 * 0.925) as i16).clamp(1, active.hp.max(1))
}

/// Roll set for `move_id` used by the active Pokémon of `attacking_side`
/// against the opposing active Pokémon.
pub fn calculate_damage_rolls(
    state: &State,
    attacking_side: SideReference,
    move_id: MoveId,
    crit: bool,
) -> DamageResult {
    let data = move_id.data();
    damage_rolls(state, attacking_side, data, data.base_power, crit)
}

/// Non-critical roll sets for both sides' moves. `None` marks a side that is
/// switching; Pursuit doubles against it and Sucker Punch fails when its
/// user moves second or the target is not attacking.
pub fn calculate_both_damage_rolls(
    state: &State,
    side_one_move: Option<MoveId>,
    side_two_move: Option<MoveId>,
    side_one_moves_first: bool,
) -> (Vec<i16>, Vec<i16>) {
    let rolls = |side: SideReference, user: Option<MoveId>, target: Option<MoveId>, moves_first: bool| {
        let Some(move_id) = user else {
            return Vec::new();
        };
        let data = move_id.data();
        let mut base_power = data.base_power;
        match data.effect {
            MoveEffect::Pursuit if target.is_none() => base_power *= 2.0,
            MoveEffect::SuckerPunch => {
                let target_attacks = target
                    .map(|m| m.data().category != MoveCategory::Status)
                    .unwrap_or(false);
                if !moves_first || !target_attacks {
                    return Vec::new();
                }
            }
            _ => {}
        }
        damage_rolls(state, side, data, base_power, false).into_rolls()
    };
    (
        rolls(SideReference::SideOne, side_one_move, side_two_move, side_one_moves_first),
        rolls(SideReference::SideTwo, side_two_move, side_one_move, !side_one_moves_first),
    )
}
