use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::moves::{MoveCategory, MoveId};
use crate::data::species::species_data;
use crate::data::types::PokemonType;
use crate::error::EngineError;
use crate::sim::choice::MoveChoice;
use crate::sim::stats::{Nature, StatsSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SideReference {
    SideOne,
    SideTwo,
}

impl SideReference {
    pub fn other(self) -> SideReference {
        match self {
            SideReference::SideOne => SideReference::SideTwo,
            SideReference::SideTwo => SideReference::SideOne,
        }
    }
}

impl fmt::Display for SideReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideReference::SideOne => f.write_str("side one"),
            SideReference::SideTwo => f.write_str("side two"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub id: MoveId,
    pub disabled: bool,
    pub pp: i8,
}

impl Move {
    pub fn new(id: MoveId) -> Self {
        Move {
            id,
            disabled: false,
            pp: id.data().pp,
        }
    }

    /// Placeholder filling unused move slots.
    pub fn none() -> Self {
        Move {
            id: MoveId::none(),
            disabled: true,
            pp: 0,
        }
    }

    pub fn from_id(name: &str) -> Result<Self, EngineError> {
        let id = MoveId::from_id(name)?;
        if id.is_none() {
            return Ok(Move::none());
        }
        Ok(Move::new(id))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pokemon {
    pub id: &'static str,
    pub level: i8,
    pub types: (PokemonType, PokemonType),
    pub hp: i16,
    pub maxhp: i16,
    pub ability: Ability,
    pub item: Item,
    pub attack: i16,
    pub defense: i16,
    pub special_attack: i16,
    pub special_defense: i16,
    pub speed: i16,
    pub status: PokemonStatus,
    pub rest_turns: i8,
    pub sleep_turns: i8,
    pub weight_kg: f32,
    pub moves: [Move; 4],
}

impl Default for Pokemon {
    fn default() -> Self {
        Pokemon {
            id: "rattata",
            level: 100,
            types: (PokemonType::Normal, PokemonType::Typeless),
            hp: 100,
            maxhp: 100,
            ability: Ability::NoAbility,
            item: Item::NoItem,
            attack: 100,
            defense: 100,
            special_attack: 100,
            special_defense: 100,
            speed: 100,
            status: PokemonStatus::None,
            rest_turns: 0,
            sleep_turns: 0,
            weight_kg: 1.0,
            moves: [Move::none(); 4],
        }
    }
}

impl Pokemon {
    /// Builds a Pokémon from its Pokédex entry with the standard stat formulas.
    #[allow(clippy::too_many_arguments)]
    pub fn from_species(
        species: &str,
        level: i8,
        nature: Nature,
        evs: [u8; 6],
        ivs: [u8; 6],
        moves: &[&str],
        ability: &str,
        item: &str,
    ) -> Result<Self, EngineError> {
        let data = species_data(species)?;
        if !(1..=100).contains(&level) {
            return Err(EngineError::malformed(format!(
                "level {} out of range for {}",
                level, data.id
            )));
        }
        if moves.len() > 4 {
            return Err(EngineError::malformed(format!(
                "{} knows {} moves, at most 4 allowed",
                data.id,
                moves.len()
            )));
        }
        let stats = StatsSet::from_base(&data.base_stats, level as u8, evs, ivs, nature);
        let mut move_slots = [Move::none(); 4];
        for (slot, name) in move_slots.iter_mut().zip(moves) {
            *slot = Move::from_id(name)?;
        }
        Ok(Pokemon {
            id: data.id,
            level,
            types: (data.types[0], data.types[1]),
            hp: stats.hp,
            maxhp: stats.hp,
            ability: Ability::from_id(ability)?,
            item: Item::from_id(item)?,
            attack: stats.attack,
            defense: stats.defense,
            special_attack: stats.special_attack,
            special_defense: stats.special_defense,
            speed: stats.speed,
            status: PokemonStatus::None,
            rest_turns: 0,
            sleep_turns: 0,
            weight_kg: data.weight_kg,
            moves: move_slots,
        })
    }

    pub fn is_fainted(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.0 == pokemon_type || self.types.1 == pokemon_type
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.maxhp <= 0 {
            return 0.0;
        }
        self.hp as f32 / self.maxhp as f32
    }

    /// Damage or healing of `fraction` of max HP, at least 1.
    pub fn fraction_of_max(&self, fraction: f32) -> i16 {
        ((self.maxhp as f32 * fraction) as i16).max(1)
    }

    pub fn knows_move(&self, id: MoveId) -> Option<usize> {
        self.moves.iter().position(|m| m.id == id && !id.is_none())
    }

    pub fn has_status_moves_only(&self) -> bool {
        self.moves
            .iter()
            .filter(|m| !m.id.is_none())
            .all(|m| m.id.data().category == MoveCategory::Status)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VolatileStatusDurations {
    pub confusion: i8,
    pub taunt: i8,
    pub yawn: i8,
}

impl VolatileStatusDurations {
    pub fn get(&self, volatile: PokemonVolatileStatus) -> Option<i8> {
        match volatile {
            PokemonVolatileStatus::Confusion => Some(self.confusion),
            PokemonVolatileStatus::Taunt => Some(self.taunt),
            PokemonVolatileStatus::Yawn => Some(self.yawn),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, volatile: PokemonVolatileStatus) -> Option<&mut i8> {
        match volatile {
            PokemonVolatileStatus::Confusion => Some(&mut self.confusion),
            PokemonVolatileStatus::Taunt => Some(&mut self.taunt),
            PokemonVolatileStatus::Yawn => Some(&mut self.yawn),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideConditions {
    pub aurora_veil: i8,
    pub healing_wish: i8,
    pub light_screen: i8,
    pub mist: i8,
    pub protect: i8,
    pub reflect: i8,
    pub safeguard: i8,
    pub spikes: i8,
    pub stealth_rock: i8,
    pub sticky_web: i8,
    pub tailwind: i8,
    pub toxic_count: i8,
    pub toxic_spikes: i8,
}

impl SideConditions {
    pub fn get(&self, condition: PokemonSideCondition) -> i8 {
        match condition {
            PokemonSideCondition::AuroraVeil => self.aurora_veil,
            PokemonSideCondition::HealingWish => self.healing_wish,
            PokemonSideCondition::LightScreen => self.light_screen,
            PokemonSideCondition::Mist => self.mist,
            PokemonSideCondition::Protect => self.protect,
            PokemonSideCondition::Reflect => self.reflect,
            PokemonSideCondition::Safeguard => self.safeguard,
            PokemonSideCondition::Spikes => self.spikes,
            PokemonSideCondition::Stealthrock => self.stealth_rock,
            PokemonSideCondition::StickyWeb => self.sticky_web,
            PokemonSideCondition::Tailwind => self.tailwind,
            PokemonSideCondition::ToxicCount => self.toxic_count,
            PokemonSideCondition::ToxicSpikes => self.toxic_spikes,
        }
    }

    pub fn get_mut(&mut self, condition: PokemonSideCondition) -> &mut i8 {
        match condition {
            PokemonSideCondition::AuroraVeil => &mut self.aurora_veil,
            PokemonSideCondition::HealingWish => &mut self.healing_wish,
            PokemonSideCondition::LightScreen => &mut self.light_screen,
            PokemonSideCondition::Mist => &mut self.mist,
            PokemonSideCondition::Protect => &mut self.protect,
            PokemonSideCondition::Reflect => &mut self.reflect,
            PokemonSideCondition::Safeguard => &mut self.safeguard,
            PokemonSideCondition::Spikes => &mut self.spikes,
            PokemonSideCondition::Stealthrock => &mut self.stealth_rock,
            PokemonSideCondition::StickyWeb => &mut self.sticky_web,
            PokemonSideCondition::Tailwind => &mut self.tailwind,
            PokemonSideCondition::ToxicCount => &mut self.toxic_count,
            PokemonSideCondition::ToxicSpikes => &mut self.toxic_spikes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LastUsedMove {
    Move(usize),
    Switch(usize),
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: PokemonBoostableStat) -> i8 {
        match stat {
            PokemonBoostableStat::Attack => self.attack,
            PokemonBoostableStat::Defense => self.defense,
            PokemonBoostableStat::SpecialAttack => self.special_attack,
            PokemonBoostableStat::SpecialDefense => self.special_defense,
            PokemonBoostableStat::Speed => self.speed,
            PokemonBoostableStat::Accuracy => self.accuracy,
            PokemonBoostableStat::Evasion => self.evasion,
        }
    }

    pub fn get_mut(&mut self, stat: PokemonBoostableStat) -> &mut i8 {
        match stat {
            PokemonBoostableStat::Attack => &mut self.attack,
            PokemonBoostableStat::Defense => &mut self.defense,
            PokemonBoostableStat::SpecialAttack => &mut self.special_attack,
            PokemonBoostableStat::SpecialDefense => &mut self.special_defense,
            PokemonBoostableStat::Speed => &mut self.speed,
            PokemonBoostableStat::Accuracy => &mut self.accuracy,
            PokemonBoostableStat::Evasion => &mut self.evasion,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Side {
    pub pokemon: Vec<Pokemon>,
    pub active_index: usize,
    pub boosts: StatStages,
    pub volatile_statuses: BTreeSet<PokemonVolatileStatus>,
    pub volatile_status_durations: VolatileStatusDurations,
    pub substitute_health: i16,
    pub side_conditions: SideConditions,
    /// (turns remaining, amount healed when it lands)
    pub wish: (i8, i16),
    pub force_switch: bool,
    pub force_trapped: bool,
    pub baton_passing: bool,
    pub slow_uturn_move: bool,
    pub switch_out_move_second_saved_move: MoveChoice,
    pub last_used_move: LastUsedMove,
}

impl Side {
    pub fn new(pokemon: Vec<Pokemon>) -> Self {
        Side {
            pokemon,
            active_index: 0,
            boosts: StatStages::default(),
            volatile_statuses: BTreeSet::new(),
            volatile_status_durations: VolatileStatusDurations::default(),
            substitute_health: 0,
            side_conditions: SideConditions::default(),
            wish: (0, 0),
            force_switch: false,
            force_trapped: false,
            baton_passing: false,
            slow_uturn_move: false,
            switch_out_move_second_saved_move: MoveChoice::None,
            last_used_move: LastUsedMove::None,
        }
    }

    pub fn active(&self) -> &Pokemon {
        &self.pokemon[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Pokemon {
        &mut self.pokemon[self.active_index]
    }

    /// Roster slots a switch could bring in.
    pub fn switch_targets(&self) -> impl Iterator<Item = usize> + '_ {
        self.pokemon
            .iter()
            .enumerate()
            .filter(move |(index, p)| *index != self.active_index && p.is_alive())
            .map(|(index, _)| index)
    }

    pub fn has_alive_non_active(&self) -> bool {
        self.switch_targets().next().is_some()
    }

    pub fn alive_count(&self) -> usize {
        self.pokemon.iter().filter(|p| p.is_alive()).count()
    }

    pub fn has_volatile(&self, volatile: PokemonVolatileStatus) -> bool {
        self.volatile_statuses.contains(&volatile)
    }

    /// Whether the active Pokémon touches the ground.
    pub fn active_is_grounded(&self) -> bool {
        let active = self.active();
        if active.item == Item::AirBalloon || active.ability == Ability::Levitate {
            return false;
        }
        !active.has_type(PokemonType::Flying) || self.has_volatile(PokemonVolatileStatus::Roost)
    }

    pub(crate) fn validate(&self, side: SideReference) -> Result<(), EngineError> {
        if self.pokemon.is_empty() || self.pokemon.len() > 6 {
            return Err(EngineError::malformed(format!(
                "{} has {} pokemon, expected 1 to 6",
                side,
                self.pokemon.len()
            )));
        }
        if self.active_index >= self.pokemon.len() {
            return Err(EngineError::malformed(format!(
                "{} active index {} outside roster of {}",
                side,
                self.active_index,
                self.pokemon.len()
            )));
        }
        for pokemon in &self.pokemon {
            if pokemon.hp < 0 || pokemon.hp > pokemon.maxhp {
                return Err(EngineError::malformed(format!(
                    "{} {} has hp {} outside 0..={}",
                    side, pokemon.id, pokemon.hp, pokemon.maxhp
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateWeather {
    pub weather_type: Weather,
    /// `-1` lasts until replaced.
    pub turns_remaining: i8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateTerrain {
    pub terrain_type: Terrain,
    pub turns_remaining: i8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateTrickRoom {
    pub active: bool,
    pub turns_remaining: i8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub side_one: Side,
    pub side_two: Side,
    pub weather: StateWeather,
    pub terrain: StateTerrain,
    pub trick_room: StateTrickRoom,
    pub team_preview: bool,
}

impl Default for State {
    fn default() -> Self {
        let roster = || -> Vec<Pokemon> { (0..6).map(|_| Pokemon::default()).collect() };
        State::new(Side::new(roster()), Side::new(roster()))
    }
}

impl State {
    pub fn new(side_one: Side, side_two: Side) -> Self {
        State {
            side_one,
            side_two,
            weather: StateWeather {
                weather_type: Weather::None,
                turns_remaining: 0,
            },
            terrain: StateTerrain {
                terrain_type: Terrain::None,
                turns_remaining: 0,
            },
            trick_room: StateTrickRoom {
                active: false,
                turns_remaining: 0,
            },
            team_preview: false,
        }
    }

    pub fn get_side(&self, side: SideReference) -> &Side {
        match side {
            SideReference::SideOne => &self.side_one,
            SideReference::SideTwo => &self.side_two,
        }
    }

    pub fn get_side_mut(&mut self, side: SideReference) -> &mut Side {
        match side {
            SideReference::SideOne => &mut self.side_one,
            SideReference::SideTwo => &mut self.side_two,
        }
    }

    /// The referenced side first, its opponent second.
    pub fn get_both_sides(&self, side: SideReference) -> (&Side, &Side) {
        match side {
            SideReference::SideOne => (&self.side_one, &self.side_two),
            SideReference::SideTwo => (&self.side_two, &self.side_one),
        }
    }

    pub fn get_both_sides_mut(&mut self, side: SideReference) -> (&mut Side, &mut Side) {
        match side {
            SideReference::SideOne => (&mut self.side_one, &mut self.side_two),
            SideReference::SideTwo => (&mut self.side_two, &mut self.side_one),
        }
    }

    /// `1.0` when side one has won, `-1.0` when side two has, `0.0` otherwise.
    pub fn battle_is_over(&self) -> f32 {
        if self.side_one.alive_count() == 0 {
            return -1.0;
        }
        if self.side_two.alive_count() == 0 {
            return 1.0;
        }
        0.0
    }

    /// Effective weather after Cloud Nine / Air Lock on either active.
    pub fn effective_weather(&self) -> Weather {
        if self.side_one.active().ability.suppresses_weather()
            || self.side_two.active().ability.suppresses_weather()
        {
            return Weather::None;
        }
        self.weather.weather_type
    }

    pub fn weather_is_active(&self, weather: Weather) -> bool {
        self.effective_weather() == weather
    }

    pub fn terrain_is_active(&self, terrain: Terrain) -> bool {
        self.terrain.terrain_type == terrain
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.side_one.validate(SideReference::SideOne)?;
        self.side_two.validate(SideReference::SideTwo)
    }
}
