//! Compact text form of a [`State`].
//!
//! Separators nest from the outside in: `/` between state fields, `=`
//! between side fields, `,` between Pokémon fields, `;` inside small
//! composites such as a move slot, `:` between volatile statuses.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::data::abilities::Ability;
use crate::data::conditions::{
    PokemonBoostableStat, PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain,
    Weather,
};
use crate::data::items::Item;
use crate::data::moves::MoveId;
use crate::data::species::species_data;
use crate::data::types::PokemonType;
use crate::error::EngineError;
use crate::sim::choice::MoveChoice;
use crate::sim::state::{
    LastUsedMove, Move, Pokemon, Side, SideConditions, StatStages, State, StateTerrain,
    StateTrickRoom, StateWeather, VolatileStatusDurations,
};

const POKEMON_FIELDS: usize = 21;
/// Side fields after the roster.
const SIDE_FIXED_FIELDS: usize = 20;
const STATE_FIELDS: usize = 6;

fn split_exact<'a>(
    text: &'a str,
    separator: char,
    count: usize,
    what: &str,
) -> Result<Vec<&'a str>, EngineError> {
    let fields: Vec<&str> = text.split(separator).collect();
    if fields.len() != count {
        return Err(EngineError::malformed(format!(
            "{} has {} fields, expected {}",
            what,
            fields.len(),
            count
        )));
    }
    Ok(fields)
}

fn number<T: FromStr>(field: &str, what: &str) -> Result<T, EngineError> {
    field
        .parse()
        .map_err(|_| EngineError::malformed(format!("{} is not a valid {}", field, what)))
}

fn flag(field: &str, what: &str) -> Result<bool, EngineError> {
    match field {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(EngineError::malformed(format!(
            "{} is not a boolean {}",
            field, what
        ))),
    }
}

fn move_id(raw: &str) -> Result<MoveId, EngineError> {
    if raw == "none" {
        return Ok(MoveId::none());
    }
    MoveId::from_id(raw)
}

fn serialize_move(slot: &Move) -> String {
    format!("{};{};{}", slot.id.as_str(), slot.disabled, slot.pp)
}

fn deserialize_move(text: &str) -> Result<Move, EngineError> {
    let fields = split_exact(text, ';', 3, "move")?;
    Ok(Move {
        id: move_id(fields[0])?,
        disabled: flag(fields[1], "move disabled flag")?,
        pp: number(fields[2], "pp")?,
    })
}

fn serialize_pokemon(pokemon: &Pokemon) -> String {
    let mut fields = vec![
        pokemon.id.to_string(),
        pokemon.level.to_string(),
        pokemon.types.0.to_string(),
        pokemon.types.1.to_string(),
        pokemon.hp.to_string(),
        pokemon.maxhp.to_string(),
        pokemon.ability.to_string(),
        pokemon.item.to_string(),
        pokemon.attack.to_string(),
        pokemon.defense.to_string(),
        pokemon.special_attack.to_string(),
        pokemon.special_defense.to_string(),
        pokemon.speed.to_string(),
        pokemon.status.to_string(),
        pokemon.rest_turns.to_string(),
        pokemon.sleep_turns.to_string(),
        pokemon.weight_kg.to_string(),
    ];
    fields.extend(pokemon.moves.iter().map(serialize_move));
    fields.join(",")
}

fn deserialize_pokemon(text: &str) -> Result<Pokemon, EngineError> {
    let f = split_exact(text, ',', POKEMON_FIELDS, "pokemon")?;
    let mut moves = [Move::none(); 4];
    for (slot, field) in moves.iter_mut().zip(&f[17..21]) {
        *slot = deserialize_move(field)?;
    }
    Ok(Pokemon {
        id: species_data(f[0])?.id,
        level: number(f[1], "level")?,
        types: (PokemonType::from_id(f[2])?, PokemonType::from_id(f[3])?),
        hp: number(f[4], "hp")?,
        maxhp: number(f[5], "maxhp")?,
        ability: Ability::from_id(f[6])?,
        item: Item::from_id(f[7])?,
        attack: number(f[8], "attack")?,
        defense: number(f[9], "defense")?,
        special_attack: number(f[10], "special attack")?,
        special_defense: number(f[11], "special defense")?,
        speed: number(f[12], "speed")?,
        status: PokemonStatus::from_id(f[13])?,
        rest_turns: number(f[14], "rest turns")?,
        sleep_turns: number(f[15], "sleep turns")?,
        weight_kg: number(f[16], "weight")?,
        moves,
    })
}

fn serialize_choice(choice: &MoveChoice) -> String {
    match choice {
        MoveChoice::Move(index) => format!("move:{}", index),
        MoveChoice::Switch(index) => format!("switch:{}", index),
        MoveChoice::None => "none".to_string(),
    }
}

/// Splits `move:N` / `switch:N` / `none` into the tag and index.
fn tagged_index(text: &str) -> Result<Option<(&str, usize)>, EngineError> {
    if text == "none" {
        return Ok(None);
    }
    let (tag, index) = text
        .split_once(':')
        .ok_or_else(|| EngineError::malformed(format!("{} is not a tagged choice", text)))?;
    Ok(Some((tag, number(index, "choice index")?)))
}

fn deserialize_choice(text: &str) -> Result<MoveChoice, EngineError> {
    match tagged_index(text)? {
        None => Ok(MoveChoice::None),
        Some(("move", index)) => Ok(MoveChoice::Move(index)),
        Some(("switch", index)) => Ok(MoveChoice::Switch(index)),
        Some((tag, _)) => Err(EngineError::malformed(format!("unknown choice tag {}", tag))),
    }
}

fn serialize_last_used(last: &LastUsedMove) -> String {
    match last {
        LastUsedMove::Move(index) => format!("move:{}", index),
        LastUsedMove::Switch(index) => format!("switch:{}", index),
        LastUsedMove::None => "none".to_string(),
    }
}

fn deserialize_last_used(text: &str) -> Result<LastUsedMove, EngineError> {
    match tagged_index(text)? {
        None => Ok(LastUsedMove::None),
        Some(("move", index)) => Ok(LastUsedMove::Move(index)),
        Some(("switch", index)) => Ok(LastUsedMove::Switch(index)),
        Some((tag, _)) => Err(EngineError::malformed(format!(
            "unknown last used move tag {}",
            tag
        ))),
    }
}

fn serialize_side_conditions(conditions: &SideConditions) -> String {
    PokemonSideCondition::ALL
        .iter()
        .map(|condition| conditions.get(*condition).to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn deserialize_side_conditions(text: &str) -> Result<SideConditions, EngineError> {
    let fields = split_exact(text, ';', PokemonSideCondition::ALL.len(), "side conditions")?;
    let mut conditions = SideConditions::default();
    for (condition, field) in PokemonSideCondition::ALL.iter().zip(fields) {
        *conditions.get_mut(*condition) = number(field, condition.as_str())?;
    }
    Ok(conditions)
}

fn serialize_volatiles(volatiles: &BTreeSet<PokemonVolatileStatus>) -> String {
    volatiles
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(":")
}

fn deserialize_volatiles(text: &str) -> Result<BTreeSet<PokemonVolatileStatus>, EngineError> {
    if text.is_empty() {
        return Ok(BTreeSet::new());
    }
    text.split(':').map(PokemonVolatileStatus::from_id).collect()
}

fn serialize_durations(durations: &VolatileStatusDurations) -> String {
    format!(
        "{};{};{}",
        durations.confusion, durations.taunt, durations.yawn
    )
}

fn deserialize_durations(text: &str) -> Result<VolatileStatusDurations, EngineError> {
    let fields = split_exact(text, ';', 3, "volatile durations")?;
    Ok(VolatileStatusDurations {
        confusion: number(fields[0], "confusion duration")?,
        taunt: number(fields[1], "taunt duration")?,
        yawn: number(fields[2], "yawn duration")?,
    })
}

fn serialize_side(side: &Side) -> String {
    let mut fields: Vec<String> = side.pokemon.iter().map(serialize_pokemon).collect();
    fields.push(side.active_index.to_string());
    fields.push(serialize_side_conditions(&side.side_conditions));
    fields.push(serialize_volatiles(&side.volatile_statuses));
    fields.push(serialize_durations(&side.volatile_status_durations));
    fields.push(side.substitute_health.to_string());
    for stat in PokemonBoostableStat::ALL {
        fields.push(side.boosts.get(*stat).to_string());
    }
    fields.push(side.wish.0.to_string());
    fields.push(side.wish.1.to_string());
    fields.push(side.force_switch.to_string());
    fields.push(serialize_choice(&side.switch_out_move_second_saved_move));
    fields.push(side.baton_passing.to_string());
    fields.push(side.force_trapped.to_string());
    fields.push(serialize_last_used(&side.last_used_move));
    fields.push(side.slow_uturn_move.to_string());
    fields.join("=")
}

fn deserialize_side(text: &str) -> Result<Side, EngineError> {
    let fields: Vec<&str> = text.split('=').collect();
    if fields.len() <= SIDE_FIXED_FIELDS {
        return Err(EngineError::malformed(format!(
            "side has {} fields, expected at least {}",
            fields.len(),
            SIDE_FIXED_FIELDS + 1
        )));
    }
    let (roster, rest) = fields.split_at(fields.len() - SIDE_FIXED_FIELDS);
    let pokemon = roster
        .iter()
        .map(|p| deserialize_pokemon(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut boosts = StatStages::default();
    for (stat, field) in PokemonBoostableStat::ALL.iter().zip(&rest[5..12]) {
        *boosts.get_mut(*stat) = number(field, stat.as_str())?;
    }

    Ok(Side {
        pokemon,
        active_index: number(rest[0], "active index")?,
        side_conditions: deserialize_side_conditions(rest[1])?,
        volatile_statuses: deserialize_volatiles(rest[2])?,
        volatile_status_durations: deserialize_durations(rest[3])?,
        substitute_health: number(rest[4], "substitute health")?,
        boosts,
        wish: (
            number(rest[12], "wish turns")?,
            number(rest[13], "wish amount")?,
        ),
        force_switch: flag(rest[14], "force switch")?,
        switch_out_move_second_saved_move: deserialize_choice(rest[15])?,
        baton_passing: flag(rest[16], "baton passing")?,
        force_trapped: flag(rest[17], "force trapped")?,
        last_used_move: deserialize_last_used(rest[18])?,
        slow_uturn_move: flag(rest[19], "slow u-turn")?,
    })
}

impl State {
    pub fn serialize(&self) -> String {
        [
            serialize_side(&self.side_one),
            serialize_side(&self.side_two),
            format!(
                "{};{}",
                self.weather.weather_type, self.weather.turns_remaining
            ),
            format!(
                "{};{}",
                self.terrain.terrain_type, self.terrain.turns_remaining
            ),
            format!(
                "{};{}",
                self.trick_room.active, self.trick_room.turns_remaining
            ),
            self.team_preview.to_string(),
        ]
        .join("/")
    }

    /// Parses the output of [`State::serialize`] and checks the result is a
    /// playable position.
    pub fn deserialize(text: &str) -> Result<State, EngineError> {
        let fields = split_exact(text.trim(), '/', STATE_FIELDS, "state")?;
        let weather = split_exact(fields[2], ';', 2, "weather")?;
        let terrain = split_exact(fields[3], ';', 2, "terrain")?;
        let trick_room = split_exact(fields[4], ';', 2, "trick room")?;

        let state = State {
            side_one: deserialize_side(fields[0])?,
            side_two: deserialize_side(fields[1])?,
            weather: StateWeather {
                weather_type: Weather::from_id(weather[0])?,
                turns_remaining: number(weather[1], "weather turns")?,
            },
            terrain: StateTerrain {
                terrain_type: Terrain::from_id(terrain[0])?,
                turns_remaining: number(terrain[1], "terrain turns")?,
            },
            trick_room: StateTrickRoom {
                active: flag(trick_room[0], "trick room")?,
                turns_remaining: number(trick_room[1], "trick room turns")?,
            },
            team_preview: flag(fields[5], "team preview")?,
        };
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifierKind;
    use crate::sim::stats::Nature;

    fn rich_state() -> State {
        let garchomp = Pokemon::from_species(
            "garchomp",
            100,
            Nature::Jolly,
            [0, 252, 0, 0, 4, 252],
            [31; 6],
            &["earthquake", "dragonclaw", "stealthrock", "swordsdance"],
            "roughskin",
            "choicescarf",
        )
        .expect("garchomp");
        let mut state = State::default();
        state.side_one.pokemon[0] = garchomp;
        state.side_one.pokemon[0].moves[1].pp = 3;
        state.side_one.pokemon[0].moves[2].disabled = true;
        state.side_one.pokemon[2].status = PokemonStatus::Sleep;
        state.side_one.pokemon[2].sleep_turns = 2;
        state.side_one.pokemon[3].hp = 0;
        state.side_one.active_index = 0;
        state.side_one.side_conditions.spikes = 2;
        state.side_one.side_conditions.reflect = 4;
        state.side_one.boosts.attack = 2;
        state.side_one.boosts.evasion = -1;
        state.side_one.volatile_statuses.insert(PokemonVolatileStatus::Substitute);
        state.side_one.volatile_statuses.insert(PokemonVolatileStatus::Confusion);
        state.side_one.volatile_status_durations.confusion = 2;
        state.side_one.substitute_health = 25;
        state.side_one.wish = (2, 50);
        state.side_one.last_used_move = LastUsedMove::Move(0);
        state.side_two.active_index = 4;
        state.side_two.force_switch = true;
        state.side_two.switch_out_move_second_saved_move = MoveChoice::Move(3);
        state.side_two.slow_uturn_move = true;
        state.side_two.last_used_move = LastUsedMove::Switch(4);
        state.side_two.pokemon.truncate(5);
        state.weather = StateWeather {
            weather_type: Weather::Sand,
            turns_remaining: -1,
        };
        state.terrain = StateTerrain {
            terrain_type: Terrain::ElectricTerrain,
            turns_remaining: 3,
        };
        state.trick_room = StateTrickRoom {
            active: true,
            turns_remaining: 1,
        };
        state
    }

    #[test]
    fn default_state_round_trips() {
        let state = State::default();
        let text = state.serialize();
        assert_eq!(State::deserialize(&text).expect("decode"), state);
    }

    #[test]
    fn every_field_survives_the_round_trip() {
        let state = rich_state();
        let text = state.serialize();
        let decoded = State::deserialize(&text).expect("decode");
        assert_eq!(decoded, state);
        assert_eq!(decoded.serialize(), text);
    }

    #[test]
    fn roster_length_comes_from_the_field_count() {
        let decoded = State::deserialize(&rich_state().serialize()).expect("decode");
        assert_eq!(decoded.side_one.pokemon.len(), 6);
        assert_eq!(decoded.side_two.pokemon.len(), 5);
    }

    #[test]
    fn unknown_move_is_reported_by_name() {
        let text = State::default().serialize().replacen("none;true;0", "notamove;false;5", 1);
        match State::deserialize(&text) {
            Err(EngineError::UnknownIdentifier { kind, name }) => {
                assert_eq!(kind, IdentifierKind::Move);
                assert_eq!(name, "notamove");
            }
            other => panic!("expected unknown move, got {:?}", other),
        }
    }

    #[test]
    fn missing_state_field_is_malformed() {
        let text = State::default().serialize();
        let (truncated, _) = text.rsplit_once('/').expect("separator");
        assert!(matches!(
            State::deserialize(truncated),
            Err(EngineError::MalformedState(_))
        ));
    }

    #[test]
    fn unparsable_number_is_malformed() {
        let text = State::default()
            .serialize()
            .replacen("rattata,100,", "rattata,lots,", 1);
        assert!(matches!(
            State::deserialize(&text),
            Err(EngineError::MalformedState(_))
        ));
    }

    #[test]
    fn out_of_range_hp_fails_validation() {
        let text = State::default()
            .serialize()
            .replacen(",100,100,", ",150,100,", 1);
        assert!(matches!(
            State::deserialize(&text),
            Err(EngineError::MalformedState(_))
        ));
    }
}
