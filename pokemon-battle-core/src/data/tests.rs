use super::abilities::Ability;
use super::conditions::{PokemonSideCondition, PokemonStatus, Weather};
use super::items::Item;
use super::moves::{MoveCategory, MoveEffect, MoveId, MoveTarget, SecondaryEffect, MOVES};
use super::normalize_id;
use super::species::{species_data, POKEDEX};
use super::types::{type_effectiveness, PokemonType};
use crate::error::{EngineError, IdentifierKind};

#[test]
fn charizard_stats() {
    let charizard = POKEDEX
        .get("charizard")
        .expect("Charizard should exist in the Pokedex");
    assert_eq!(charizard.base_stats.hp, 78);
    assert_eq!(charizard.base_stats.atk, 84);
    assert_eq!(charizard.types, [PokemonType::Fire, PokemonType::Flying]);
}

#[test]
fn species_lookup_normalizes_names() {
    let garchomp = species_data("Garchomp").expect("Garchomp should resolve");
    assert_eq!(garchomp.id, "garchomp");
    assert_eq!(garchomp.base_stats.spe, 102);
}

#[test]
fn unknown_species_is_reported() {
    assert_eq!(
        species_data("missingno"),
        Err(EngineError::UnknownIdentifier {
            kind: IdentifierKind::Species,
            name: "missingno".to_string(),
        })
    );
}

#[test]
fn thunderbolt_secondary_paralysis() {
    let thunderbolt = MOVES
        .get("thunderbolt")
        .expect("Thunderbolt must be present");
    assert_eq!(thunderbolt.base_power, 90.0);
    assert_eq!(thunderbolt.category, MoveCategory::Special);
    let secondary = thunderbolt
        .secondaries
        .first()
        .expect("Thunderbolt should have a secondary effect");
    assert_eq!(secondary.chance, 10.0);
    assert_eq!(secondary.target, MoveTarget::Opponent);
    assert_eq!(
        secondary.effect,
        SecondaryEffect::Status(PokemonStatus::Paralyze)
    );
}

#[test]
fn stealth_rock_sets_a_hazard() {
    let data = MoveId::from_id("Stealth Rock").expect("stealth rock").data();
    assert_eq!(data.category, MoveCategory::Status);
    let condition = data.side_condition.expect("side condition");
    assert_eq!(condition.condition, PokemonSideCondition::Stealthrock);
    assert_eq!(condition.target, MoveTarget::Opponent);
}

#[test]
fn pivot_and_weather_moves_are_tagged() {
    assert_eq!(MoveId::from_id("uturn").expect("uturn").data().effect, MoveEffect::Pivot);
    assert_eq!(
        MoveId::from_id("raindance").expect("raindance").data().weather,
        Some(Weather::Rain)
    );
}

#[test]
fn every_move_key_matches_its_id() {
    for (key, data) in MOVES.entries() {
        assert_eq!(*key, data.id);
        assert_eq!(normalize_id(key), *key);
    }
    for (key, data) in POKEDEX.entries() {
        assert_eq!(*key, data.id);
    }
}

#[test]
fn type_chart_matchups() {
    use PokemonType::*;
    assert_eq!(type_effectiveness(Rock, (Fire, Flying)), 4.0);
    assert_eq!(type_effectiveness(Ground, (Flying, Typeless)), 0.0);
    assert_eq!(type_effectiveness(Water, (Water, Dragon)), 0.25);
    assert_eq!(type_effectiveness(Fighting, (Normal, Normal)), 2.0);
}

#[test]
fn identifier_enums_round_trip_through_their_ids() {
    for ability in Ability::ALL {
        assert_eq!(Ability::from_id(ability.as_str()), Ok(*ability));
    }
    for item in Item::ALL {
        assert_eq!(Item::from_id(item.as_str()), Ok(*item));
    }
    assert_eq!(Item::from_id("Choice Scarf"), Ok(Item::ChoiceScarf));
    assert!(matches!(
        Ability::from_id("notanability"),
        Err(EngineError::UnknownIdentifier {
            kind: IdentifierKind::Ability,
            ..
        })
    ));
}
