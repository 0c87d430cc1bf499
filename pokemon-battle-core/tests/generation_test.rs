use pokemon_battle_core::data::conditions::{PokemonStatus, Weather};
use pokemon_battle_core::data::types::PokemonType;
use pokemon_battle_core::engine::{calculate_damage, generate_instructions};
use pokemon_battle_core::error::EngineError;
use pokemon_battle_core::sim::state::{Move, StateWeather};
use pokemon_battle_core::sim::stats::Nature;
use pokemon_battle_core::sim::{
    generate_instructions_from_move_pair, Instruction, Pokemon, Side, SideReference, State,
};

fn make_pokemon(species: &str, moves: &[&str], ability: &str, item: &str) -> Pokemon {
    Pokemon::from_species(
        species,
        100,
        Nature::Hardy,
        [84; 6],
        [31; 6],
        moves,
        ability,
        item,
    )
    .expect("species exists")
}

fn make_state(side_one: Vec<Pokemon>, side_two: Vec<Pokemon>) -> State {
    State::new(Side::new(side_one), Side::new(side_two))
}

fn hazard_scenario() -> State {
    make_state(
        vec![
            make_pokemon(
                "garchomp",
                &["earthquake", "stealthrock", "swordsdance", "protect"],
                "roughskin",
                "none",
            ),
            make_pokemon("skarmory", &["roar", "spikes", "uturn"], "sturdy", "leftovers"),
        ],
        vec![
            make_pokemon(
                "charizard",
                &["flamethrower", "roar", "uturn", "willowisp"],
                "blaze",
                "heavydutyboots",
            ),
            make_pokemon("blastoise", &["scald", "rapidspin"], "torrent", "none"),
        ],
    )
}

fn status_scenario() -> State {
    let mut state = make_state(
        vec![
            make_pokemon("gengar", &["substitute", "toxic", "shadowball"], "levitate", "lifeorb"),
            make_pokemon("pikachu", &["voltswitch", "thunderwave"], "none", "none"),
        ],
        vec![
            make_pokemon("venusaur", &["spore", "gigadrain", "sludgebomb"], "chlorophyll", "blacksludge"),
            make_pokemon("tyranitar", &["rockslide", "pursuit", "crunch"], "sandstream", "none"),
        ],
    );
    state.weather = StateWeather {
        weather_type: Weather::Sand,
        turns_remaining: 3,
    };
    state.side_one.side_conditions.spikes = 1;
    state.side_two.side_conditions.stealth_rock = 1;
    state.side_two.active_mut().status = PokemonStatus::Poison;
    state
}

/// Every joint option restores the state, conserves probability and every
/// branch rewinds exactly.
fn assert_every_branch_reverses(state: &State) {
    let (side_one_options, side_two_options) = state.get_all_options();
    for one in &side_one_options {
        for two in &side_two_options {
            let mut scratch = state.clone();
            let branches = generate_instructions_from_move_pair(&mut scratch, one, two);
            assert_eq!(&scratch, state, "generation left the state modified for {one:?} / {two:?}");
            assert!(!branches.is_empty());
            let total: f32 = branches.iter().map(|b| b.percentage).sum();
            assert!((total - 1.0).abs() < 1e-4, "{one:?} / {two:?} sums to {total}");
            for branch in &branches {
                scratch.apply_instructions(&branch.instruction_list);
                let decoded = State::deserialize(&scratch.serialize()).expect("decode");
                assert_eq!(decoded, scratch);
                scratch.reverse_instructions(&branch.instruction_list);
                assert_eq!(&scratch, state);
            }
        }
    }
}

#[test]
fn hazard_scenario_branches_reverse_exactly() {
    assert_every_branch_reverses(&hazard_scenario());
}

#[test]
fn status_scenario_branches_reverse_exactly() {
    assert_every_branch_reverses(&status_scenario());
}

#[test]
fn second_turn_positions_reverse_exactly() {
    let state = hazard_scenario();
    let (side_one_options, side_two_options) = state.get_all_options();
    for one in &side_one_options {
        for two in &side_two_options {
            let mut scratch = state.clone();
            let branches = generate_instructions_from_move_pair(&mut scratch, one, two);
            let Some(first) = branches.first() else {
                continue;
            };
            scratch.apply_instructions(&first.instruction_list);
            assert_every_branch_reverses(&scratch);
        }
    }
}

#[test]
fn basic_exchange_damages_side_two_and_ties_on_speed() {
    let mut attacker = Pokemon::default();
    attacker.types = (PokemonType::Water, PokemonType::Typeless);
    attacker.moves[0] = Move::from_id("tackle").expect("tackle");
    let mut defender = Pokemon::default();
    defender.moves[0] = Move::from_id("ember").expect("ember");
    let state = make_state(vec![attacker], vec![defender]);

    let branches = generate_instructions(&state, "tackle", "ember").expect("generate");
    let hits_side_two = branches.iter().any(|b| {
        b.percentage > 0.0
            && b.instruction_list.iter().any(|i| {
                matches!(i, Instruction::Damage { side: SideReference::SideTwo, amount } if *amount > 0)
            })
    });
    assert!(hits_side_two);

    let first_damaged = |side: SideReference| {
        branches.iter().any(|b| {
            b.instruction_list
                .iter()
                .find_map(|i| match i {
                    Instruction::Damage { side, .. } => Some(*side),
                    _ => None,
                })
                == Some(side)
        })
    };
    // Equal speed: either side can be hit first.
    assert!(first_damaged(SideReference::SideOne));
    assert!(first_damaged(SideReference::SideTwo));
}

#[test]
fn zero_pp_move_is_illegal() {
    let mut state = hazard_scenario();
    state.side_one.active_mut().moves[0].pp = 0;
    assert!(matches!(
        generate_instructions(&state, "earthquake", "flamethrower"),
        Err(EngineError::IllegalAction {
            side: SideReference::SideOne,
            ..
        })
    ));
}

#[test]
fn switching_to_the_active_pokemon_is_illegal() {
    let state = hazard_scenario();
    for action in ["switch garchomp", "garchomp"] {
        assert!(
            matches!(
                generate_instructions(&state, action, "flamethrower"),
                Err(EngineError::IllegalAction {
                    side: SideReference::SideOne,
                    ..
                })
            ),
            "{action}"
        );
    }
    assert!(generate_instructions(&state, "switch skarmory", "flamethrower").is_ok());
}

#[test]
fn switching_to_a_fainted_or_absent_pokemon_is_illegal() {
    let mut state = hazard_scenario();
    state.side_two.pokemon[1].hp = 0;
    for action in ["switch blastoise", "switch pikachu"] {
        assert!(
            matches!(
                generate_instructions(&state, "earthquake", action),
                Err(EngineError::IllegalAction {
                    side: SideReference::SideTwo,
                    ..
                })
            ),
            "{action}"
        );
    }
    assert!(matches!(
        generate_instructions(&state, "switch missingno", "flamethrower"),
        Err(EngineError::UnknownIdentifier { .. })
    ));
}

#[test]
fn every_available_move_is_accepted() {
    let state = hazard_scenario();
    for name in ["earthquake", "stealthrock", "swordsdance", "protect"] {
        assert!(generate_instructions(&state, name, "willowisp").is_ok(), "{name}");
    }
}

#[test]
fn damage_rolls_are_pure() {
    let state = hazard_scenario();
    let first = calculate_damage(&state, "earthquake", "flamethrower", true).expect("damage");
    let second = calculate_damage(&state, "earthquake", "flamethrower", true).expect("damage");
    assert_eq!(first, second);
    // Charizard is immune to Earthquake.
    assert_eq!(first.0, vec![0]);
    assert_eq!(first.1.len(), 16);
}

#[test]
fn scenario_states_round_trip_through_text() {
    for state in [hazard_scenario(), status_scenario()] {
        assert_eq!(State::deserialize(&state.serialize()).expect("decode"), state);
    }
}
