use pokemon_battle_core::sim::state::Move;
use pokemon_battle_core::sim::{MoveChoice, Pokemon, Side, State};
use pokemon_battle_search::search::{expectiminimax_search, Deadline};
use pokemon_battle_search::{
    get_safest_action, iterative_deepen_expectiminimax, iterative_deepening_search,
    iterative_deepening_search_with, pick_safest, ExpectiminimaxConfig,
};
use std::time::Duration;

fn make_pokemon(moves: &[&str], speed: i16) -> Pokemon {
    let mut pokemon = Pokemon::default();
    pokemon.speed = speed;
    for (slot, name) in pokemon.moves.iter_mut().zip(moves) {
        *slot = Move::from_id(name).expect("move exists");
    }
    pokemon
}

fn make_state(side_one: Vec<Pokemon>, side_two: Vec<Pokemon>) -> State {
    State::new(Side::new(side_one), Side::new(side_two))
}

#[test]
fn single_action_each_side_under_a_millisecond() {
    let state = make_state(
        vec![make_pokemon(&["tackle"], 100)],
        vec![make_pokemon(&["tackle"], 90)],
    );
    let result = iterative_deepening_search(&state, 1).expect("search");
    assert_eq!(result.s1_options, vec![MoveChoice::Move(0)]);
    assert_eq!(result.s2_options, vec![MoveChoice::Move(0)]);
    assert!(result.depth_searched >= 1);
    assert!(result.matrix.get(0, 0).is_some());
    assert_eq!(get_safest_action(&result).0, MoveChoice::Move(0));
}

#[test]
fn safest_action_attacks_when_the_opponent_idles() {
    let state = make_state(
        vec![make_pokemon(&["splash", "tackle"], 120)],
        vec![make_pokemon(&["splash"], 100)],
    );
    let config = ExpectiminimaxConfig::default().with_max_depth(1);
    let result = iterative_deepening_search_with(&state, 1_000, &config).expect("search");
    assert_eq!(result.depth_searched, 1);
    let (choice, value) = get_safest_action(&result);
    assert_eq!(choice, MoveChoice::Move(1));
    assert!(value > 0.0);
}

#[test]
fn pruning_never_changes_the_safest_row() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "splash", "thunderwave"], 120)],
        vec![make_pokemon(&["tackle", "splash"], 100)],
    );
    let (s1, s2) = state.get_all_options();
    let mut scratch = state.clone();
    let pruned =
        expectiminimax_search(&mut scratch, 2, &s1, &s2, true, &Deadline::never()).expect("done");
    let full =
        expectiminimax_search(&mut scratch, 2, &s1, &s2, false, &Deadline::never()).expect("done");
    assert_eq!(scratch, state);
    assert!(full.iter().all(Option::is_some));
    // The first row is always searched in full.
    assert!(pruned[..s2.len()].iter().all(Option::is_some));
    assert_eq!(
        pick_safest(&pruned, s1.len(), s2.len()),
        pick_safest(&full, s1.len(), s2.len())
    );
}

#[test]
fn deepening_stops_at_the_configured_depth() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "splash"], 120)],
        vec![make_pokemon(&["tackle"], 100)],
    );
    let (s1, s2) = state.get_all_options();
    let mut scratch = state.clone();
    let config = ExpectiminimaxConfig::default().with_max_depth(3);
    let result =
        iterative_deepen_expectiminimax(&mut scratch, s1, s2, Duration::from_secs(30), &config);
    assert_eq!(result.depth_searched, 3);
    assert_eq!(scratch, state);
    // Reordering keeps the row labels attached to their payoffs.
    assert_eq!(result.s1_options[0], MoveChoice::Move(0));
}

#[test]
fn zero_budget_still_returns_depth_one() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "splash"], 120), make_pokemon(&["tackle"], 80)],
        vec![make_pokemon(&["tackle"], 100), make_pokemon(&["ember"], 80)],
    );
    let (s1, s2) = state.get_all_options();
    let mut scratch = state.clone();
    let result = iterative_deepen_expectiminimax(
        &mut scratch,
        s1.clone(),
        s2.clone(),
        Duration::ZERO,
        &ExpectiminimaxConfig::default(),
    );
    assert_eq!(result.depth_searched, 1);
    assert_eq!(result.matrix.rows(), s1.len());
    assert_eq!(result.matrix.cols(), s2.len());
    assert_eq!(scratch, state);
}
