use pokemon_battle_core::sim::state::Move;
use pokemon_battle_core::sim::{MoveChoice, Pokemon, Side, State};
use pokemon_battle_search::{
    monte_carlo_search, monte_carlo_search_with, perform_mcts, perform_mcts_parallel, MctsConfig,
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

fn capped(visits: u64, seed: u64) -> MctsConfig {
    MctsConfig::default()
        .with_seed(seed)
        .with_batch_size(50)
        .with_max_root_visits(visits)
}

#[test]
fn single_action_each_side_under_a_millisecond() {
    let state = make_state(
        vec![make_pokemon(&["tackle"], 100)],
        vec![make_pokemon(&["tackle"], 90)],
    );
    let result = monte_carlo_search(&state, 1).expect("search");
    assert_eq!(result.s1.len(), 1);
    assert_eq!(result.s2.len(), 1);
    assert_eq!(result.s1[0].move_choice, MoveChoice::Move(0));
    assert_eq!(result.s2[0].move_choice, MoveChoice::Move(0));
    assert!(result.iteration_count >= 1);
    assert!(result.s1[0].average_score().is_finite());
}

#[test]
fn mcts_is_deterministic_for_same_seed() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "thunderwave"], 120), make_pokemon(&["tackle"], 80)],
        vec![make_pokemon(&["tackle", "splash"], 100), make_pokemon(&["ember"], 80)],
    );
    let config = capped(400, 999);
    let first = monte_carlo_search_with(&state, 10_000, &config).expect("search");
    let second = monte_carlo_search_with(&state, 10_000, &config).expect("search");
    assert_eq!(first.s1, second.s1);
    assert_eq!(first.s2, second.s2);
    assert_eq!(first.iteration_count, 400);
}

#[test]
fn root_visits_are_spread_over_root_options() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "splash"], 120)],
        vec![make_pokemon(&["tackle", "splash"], 100)],
    );
    let result = monte_carlo_search_with(&state, 10_000, &capped(300, 5)).expect("search");
    let s1_visits: u64 = result.s1.iter().map(|o| o.visits).sum();
    let s2_visits: u64 = result.s2.iter().map(|o| o.visits).sum();
    assert_eq!(s1_visits, result.iteration_count);
    assert_eq!(s2_visits, result.iteration_count);
}

#[test]
fn search_leaves_the_state_untouched() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "uturn"], 120), make_pokemon(&["tackle"], 80)],
        vec![make_pokemon(&["tackle", "roar"], 100), make_pokemon(&["tackle"], 80)],
    );
    let mut scratch = state.clone();
    let (s1, s2) = scratch.get_all_options();
    perform_mcts(&mut scratch, s1, s2, Duration::from_secs(10), &capped(500, 3));
    assert_eq!(scratch, state);
}

#[test]
fn mcts_prefers_attacking_over_doing_nothing() {
    let state = make_state(
        vec![make_pokemon(&["splash", "tackle"], 120)],
        vec![make_pokemon(&["splash"], 100)],
    );
    let result = monte_carlo_search_with(&state, 10_000, &capped(2_000, 11)).expect("search");
    let (best, _) = result.best_choices();
    assert_eq!(best, Some(MoveChoice::Move(1)));
}

#[test]
fn parallel_workers_merge_their_statistics() {
    let state = make_state(
        vec![make_pokemon(&["tackle", "splash"], 120)],
        vec![make_pokemon(&["tackle"], 100)],
    );
    let (s1, s2) = state.get_all_options();
    let config = capped(200, 42).with_threads(3);
    let result = perform_mcts_parallel(&state, s1, s2, Duration::from_secs(10), &config);
    assert_eq!(result.iteration_count, 600);
    let visits: u64 = result.s1.iter().map(|o| o.visits).sum();
    assert_eq!(visits, 600);
}
