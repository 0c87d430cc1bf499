//! Decoupled-UCT Monte Carlo tree search over simultaneous moves.
//!
//! Each node keeps independent option statistics for both sides; a joint
//! choice leads to one child per generated branch, and descent samples a
//! child by branch probability. The single working state is walked up and
//! down the tree by applying and reversing branch instructions.

use pokemon_battle_core::evaluate::evaluate;
use pokemon_battle_core::sim::{
    generate_instructions_from_move_pair, MoveChoice, State, StateInstructions,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::MctsConfig;

/// Maps an evaluation onto (0, 1); about 200 points is near certainty.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-0.0125 * x).exp())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MctsSideResult {
    pub move_choice: MoveChoice,
    pub total_score: f32,
    pub visits: u64,
}

impl MctsSideResult {
    fn new(move_choice: MoveChoice) -> Self {
        Self {
            move_choice,
            total_score: 0.0,
            visits: 0,
        }
    }

    pub fn average_score(&self) -> f32 {
        if self.visits == 0 {
            return 0.0;
        }
        self.total_score / self.visits as f32
    }

    fn ucb1(&self, parent_visits: u64, c: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }
        let visits = self.visits as f32;
        self.total_score / visits + c * ((parent_visits.max(1) as f32).ln() / visits).sqrt()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MctsResult {
    pub s1: Vec<MctsSideResult>,
    pub s2: Vec<MctsSideResult>,
    pub iteration_count: u64,
}

impl MctsResult {
    /// Most visited option per side; the first one wins ties.
    pub fn best_choices(&self) -> (Option<MoveChoice>, Option<MoveChoice>) {
        (most_visited(&self.s1), most_visited(&self.s2))
    }
}

fn most_visited(options: &[MctsSideResult]) -> Option<MoveChoice> {
    let mut best: Option<&MctsSideResult> = None;
    for option in options {
        match best {
            Some(current) if option.visits <= current.visits => {}
            _ => best = Some(option),
        }
    }
    best.map(|o| o.move_choice)
}

struct Node {
    parent: Option<NodeId>,
    /// Option indices in the parent that led here.
    s1_index: usize,
    s2_index: usize,
    instructions: StateInstructions,
    visits: u64,
    s1_options: Vec<MctsSideResult>,
    s2_options: Vec<MctsSideResult>,
    children: HashMap<(usize, usize), Vec<NodeId>>,
}

impl Node {
    fn new(
        parent: Option<NodeId>,
        s1_index: usize,
        s2_index: usize,
        instructions: StateInstructions,
        s1_options: Vec<MoveChoice>,
        s2_options: Vec<MoveChoice>,
    ) -> Self {
        Node {
            parent,
            s1_index,
            s2_index,
            instructions,
            visits: 0,
            s1_options: s1_options.into_iter().map(MctsSideResult::new).collect(),
            s2_options: s2_options.into_iter().map(MctsSideResult::new).collect(),
            children: HashMap::new(),
        }
    }

    fn pick(&self, options: &[MctsSideResult], c: f32) -> usize {
        let mut best_index = 0;
        let mut best_score = f32::MIN;
        for (index, option) in options.iter().enumerate() {
            let score = option.ucb1(self.visits, c);
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }
        best_index
    }
}

/// Arena of search nodes; the root is always the first entry.
struct MctsTree {
    nodes: Vec<Node>,
}

impl MctsTree {
    const ROOT: NodeId = NodeId(0);

    fn new(s1_options: Vec<MoveChoice>, s2_options: Vec<MoveChoice>) -> Self {
        let root = Node::new(None, 0, 0, StateInstructions::default(), s1_options, s2_options);
        MctsTree { nodes: vec![root] }
    }

    fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn sample(&self, children: &[NodeId], rng: &mut SmallRng) -> Option<NodeId> {
        let total: f32 = children
            .iter()
            .map(|id| self.get(*id).instructions.percentage)
            .sum();
        let mut roll = rng.gen::<f32>() * total;
        for id in children {
            let p = self.get(*id).instructions.percentage;
            if roll < p {
                return Some(*id);
            }
            roll -= p;
        }
        children.last().copied()
    }

    /// Walks down from the root, applying sampled branches, until reaching a
    /// node whose chosen joint action has not been expanded yet.
    fn select(&self, state: &mut State, c: f32, rng: &mut SmallRng) -> (NodeId, usize, usize) {
        let mut current = Self::ROOT;
        loop {
            let node = self.get(current);
            let s1 = node.pick(&node.s1_options, c);
            let s2 = node.pick(&node.s2_options, c);
            let next = node
                .children
                .get(&(s1, s2))
                .and_then(|children| self.sample(children, rng));
            match next {
                Some(child) => {
                    state.apply_instructions(&self.get(child).instructions.instruction_list);
                    current = child;
                }
                None => return (current, s1, s2),
            }
        }
    }

    fn expand(
        &mut self,
        state: &mut State,
        id: NodeId,
        s1: usize,
        s2: usize,
        rng: &mut SmallRng,
    ) -> NodeId {
        let node = self.get(id);
        let s1_choice = node.s1_options[s1].move_choice;
        let s2_choice = node.s2_options[s2].move_choice;
        let finished = id != Self::ROOT && state.battle_is_over() != 0.0;
        if finished || (s1_choice == MoveChoice::None && s2_choice == MoveChoice::None) {
            return id;
        }

        let branches = generate_instructions_from_move_pair(state, &s1_choice, &s2_choice);
        trace!(branches = branches.len(), "expanding joint action");
        let mut children = Vec::with_capacity(branches.len());
        for branch in branches {
            state.apply_instructions(&branch.instruction_list);
            let (next_s1, next_s2) = state.get_all_options();
            state.reverse_instructions(&branch.instruction_list);
            children.push(self.allocate(Node::new(Some(id), s1, s2, branch, next_s1, next_s2)));
        }
        let Some(chosen) = self.sample(&children, rng) else {
            return id;
        };
        state.apply_instructions(&self.get(chosen).instructions.instruction_list);
        self.get_mut(id).children.insert((s1, s2), children);
        chosen
    }

    /// Credits `score` to side one and `1 - score` to side two on the way
    /// back up, rewinding the state to the root.
    fn backpropagate(&mut self, state: &mut State, from: NodeId, score: f32) {
        let mut current = from;
        loop {
            let node = self.get_mut(current);
            node.visits += 1;
            let Some(parent) = node.parent else {
                return;
            };
            let (s1, s2) = (node.s1_index, node.s2_index);
            state.reverse_instructions(&node.instructions.instruction_list);
            let parent_node = self.get_mut(parent);
            parent_node.s1_options[s1].total_score += score;
            parent_node.s1_options[s1].visits += 1;
            parent_node.s2_options[s2].total_score += 1.0 - score;
            parent_node.s2_options[s2].visits += 1;
            current = parent;
        }
    }
}

fn leaf_value(state: &State) -> f32 {
    let over = state.battle_is_over();
    if over == 0.0 {
        sigmoid(evaluate(state))
    } else if over < 0.0 {
        0.0
    } else {
        1.0
    }
}

fn iterate(tree: &mut MctsTree, state: &mut State, c: f32, rng: &mut SmallRng) {
    let (node, s1, s2) = tree.select(state, c, rng);
    let leaf = tree.expand(state, node, s1, s2, rng);
    let score = leaf_value(state);
    tree.backpropagate(state, leaf, score);
}

/// Runs iterations in batches until `max_time` passes or the root visit cap
/// is reached. At least one batch always runs and `state` is left as given.
pub fn perform_mcts(
    state: &mut State,
    side_one_options: Vec<MoveChoice>,
    side_two_options: Vec<MoveChoice>,
    max_time: Duration,
    config: &MctsConfig,
) -> MctsResult {
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut tree = MctsTree::new(side_one_options, side_two_options);
    let start = Instant::now();
    let batch = config.batch_size.max(1);

    'search: loop {
        for _ in 0..batch {
            iterate(&mut tree, state, config.exploration_constant, &mut rng);
            if tree.get(MctsTree::ROOT).visits >= config.max_root_visits {
                break 'search;
            }
        }
        if start.elapsed() >= max_time {
            break;
        }
    }

    let root = tree.get(MctsTree::ROOT);
    debug!(
        iterations = root.visits,
        nodes = tree.nodes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "mcts finished"
    );
    MctsResult {
        s1: root.s1_options.clone(),
        s2: root.s2_options.clone(),
        iteration_count: root.visits,
    }
}

/// Independent searches on `config.threads` workers, each on its own copy of
/// the state, merged by summing root statistics.
pub fn perform_mcts_parallel(
    state: &State,
    side_one_options: Vec<MoveChoice>,
    side_two_options: Vec<MoveChoice>,
    max_time: Duration,
    config: &MctsConfig,
) -> MctsResult {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let results: Vec<MctsResult> = (0..config.threads.max(1) as u64)
        .into_par_iter()
        .map(|worker| {
            let mut scratch = state.clone();
            let worker_config = config.clone().with_seed(mix_seed(base_seed, worker, 0));
            perform_mcts(
                &mut scratch,
                side_one_options.clone(),
                side_two_options.clone(),
                max_time,
                &worker_config,
            )
        })
        .collect();

    let mut merged = MctsResult {
        s1: side_one_options.into_iter().map(MctsSideResult::new).collect(),
        s2: side_two_options.into_iter().map(MctsSideResult::new).collect(),
        iteration_count: 0,
    };
    for result in results {
        merged.iteration_count += result.iteration_count;
        for (total, part) in merged.s1.iter_mut().zip(&result.s1) {
            total.total_score += part.total_score;
            total.visits += part.visits;
        }
        for (total, part) in merged.s2.iter_mut().zip(&result.s2) {
            total.total_score += part.total_score;
            total.visits += part.visits;
        }
    }
    merged
}

/// Derives a per-worker seed from the configured seed, the worker index and
/// a salt, with a splitmix-style finaliser so neighbouring workers diverge.
fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut x = base ^ a.wrapping_mul(0x9E3779B97F4A7C15);
    x ^= b.wrapping_mul(0xC2B2AE3D27D4EB4F);
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ceb9fe1a85ec53);
    x ^ (x >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centred_on_an_even_position() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(400.0) > 0.99);
        assert!(sigmoid(-400.0) < 0.01);
    }

    #[test]
    fn unvisited_options_are_explored_first() {
        let mut visited = MctsSideResult::new(MoveChoice::Move(0));
        visited.visits = 10;
        visited.total_score = 9.0;
        let fresh = MctsSideResult::new(MoveChoice::Move(1));
        assert_eq!(fresh.ucb1(10, 2f32.sqrt()), f32::INFINITY);
        assert!(visited.ucb1(10, 2f32.sqrt()).is_finite());
    }

    #[test]
    fn pick_prefers_the_first_of_equal_scores() {
        let node = Node::new(
            None,
            0,
            0,
            StateInstructions::default(),
            vec![MoveChoice::Move(0), MoveChoice::Move(1)],
            vec![MoveChoice::None],
        );
        assert_eq!(node.pick(&node.s1_options, 2f32.sqrt()), 0);
    }

    #[test]
    fn most_visited_breaks_ties_toward_the_first() {
        let mut a = MctsSideResult::new(MoveChoice::Move(0));
        let mut b = MctsSideResult::new(MoveChoice::Move(1));
        a.visits = 5;
        b.visits = 5;
        assert_eq!(most_visited(&[a, b]), Some(MoveChoice::Move(0)));
    }

    #[test]
    fn mixed_seeds_differ_per_worker() {
        assert_ne!(mix_seed(1, 0, 0), mix_seed(1, 1, 0));
        assert_eq!(mix_seed(9, 2, 0), mix_seed(9, 2, 0));
    }
}
