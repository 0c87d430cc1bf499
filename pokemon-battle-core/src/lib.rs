//! Singles battle engine: state model, exhaustive turn generation with
//! reversible instructions, damage rolls, a static evaluator and a compact
//! text form of the state.
//!
//! The main entry points are [`engine::generate_instructions`] and
//! [`engine::calculate_damage`]; searches build on
//! [`sim::generate_instructions_from_move_pair`] together with
//! [`State::apply_instructions`](sim::State::apply_instructions) and
//! [`State::reverse_instructions`](sim::State::reverse_instructions).

pub mod data;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod serialize;
pub mod sim;

pub use error::EngineError;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::engine::{calculate_damage, generate_instructions, legal_actions};
    pub use crate::error::{EngineError, IdentifierKind};
    pub use crate::evaluate::evaluate;
    pub use crate::sim::{
        generate_instructions_from_move_pair, Instruction, Move, MoveChoice, Pokemon, Side,
        SideReference, State, StateInstructions,
    };
}
