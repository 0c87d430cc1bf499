//! Battle simulation: the state model, legal choices, damage, and the
//! instruction generator with its reversible applier.

pub mod choice;
pub mod damage;
pub mod generate;
pub mod instruction;
pub mod state;
pub mod stats;

pub use choice::MoveChoice;
pub use generate::generate_instructions_from_move_pair;
pub use instruction::{Instruction, StateInstructions};
pub use state::{Move, Pokemon, Side, SideReference, State};
