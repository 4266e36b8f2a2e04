//! Curriculum trees: blocks of credit requirements, course multiplicity and fillers.
mod block;
mod curriculum_data;
mod curriculum_error;
mod curriculum_tree;
mod filler;
mod multiplicity;

pub use block::*;
pub use curriculum_data::*;
pub use curriculum_error::*;
pub use curriculum_tree::*;
pub use filler::*;
pub use multiplicity::Multiplicity;
