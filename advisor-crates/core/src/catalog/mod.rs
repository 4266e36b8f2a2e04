//! Course and equivalence data consumed by the engines.
mod course_catalog;
mod course_info;
mod equivalence_info;

pub use course_catalog::*;
pub use course_info::*;
pub use equivalence_info::*;
