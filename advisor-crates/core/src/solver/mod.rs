//! Assignment of plan classes to curriculum blocks, and the diagnostics derived from it.
mod curriculum_diagnoser;
mod curriculum_solver;
mod dot;
mod solved_curriculum;

pub use curriculum_diagnoser::*;
pub use curriculum_solver::*;
pub use solved_curriculum::*;
