/// The recommended credit load of a generated semester.
pub const DEFAULT_GENERATOR_MAX_CREDITS: u32 = 50;

/// Configures a [`PlanGenerator`](super::PlanGenerator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Classes are not added to a semester beyond this many credits, unless the semester is
    /// empty.
    pub max_credits: u32,
    /// How many times hidden requirements are inferred from the growing list of courses to pass.
    pub max_inference_rounds: usize,
    /// Hidden requirement inference is skipped when the normal form of the requirements grows
    /// beyond this many clauses.
    pub max_dnf_clauses: usize,
    /// Placement gives up after this many consecutive semesters in which nothing could be placed.
    pub max_empty_semesters: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            max_credits: DEFAULT_GENERATOR_MAX_CREDITS,
            max_inference_rounds: 8,
            max_dnf_clauses: 512,
            max_empty_semesters: 2,
        }
    }
}
