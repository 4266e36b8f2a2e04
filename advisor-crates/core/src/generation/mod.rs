//! Completes a plan with the semesters needed to fulfil its curriculum.
//!
//! Generation asks the curriculum solver which recommended courses would fill the unmet blocks,
//! adds the prerequisites those courses need, groups courses which must be taken together and
//! then places the groups greedily into new semesters.
mod corequisites;
mod generator;
mod generator_options;
mod hidden_requirements;
mod superblock;

pub use generator::*;
pub use generator_options::*;
pub use superblock::superblock_priority;
pub use superblock::SUPERBLOCK_PRIORITY;
