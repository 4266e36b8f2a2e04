//! Study plans and the classes inside them.
mod pseudo_course;
mod student_plan;

pub use pseudo_course::*;
pub use student_plan::*;
