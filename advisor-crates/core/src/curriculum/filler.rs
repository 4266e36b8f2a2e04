use serde::Deserialize;
use serde::Serialize;

use crate::plan::PseudoCourse;

/// A course recommended to fill curriculum blocks that accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filler {
    pub course: PseudoCourse,
    /// Recommendations with a lower order are scheduled first.
    pub order: i32,
    /// Biases the solver among otherwise equal recommendations; lower is preferred.
    #[serde(default)]
    pub cost_offset: i64,
}

impl Filler {
    pub fn new(course: PseudoCourse, order: i32) -> Filler {
        Filler {
            course,
            order,
            cost_offset: 0,
        }
    }

    pub fn with_cost_offset(mut self, cost_offset: i64) -> Filler {
        self.cost_offset = cost_offset;
        self
    }
}

crate::storage_key!(
    /// Addresses a filler of a [`Curriculum`](super::Curriculum), in recommendation order.
    pub FillerId
);

/// A filler together with the code it is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerEntry {
    pub code: String,
    pub filler: Filler,
}
