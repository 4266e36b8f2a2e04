use serde::Deserialize;
use serde::Serialize;

use super::pseudo_course::PseudoCourse;
use crate::catalog::Term;

/// A study plan: an ordered list of semesters, each holding the classes taken in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub classes: Vec<Vec<PseudoCourse>>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub career: Option<String>,
    pub curriculum: CurriculumSpec,
    /// The term of the first semester of the plan.
    #[serde(default)]
    pub start_term: Term,
}

/// Identifies the curriculum a plan aims for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CurriculumSpec {
    pub cyear: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub minor: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Plan {
    pub fn new(curriculum: CurriculumSpec) -> Plan {
        Plan {
            classes: Vec::new(),
            level: None,
            school: None,
            program: None,
            career: None,
            curriculum,
            start_term: Term::First,
        }
    }

    /// Iterates over `(semester, index, class)` in plan order.
    pub fn iter_classes(&self) -> impl Iterator<Item = (usize, usize, &PseudoCourse)> {
        self.classes.iter().enumerate().flat_map(|(semester, classes)| {
            classes
                .iter()
                .enumerate()
                .map(move |(index, class)| (semester, index, class))
        })
    }

    pub fn term_of(&self, semester: usize) -> Term {
        self.start_term.after(semester)
    }
}

/// Information about the academic progress of the student who owns a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentContext {
    /// The index of the first semester that has not been passed yet. Semesters before it are
    /// history and are never modified.
    pub current_semester: usize,
    /// The courses the student has officially passed.
    #[serde(default)]
    pub passed_courses: Vec<String>,
}

impl StudentContext {
    pub fn has_passed(&self, code: &str) -> bool {
        self.passed_courses.iter().any(|passed| passed == code)
    }
}
