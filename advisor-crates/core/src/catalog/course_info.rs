use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::requirements::Expr;

/// Static information about a course, as provided by the course database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInfo {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub credits: u32,
    /// The prerequisites of the course; courses without requirements use `Const(true)`.
    #[serde(default = "no_requirements")]
    pub deps: Expr,
    #[serde(default)]
    pub semestrality: Semestrality,
    /// The modern code of a course that has been renamed, if any.
    #[serde(default)]
    pub canonical: Option<String>,
    /// Whether the course is still offered at all.
    #[serde(default = "available")]
    pub is_available: bool,
}

fn no_requirements() -> Expr {
    Expr::constant(true)
}

fn available() -> bool {
    true
}

impl CourseInfo {
    /// A course without requirements, offered in both terms.
    pub fn new(code: impl Into<String>, credits: u32) -> CourseInfo {
        CourseInfo {
            code: code.into(),
            name: String::new(),
            credits,
            deps: no_requirements(),
            semestrality: Semestrality::default(),
            canonical: None,
            is_available: true,
        }
    }

    pub fn with_deps(mut self, deps: Expr) -> CourseInfo {
        self.deps = deps;
        self
    }

    pub fn with_semestrality(mut self, semestrality: Semestrality) -> CourseInfo {
        self.semestrality = semestrality;
        self
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> CourseInfo {
        self.canonical = Some(canonical.into());
        self
    }

    pub fn unavailable(mut self) -> CourseInfo {
        self.is_available = false;
        self
    }
}

/// The terms of the academic year in which a course is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semestrality {
    pub first: bool,
    pub second: bool,
}

impl Default for Semestrality {
    fn default() -> Self {
        Semestrality {
            first: true,
            second: true,
        }
    }
}

impl Semestrality {
    /// Whether the course is offered in `term`. A course that lists no term at all is assumed to
    /// be offered in both, since the data then carries no information.
    pub fn is_offered_in(&self, term: Term) -> bool {
        match (self.first, self.second) {
            (false, false) => true,
            _ => match term {
                Term::First => self.first,
                Term::Second => self.second,
            },
        }
    }
}

/// A half of the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    #[default]
    First,
    Second,
}

impl Term {
    /// The term of the semester at `index` in a plan whose first semester is in `self`.
    pub fn after(self, index: usize) -> Term {
        let parity = match self {
            Term::First => 0,
            Term::Second => 1,
        };
        if (parity + index) % 2 == 0 {
            Term::First
        } else {
            Term::Second
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::First => write!(f, "first"),
            Term::Second => write!(f, "second"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_alternate_from_the_starting_term() {
        assert_eq!(Term::First.after(0), Term::First);
        assert_eq!(Term::First.after(3), Term::Second);
        assert_eq!(Term::Second.after(1), Term::First);
    }

    #[test]
    fn course_without_term_information_is_offered_always() {
        let none = Semestrality {
            first: false,
            second: false,
        };
        assert!(none.is_offered_in(Term::First));
        assert!(none.is_offered_in(Term::Second));

        let first_only = Semestrality {
            first: true,
            second: false,
        };
        assert!(!first_only.is_offered_in(Term::Second));
    }
}
