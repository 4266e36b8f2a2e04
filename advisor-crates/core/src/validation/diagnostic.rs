use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::Term;
use crate::plan::PseudoCourse;
use crate::requirements::Expr;

/// What a [`Diagnostic`] is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticTarget {
    /// A single class of the plan.
    Course {
        semester: usize,
        index: usize,
        code: String,
    },
    Semester {
        semester: usize,
    },
    /// A curriculum block, by code.
    Curriculum {
        block: String,
    },
    /// The plan as a whole.
    Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Structured details of a [`Diagnostic`], for hosts that render their own messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticPayload {
    UnknownCourse,
    UnavailableCourse,
    AmbiguousEquivalence {
        equivalence: String,
        options: Vec<String>,
    },
    WrongTerm {
        term: Term,
    },
    UnmetRequirements {
        missing: Expr,
        modernized: Expr,
    },
    CreditOverload {
        credits: u32,
        max_credits: u32,
    },
    UnmetBlock {
        superblock: String,
        missing_credits: u32,
        recommended: Vec<PseudoCourse>,
    },
    UnassignedCourses {
        codes: Vec<String>,
        credits: u32,
    },
}

/// One problem found in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub target: DiagnosticTarget,
    pub severity: Severity,
    pub message: String,
    pub payload: DiagnosticPayload,
}

impl Diagnostic {
    pub fn error(
        target: DiagnosticTarget,
        message: impl Into<String>,
        payload: DiagnosticPayload,
    ) -> Diagnostic {
        Diagnostic {
            target,
            severity: Severity::Error,
            message: message.into(),
            payload,
        }
    }

    pub fn warning(
        target: DiagnosticTarget,
        message: impl Into<String>,
        payload: DiagnosticPayload,
    ) -> Diagnostic {
        Diagnostic {
            target,
            severity: Severity::Warning,
            message: message.into(),
            payload,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{severity}: {}", self.message)
    }
}

/// Everything validation found out about a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    /// The superblock each class counts towards, indexed like `Plan::classes`.
    pub course_superblocks: Vec<Vec<Option<String>>>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(|diagnostic| !diagnostic.is_error())
    }
}
