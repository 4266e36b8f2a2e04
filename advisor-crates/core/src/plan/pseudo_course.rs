use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// A class in a plan: either a concrete course or a still-unresolved equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PseudoCourse {
    Concrete(ConcreteId),
    Equivalence(EquivalenceId),
}

/// A concrete course, optionally remembering the equivalence it was chosen for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcreteId {
    pub code: String,
    #[serde(default)]
    pub equivalence: Option<EquivalenceId>,
}

/// An equivalence slot worth `credits` credits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquivalenceId {
    pub code: String,
    pub credits: u32,
}

impl PseudoCourse {
    pub fn concrete(code: impl Into<String>) -> PseudoCourse {
        PseudoCourse::Concrete(ConcreteId {
            code: code.into(),
            equivalence: None,
        })
    }

    pub fn equivalence(code: impl Into<String>, credits: u32) -> PseudoCourse {
        PseudoCourse::Equivalence(EquivalenceId {
            code: code.into(),
            credits,
        })
    }

    /// The course code of a concrete course, or the equivalence code otherwise.
    pub fn code(&self) -> &str {
        match self {
            PseudoCourse::Concrete(concrete) => &concrete.code,
            PseudoCourse::Equivalence(equivalence) => &equivalence.code,
        }
    }

    /// The code of the equivalence this class stands for or was chosen for, if any.
    pub fn equivalence_code(&self) -> Option<&str> {
        match self {
            PseudoCourse::Concrete(concrete) => concrete
                .equivalence
                .as_ref()
                .map(|equivalence| equivalence.code.as_str()),
            PseudoCourse::Equivalence(equivalence) => Some(&equivalence.code),
        }
    }

    pub fn as_concrete(&self) -> Option<&ConcreteId> {
        match self {
            PseudoCourse::Concrete(concrete) => Some(concrete),
            PseudoCourse::Equivalence(_) => None,
        }
    }
}

impl Display for PseudoCourse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PseudoCourse::Concrete(concrete) => write!(f, "{}", concrete.code),
            PseudoCourse::Equivalence(equivalence) => write!(f, "{}?", equivalence.code),
        }
    }
}
