use serde::Deserialize;
use serde::Serialize;

/// Bounds how many credits a course, or a group of interchangeable courses, may contribute to a
/// curriculum as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    /// The codes that share the bound. A course configured without itself in the group is still
    /// bound by it, together with the members of the group.
    pub group: Vec<String>,
    /// The credit bound, `None` for no bound at all.
    pub credits: Option<u32>,
}

impl Multiplicity {
    pub fn new(
        group: impl IntoIterator<Item = impl Into<String>>,
        credits: Option<u32>,
    ) -> Multiplicity {
        Multiplicity {
            group: group.into_iter().map(Into::into).collect(),
            credits,
        }
    }

    /// The key shared by every course configured with this group, independent of the order of
    /// the group and of the course itself.
    pub(crate) fn group_key(&self) -> String {
        self.group.iter().min().cloned().unwrap_or_default()
    }
}

/// The effective multiplicity of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MultiplicityClass {
    /// Classes with the same key share the credit bound; `None` bounds the class on its own.
    pub(crate) key: Option<String>,
    pub(crate) credits: Option<u32>,
}
