use serde::Deserialize;
use serde::Serialize;

/// A named group of interchangeable courses, e.g. "any humanities elective".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceInfo {
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Homogeneous equivalences group courses that are alternatives of each other (e.g. the same
    /// course taught by different faculties), so picking a concrete member is not a real choice.
    #[serde(default)]
    pub is_homogeneous: bool,
    pub courses: Vec<String>,
}

impl EquivalenceInfo {
    pub fn new(
        code: impl Into<String>,
        is_homogeneous: bool,
        courses: impl IntoIterator<Item = impl Into<String>>,
    ) -> EquivalenceInfo {
        EquivalenceInfo {
            code: code.into(),
            name: String::new(),
            is_homogeneous,
            courses: courses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|member| member == code)
    }
}
