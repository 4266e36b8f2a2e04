use super::course_info::CourseInfo;
use super::equivalence_info::EquivalenceInfo;
use crate::containers::HashMap;
use crate::plan::PseudoCourse;
use crate::requirements::Expr;

/// Renames are followed at most this many times, which also breaks accidental rename cycles.
const MAX_RENAME_CHAIN: usize = 8;

/// Read-only course and equivalence data shared by all validation and generation calls.
///
/// The catalog is an explicit handle: the host builds it once from its data source, shares it
/// (it is `Send + Sync`), and replaces it wholesale when the data changes.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: HashMap<String, CourseInfo>,
    equivalences: HashMap<String, EquivalenceInfo>,
}

impl CourseCatalog {
    pub fn new(
        courses: impl IntoIterator<Item = CourseInfo>,
        equivalences: impl IntoIterator<Item = EquivalenceInfo>,
    ) -> CourseCatalog {
        CourseCatalog {
            courses: courses
                .into_iter()
                .map(|course| (course.code.clone(), course))
                .collect(),
            equivalences: equivalences
                .into_iter()
                .map(|equivalence| (equivalence.code.clone(), equivalence))
                .collect(),
        }
    }

    pub fn course(&self, code: &str) -> Option<&CourseInfo> {
        self.courses.get(code)
    }

    pub fn equivalence(&self, code: &str) -> Option<&EquivalenceInfo> {
        self.equivalences.get(code)
    }

    pub fn courses(&self) -> impl Iterator<Item = &CourseInfo> {
        self.courses.values()
    }

    /// Follows course renames and returns the modern code of `code`.
    pub fn canonical_code<'a>(&'a self, code: &'a str) -> &'a str {
        let mut current = code;
        for _ in 0..MAX_RENAME_CHAIN {
            match self
                .course(current)
                .and_then(|course| course.canonical.as_deref())
            {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    /// Whether a course could still be taken in the future.
    pub fn is_reachable(&self, code: &str) -> bool {
        self.course(code).is_some_and(|course| course.is_available)
    }

    /// The credits a class is worth; `None` for unknown concrete courses.
    pub fn credits_of(&self, class: &PseudoCourse) -> Option<u32> {
        match class {
            PseudoCourse::Concrete(concrete) => {
                self.course(&concrete.code).map(|course| course.credits)
            }
            PseudoCourse::Equivalence(equivalence) => Some(equivalence.credits),
        }
    }

    /// The prerequisites of a class.
    ///
    /// An unresolved equivalence carries the requirements of its first member when the
    /// equivalence is homogeneous, and no requirements otherwise.
    pub fn requirements_of(&self, class: &PseudoCourse) -> Option<&Expr> {
        let code = match class {
            PseudoCourse::Concrete(concrete) => concrete.code.as_str(),
            PseudoCourse::Equivalence(equivalence) => {
                let info = self.equivalence(&equivalence.code)?;
                if !info.is_homogeneous {
                    return None;
                }
                info.courses.first()?.as_str()
            }
        };
        self.course(code).map(|course| &course.deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_are_followed_to_the_modern_code() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("OLD100", 10).with_canonical("MID100"),
                CourseInfo::new("MID100", 10).with_canonical("NEW100"),
                CourseInfo::new("NEW100", 10),
            ],
            [],
        );

        assert_eq!(catalog.canonical_code("OLD100"), "NEW100");
        assert_eq!(catalog.canonical_code("NEW100"), "NEW100");
        assert_eq!(catalog.canonical_code("UNKNOWN"), "UNKNOWN");
    }

    #[test]
    fn rename_cycles_terminate() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("A", 10).with_canonical("B"),
                CourseInfo::new("B", 10).with_canonical("A"),
            ],
            [],
        );

        let canonical = catalog.canonical_code("A");
        assert!(canonical == "A" || canonical == "B");
    }

    #[test]
    fn homogeneous_equivalences_inherit_requirements() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("FIS1", 10).with_deps(Expr::course("MAT1")),
                CourseInfo::new("MAT1", 10),
            ],
            [
                EquivalenceInfo::new("HOMO", true, ["FIS1"]),
                EquivalenceInfo::new("HETERO", false, ["FIS1"]),
            ],
        );

        assert_eq!(
            catalog.requirements_of(&PseudoCourse::equivalence("HOMO", 10)),
            Some(&Expr::course("MAT1"))
        );
        assert_eq!(
            catalog.requirements_of(&PseudoCourse::equivalence("HETERO", 10)),
            None
        );
    }

    #[test]
    fn unavailable_and_unknown_courses_are_unreachable() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("A", 10),
                CourseInfo::new("B", 10).unavailable(),
            ],
            [],
        );

        assert!(catalog.is_reachable("A"));
        assert!(!catalog.is_reachable("B"));
        assert!(!catalog.is_reachable("C"));
    }
}
