use thiserror::Error;

/// Errors in curriculum data, detected when the curriculum is built.
///
/// These indicate broken configuration rather than a problem with a particular plan, so they are
/// raised once, up front, instead of being reported as plan diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurriculumError {
    #[error("the curriculum has no root block")]
    MissingRoot,
    #[error("the root block '{0}' must be a combination")]
    RootIsLeaf(String),
    #[error("block '{parent}' references block #{child} which does not exist")]
    DanglingBlock { parent: String, child: usize },
    #[error("block '{0}' appears more than once in the curriculum tree")]
    SharedBlock(String),
    #[error("block '{0}' is not reachable from the root")]
    UnreachableBlock(String),
    #[error("leaf '{0}' accepts no course")]
    EmptyLeaf(String),
    #[error("block '{block}' has invalid capacity {cap}")]
    InvalidCapacity { block: String, cap: i64 },
    #[error("block '{block}' references unknown course or equivalence '{code}'")]
    DanglingCourse { block: String, code: String },
    #[error("the multiplicity of '{0}' has an empty group")]
    EmptyMultiplicityGroup(String),
    #[error("the multiplicity of '{code}' disagrees on the bound of group '{group}'")]
    ConflictingMultiplicity { code: String, group: String },
    #[error("the filler for '{code}' recommends unknown course '{course}'")]
    UnknownFillerCourse { code: String, course: String },
    #[error("equivalence '{0}' has no member courses")]
    EmptyEquivalence(String),
}
