//! # Advisor core
//! The engines behind course planning: a requirement-expression algebra for course
//! prerequisites, a curriculum solver assigning the classes of a plan to curriculum blocks with a
//! min-cost maximum flow, plan validation and plan generation.
//!
//! All operations are synchronous and work on data private to one call; a [`CourseCatalog`] and
//! a [`Curriculum`] can be shared freely between concurrent validations.
//!
//! # Example
//! ```rust
//! # use advisor_core::catalog::CourseCatalog;
//! # use advisor_core::catalog::CourseInfo;
//! # use advisor_core::curriculum::Combination;
//! # use advisor_core::curriculum::CurriculumBuilder;
//! # use advisor_core::curriculum::Leaf;
//! # use advisor_core::plan::CurriculumSpec;
//! # use advisor_core::plan::Plan;
//! # use advisor_core::plan::PseudoCourse;
//! # use advisor_core::requirements::Expr;
//! # use advisor_core::validation::validate_plan;
//! # use advisor_core::validation::ValidationOptions;
//! let catalog = CourseCatalog::new(
//!     [
//!         CourseInfo::new("CALC1", 10),
//!         CourseInfo::new("CALC2", 10).with_deps(Expr::course("CALC1")),
//!     ],
//!     [],
//! );
//!
//! let mut builder = CurriculumBuilder::default();
//! let calculus = builder.add_leaf(Leaf::new("calculus", 20, ["CALC1", "CALC2"]));
//! let root = builder.add_combination(Combination::new("root", None, vec![calculus]));
//! builder.set_root(root);
//! let curriculum = builder.build(&catalog).expect("the curriculum is well formed");
//!
//! let mut plan = Plan::new(CurriculumSpec::default());
//! plan.classes = vec![
//!     vec![PseudoCourse::concrete("CALC1")],
//!     vec![PseudoCourse::concrete("CALC2")],
//! ];
//!
//! let result = validate_plan(
//!     &plan,
//!     &catalog,
//!     &curriculum,
//!     None,
//!     ValidationOptions::default(),
//! );
//! assert!(!result.has_errors());
//! ```
#[cfg(doc)]
use crate::catalog::CourseCatalog;
#[cfg(doc)]
use crate::curriculum::Curriculum;

#[doc(hidden)]
pub mod advisor_asserts;
pub mod catalog;
pub mod containers;
pub mod curriculum;
pub mod flow;
pub mod generation;
pub mod plan;
pub mod requirements;
pub mod solver;
pub mod statistics;
pub mod validation;

pub use convert_case;

pub use generation::generate_recommended_plan;
pub use generation::PlanGenerator;
pub use validation::validate_plan;
pub use validation::PlanValidator;
