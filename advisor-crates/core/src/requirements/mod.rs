//! The requirement-expression algebra: construction, evaluation, simplification, normal forms
//! and diagnosis of prerequisites.
mod diagnose;
mod dnf;
mod evaluate;
mod expression;
mod raw_expr;
mod simplify;

pub use diagnose::*;
pub use dnf::*;
pub use evaluate::*;
pub use expression::*;
pub use simplify::*;
