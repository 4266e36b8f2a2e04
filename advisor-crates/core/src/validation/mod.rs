//! Plan validation: per-class, per-semester and curriculum checks producing diagnostics.
mod diagnostic;
mod validate;

pub use diagnostic::*;
pub use validate::*;
