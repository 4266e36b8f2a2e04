//! # Course advisor
//! Validates study plans against course prerequisites and curricula, and recommends plans which
//! fulfil a curriculum.
//!
//! This crate re-exports the engines of `advisor-core`; the `course-advisor` binary wraps them in
//! a command line interface reading JSON files.
pub use advisor_core::*;
