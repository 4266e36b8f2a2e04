use super::evaluate::evaluate;
use super::evaluate::evaluate_atom;
use super::evaluate::PlanContext;
use super::expression::Expr;
use super::expression::ExprKind;
use super::simplify::simplify;

/// Explains why a requirement is not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequirements {
    /// The requirements that remain to be fulfilled, over the codes used in the course data.
    pub missing: Expr,
    /// The same requirements with every course replaced by its modern equivalent.
    pub modernized: Expr,
}

/// Computes what is missing for `expr` to hold for a class taken in `semester`, or `None` if it
/// already holds.
///
/// Atoms are fixed to their current truth value in stages, from the largest to the smallest set
/// of fixed atoms, and the first stage that leaves something to do is reported:
/// 1. satisfied atoms, enrollment restrictions (school, program, career) and requirements on
///    courses that can no longer be taken;
/// 2. satisfied atoms and enrollment restrictions;
/// 3. satisfied atoms only.
pub fn diagnose(
    expr: &Expr,
    context: &PlanContext<'_>,
    semester: usize,
) -> Option<MissingRequirements> {
    if evaluate(expr, context, semester) {
        return None;
    }
    let catalog = context.catalog();

    let is_unreachable_course = |atom: &Expr| {
        atom.as_course_req()
            .is_some_and(|req| !catalog.is_reachable(&req.code))
    };

    let stages: [&dyn Fn(&Expr) -> bool; 3] = [
        &|atom: &Expr| atom.is_enrollment_restriction() || is_unreachable_course(atom),
        &|atom: &Expr| atom.is_enrollment_restriction(),
        &|_: &Expr| false,
    ];

    let mut missing = None;
    for fix_unsatisfied in stages {
        let relaxed = simplify(&expr.map_atoms(&mut |atom| {
            let satisfied = evaluate_atom(atom, context, semester);
            if satisfied || fix_unsatisfied(atom) {
                Expr::constant(satisfied)
            } else {
                atom.clone()
            }
        }));
        let is_constant = relaxed.as_const().is_some();
        missing = Some(relaxed);
        if !is_constant {
            break;
        }
    }
    let missing = missing?;

    let modernized = simplify(&missing.map_atoms(&mut |atom| match atom.kind() {
        ExprKind::ReqCourse(req) => {
            let canonical = catalog.canonical_code(&req.code);
            if canonical == req.code {
                atom.clone()
            } else {
                Expr::course_req(canonical, req.coreq)
            }
        }
        _ => atom.clone(),
    }));

    Some(MissingRequirements {
        missing,
        modernized,
    })
}
