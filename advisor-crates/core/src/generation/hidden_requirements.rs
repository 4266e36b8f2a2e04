//! Inference of courses that are not demanded by the curriculum but are required to take the
//! courses that are.
use itertools::Itertools;
use log::debug;
use log::warn;

use super::generator_options::GeneratorOptions;
use crate::catalog::CourseCatalog;
use crate::containers::HashSet;
use crate::plan::Plan;
use crate::plan::PseudoCourse;
use crate::requirements::evaluate_atom;
use crate::requirements::simplify_counting_passes;
use crate::requirements::try_as_dnf;
use crate::requirements::Expr;
use crate::requirements::ExprKind;
use crate::requirements::PlanContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InferenceOutcome {
    pub(crate) rounds: u64,
    pub(crate) inferred_courses: u64,
    pub(crate) simplifier_passes: u64,
    pub(crate) dnf_blowups: u64,
}

/// Adds to the front of `queue` the courses needed to take the courses in it.
///
/// The requirements of every queued class are reduced to their open part: course atoms already
/// in the plan or in the queue hold, courses that can no longer be taken fail, credit thresholds
/// are assumed to be reached eventually and student attributes are evaluated as they are. The
/// conjunction of the open parts is put in disjunctive normal form and its shortest clause names
/// the courses to add. This is repeated until nothing new is added, since the added courses can
/// have requirements of their own.
pub(crate) fn infer_hidden_requirements(
    queue: &mut Vec<PseudoCourse>,
    plan: &Plan,
    catalog: &CourseCatalog,
    options: &GeneratorOptions,
) -> InferenceOutcome {
    let context = PlanContext::new(catalog, plan);
    let mut outcome = InferenceOutcome::default();

    for _ in 0..options.max_inference_rounds {
        outcome.rounds += 1;
        let queued = queue
            .iter()
            .filter_map(PseudoCourse::as_concrete)
            .map(|concrete| catalog.canonical_code(&concrete.code).to_owned())
            .collect::<HashSet<_>>();

        let mut open = Vec::new();
        for class in queue.iter() {
            let Some(requirements) = catalog.requirements_of(class) else {
                continue;
            };
            let (reduced, passes) = simplify_counting_passes(
                &requirements.map_atoms(&mut |atom| open_atom(atom, &context, &queued)),
            );
            outcome.simplifier_passes += passes;
            // Classes whose requirements cannot hold are left for the placement to report.
            if reduced.as_const().is_none() {
                open.push(reduced);
            }
        }
        if open.is_empty() {
            break;
        }

        let (conjunction, passes) = simplify_counting_passes(&Expr::and(open));
        outcome.simplifier_passes += passes;
        let dnf = match try_as_dnf(&conjunction, options.max_dnf_clauses) {
            Ok(dnf) => dnf,
            Err(error) => {
                warn!("Skipping hidden requirement inference: {error}");
                outcome.dnf_blowups += 1;
                break;
            }
        };

        let shortest = dnf.as_operator().and_then(|clauses| {
            clauses
                .children
                .iter()
                .min_by_key(|clause| clause.atoms().count())
        });
        let Some(shortest) = shortest else {
            warn!("The requirements of the recommended courses cannot be fulfilled together");
            break;
        };

        let mut added: Vec<PseudoCourse> = Vec::new();
        for atom in shortest.atoms() {
            let Some(req) = atom.as_course_req() else {
                continue;
            };
            let code = catalog.canonical_code(&req.code);
            if !queued.contains(code) && added.iter().all(|class| class.code() != code) {
                added.push(PseudoCourse::concrete(code));
            }
        }
        if added.is_empty() {
            break;
        }

        debug!("Inferred hidden requirements: {}", added.iter().join(", "));
        outcome.inferred_courses += added.len() as u64;
        let _ = queue.splice(0..0, added);
    }

    outcome
}

/// Fixes every atom that does not depend on courses still to be added.
fn open_atom(atom: &Expr, context: &PlanContext<'_>, queued: &HashSet<String>) -> Expr {
    let catalog = context.catalog();
    match atom.kind() {
        ExprKind::ReqCourse(req) => {
            let code = catalog.canonical_code(&req.code);
            if context.is_in_plan(code) || queued.contains(code) {
                Expr::constant(true)
            } else if !catalog.is_reachable(code) {
                Expr::constant(false)
            } else {
                atom.clone()
            }
        }
        ExprKind::MinCredits(_) => Expr::constant(true),
        ExprKind::Const(_) => atom.clone(),
        _ => Expr::constant(evaluate_atom(atom, context, 0)),
    }
}
