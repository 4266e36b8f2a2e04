//! Conversion of requirement expressions into disjunctive normal form.
use thiserror::Error;

use super::expression::Expr;
use super::expression::ExprKind;
use crate::containers::HashSet;

/// Returned by [`try_as_dnf`] when the expansion grows past the configured number of clauses.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the disjunctive normal form exceeds {max_clauses} clauses")]
pub struct DnfTooLarge {
    pub max_clauses: usize,
}

/// A conjunction of atoms, deduplicated by structural hash.
#[derive(Debug, Clone)]
struct Clause {
    atoms: Vec<Expr>,
    set: HashSet<Expr>,
}

impl Clause {
    fn empty() -> Clause {
        Clause {
            atoms: Vec::new(),
            set: HashSet::default(),
        }
    }

    fn unit(atom: &Expr) -> Clause {
        let mut clause = Clause::empty();
        clause.push(atom);
        clause
    }

    fn push(&mut self, atom: &Expr) {
        if self.set.insert(atom.clone()) {
            self.atoms.push(atom.clone());
        }
    }

    fn merged(&self, other: &Clause) -> Clause {
        let mut merged = self.clone();
        for atom in &other.atoms {
            merged.push(atom);
        }
        merged
    }

    fn is_subset_of(&self, other: &Clause) -> bool {
        self.set.is_subset(&other.set)
    }
}

/// Converts `expr` into an `Or` of `And` clauses.
///
/// The result is logically equivalent to `expr` and no clause is a superset of another clause.
/// An unsatisfiable expression yields `Or()`, a tautology yields `Or(And())`.
pub fn as_dnf(expr: &Expr) -> Expr {
    match dnf_clauses(expr, usize::MAX) {
        Ok(clauses) => clauses_to_expr(clauses),
        Err(_) => unreachable!("an unbounded conversion never exceeds its bound"),
    }
}

/// Like [`as_dnf`], but gives up once an intermediate clause list grows past `max_clauses`.
pub fn try_as_dnf(expr: &Expr, max_clauses: usize) -> Result<Expr, DnfTooLarge> {
    dnf_clauses(expr, max_clauses).map(clauses_to_expr)
}

fn clauses_to_expr(clauses: Vec<Clause>) -> Expr {
    Expr::or(
        clauses
            .into_iter()
            .map(|clause| Expr::and(clause.atoms))
            .collect(),
    )
}

fn dnf_clauses(expr: &Expr, max_clauses: usize) -> Result<Vec<Clause>, DnfTooLarge> {
    match expr.kind() {
        ExprKind::Const(true) => Ok(vec![Clause::empty()]),
        ExprKind::Const(false) => Ok(vec![]),
        ExprKind::Operator(operator) if !operator.neutral => {
            let mut clauses = Vec::new();
            for child in &operator.children {
                clauses.extend(dnf_clauses(child, max_clauses)?);
                check_size(clauses.len(), max_clauses)?;
            }
            Ok(minimise(clauses))
        }
        ExprKind::Operator(operator) => {
            let mut factors = Vec::with_capacity(operator.children.len());
            for child in &operator.children {
                let clauses = dnf_clauses(child, max_clauses)?;
                if clauses.is_empty() {
                    return Ok(vec![]);
                }
                factors.push(clauses);
            }

            let mut product = vec![Clause::empty()];
            for factor in factors {
                check_size(product.len().saturating_mul(factor.len()), max_clauses)?;
                let expanded = product
                    .iter()
                    .flat_map(|left| factor.iter().map(move |right| left.merged(right)))
                    .collect();
                product = minimise(expanded);
            }
            Ok(product)
        }
        _ => Ok(vec![Clause::unit(expr)]),
    }
}

fn check_size(size: usize, max_clauses: usize) -> Result<(), DnfTooLarge> {
    if size > max_clauses {
        Err(DnfTooLarge { max_clauses })
    } else {
        Ok(())
    }
}

/// Removes clauses that repeat or are a superset of another clause, keeping the first occurrence.
fn minimise(clauses: Vec<Clause>) -> Vec<Clause> {
    let mut kept: Vec<Clause> = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if kept.iter().any(|existing| existing.is_subset_of(&clause)) {
            continue;
        }
        kept.retain(|existing| !clause.is_subset_of(existing));
        kept.push(clause);
    }
    kept
}
