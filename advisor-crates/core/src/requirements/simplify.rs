//! Fixed-point simplification of requirement expressions.
//!
//! Every rule is a pure function over a single operator node which returns its input (the very
//! same node) when it does not apply. [`simplify`] keeps running the rules until a whole pass
//! leaves the top node untouched, which makes identity a cheap and exact fixed-point test.
use super::expression::Expr;
use super::expression::Operator;
use crate::containers::HashMap;
use crate::containers::HashSet;

/// Simplifies `expr` until no rule applies anymore.
///
/// The result is logically equivalent to `expr`, and `simplify(&simplify(e))` returns its input
/// unchanged.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_counting_passes(expr).0
}

/// [`simplify`], also returning the number of rewrite passes that were run.
pub(crate) fn simplify_counting_passes(expr: &Expr) -> (Expr, u64) {
    let mut current = expr.clone();
    let mut passes = 0;
    loop {
        passes += 1;
        let next = simplify_pass(&current);
        if next.same_node(&current) {
            return (current, passes);
        }
        current = next;
    }
}

fn simplify_pass(expr: &Expr) -> Expr {
    let expr = assoc(expr);
    let expr = simplify_children(&expr);
    let expr = anihil(&expr);
    let expr = ident(&expr);
    let expr = idem(&expr);
    let expr = absorp(&expr);
    let expr = degen(&expr);
    factor(&expr)
}

/// Applies `rule` to operator nodes; atoms are returned as they are.
fn on_operator(expr: &Expr, rule: impl FnOnce(&Operator) -> Option<Expr>) -> Expr {
    expr.as_operator()
        .and_then(rule)
        .unwrap_or_else(|| expr.clone())
}

/// `a & (b & c) = a & b & c`
fn assoc(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let is_nested = |child: &Expr| {
            child
                .as_operator()
                .is_some_and(|inner| inner.neutral == operator.neutral)
        };
        if !operator.children.iter().any(is_nested) {
            return None;
        }

        let mut children = Vec::with_capacity(operator.children.len());
        for child in &operator.children {
            match child.as_operator() {
                Some(inner) if inner.neutral == operator.neutral => {
                    children.extend(inner.children.iter().cloned())
                }
                _ => children.push(child.clone()),
            }
        }
        Some(Expr::create_op(operator.neutral, children))
    })
}

fn simplify_children(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let children = operator.children.iter().map(simplify).collect::<Vec<_>>();
        if children
            .iter()
            .zip(&operator.children)
            .all(|(new, old)| new.same_node(old))
        {
            None
        } else {
            Some(Expr::create_op(operator.neutral, children))
        }
    })
}

/// `a & false = false`
fn anihil(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        operator
            .children
            .iter()
            .any(|child| child.as_const() == Some(!operator.neutral))
            .then(|| Expr::constant(!operator.neutral))
    })
}

/// `a & true = a`
fn ident(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let is_identity = |child: &Expr| child.as_const() == Some(operator.neutral);
        if !operator.children.iter().any(is_identity) {
            return None;
        }
        let children = operator
            .children
            .iter()
            .filter(|child| !is_identity(child))
            .cloned()
            .collect();
        Some(Expr::create_op(operator.neutral, children))
    })
}

/// `a & a = a`
fn idem(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let mut seen: HashSet<&Expr> = HashSet::default();
        let children = operator
            .children
            .iter()
            .filter(|child| seen.insert(*child))
            .cloned()
            .collect::<Vec<_>>();
        (children.len() != operator.children.len())
            .then(|| Expr::create_op(operator.neutral, children))
    })
}

/// `a & (a | b) = a`
fn absorp(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let siblings: HashSet<&Expr> = operator.children.iter().collect();
        let is_absorbed = |child: &Expr| {
            child.as_operator().is_some_and(|inner| {
                inner.neutral != operator.neutral
                    && inner
                        .children
                        .iter()
                        .any(|grandchild| siblings.contains(grandchild))
            })
        };
        if !operator.children.iter().any(is_absorbed) {
            return None;
        }
        let children = operator
            .children
            .iter()
            .filter(|child| !is_absorbed(child))
            .cloned()
            .collect();
        Some(Expr::create_op(operator.neutral, children))
    })
}

/// `and() = true`, `and(a) = a`
fn degen(expr: &Expr) -> Expr {
    on_operator(expr, |operator| match operator.children.as_slice() {
        [] => Some(Expr::constant(operator.neutral)),
        [single] => Some(single.clone()),
        _ => None,
    })
}

/// `(a & b) | (a & c) = a & (b | c)`
///
/// Factors out the grandchild shared by the most opposite-polarity children. Ties go to the
/// grandchild that is encountered first, so the result only depends on the input order.
fn factor(expr: &Expr) -> Expr {
    on_operator(expr, |operator| {
        let neutral = operator.neutral;
        let is_candidate = |child: &Expr| {
            child
                .as_operator()
                .is_some_and(|inner| inner.neutral != neutral)
        };

        // grandchild -> (number of children containing it, first appearance)
        let mut occurrences: HashMap<&Expr, (usize, usize)> = HashMap::default();
        for child in operator.children.iter().filter(|child| is_candidate(child)) {
            let inner = child.as_operator()?;
            let mut within_child: HashSet<&Expr> = HashSet::default();
            for grandchild in &inner.children {
                if within_child.insert(grandchild) {
                    let next_position = occurrences.len();
                    let entry = occurrences.entry(grandchild).or_insert((0, next_position));
                    entry.0 += 1;
                }
            }
        }

        let (common, _) = occurrences
            .into_iter()
            .filter(|(_, (count, _))| *count > 1)
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            })?;
        let common = common.clone();

        let contains_common = |child: &Expr| {
            is_candidate(child)
                && child
                    .as_operator()
                    .is_some_and(|inner| inner.children.contains(&common))
        };

        let remainders = operator
            .children
            .iter()
            .filter(|child| contains_common(child))
            .filter_map(|child| child.as_operator())
            .map(|inner| {
                let rest = inner
                    .children
                    .iter()
                    .filter(|grandchild| **grandchild != common)
                    .cloned()
                    .collect();
                Expr::create_op(!neutral, rest)
            })
            .collect::<Vec<_>>();
        let factored = Expr::create_op(
            !neutral,
            vec![common.clone(), Expr::create_op(neutral, remainders)],
        );

        let mut children = Vec::with_capacity(operator.children.len());
        let mut factored = Some(factored);
        for child in &operator.children {
            if contains_common(child) {
                if let Some(factored) = factored.take() {
                    children.push(factored);
                }
            } else {
                children.push(child.clone());
            }
        }
        Some(Expr::create_op(neutral, children))
    })
}
