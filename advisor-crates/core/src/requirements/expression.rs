use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use fnv::FnvHasher;
use serde::Deserialize;
use serde::Serialize;

use super::raw_expr::RawExpr;

/// An immutable requirement expression.
///
/// An [`Expr`] is either an operator (a conjunction or a disjunction of child expressions) or an
/// atom (see [`ExprKind`]). Nodes are shared through an [`Arc`], so cloning an expression is
/// cheap and rewriting a tree only allocates the nodes that actually change. The structural hash
/// of a node is computed once, when it is constructed, which makes equality checks between
/// unrelated trees cheap in the common case.
///
/// Operators are identified by their *neutral* element: a conjunction has neutral `true` and a
/// disjunction has neutral `false`. Most rewriting code is written once in terms of the neutral
/// element, and works for both polarities.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "RawExpr", into = "RawExpr")]
pub struct Expr(Arc<Node>);

struct Node {
    kind: ExprKind,
    hash: u64,
}

/// The closed set of node kinds of a requirement expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// `And` when `neutral` is `true`, `Or` when `neutral` is `false`.
    Operator(Operator),
    Const(bool),
    /// Satisfied when the credits approved before the current semester reach the bound.
    MinCredits(u32),
    ReqLevel(AttributeReq),
    ReqSchool(AttributeReq),
    ReqProgram(AttributeReq),
    ReqCareer(AttributeReq),
    ReqCourse(CourseReq),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub neutral: bool,
    pub children: Vec<Expr>,
}

/// A restriction on a student attribute; `equal == false` negates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeReq {
    pub value: String,
    pub equal: bool,
}

/// Requires a course to be taken before the current semester, or, when `coreq` is set, no later
/// than the current semester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseReq {
    pub code: String,
    pub coreq: bool,
}

impl Expr {
    fn from_kind(kind: ExprKind) -> Expr {
        let hash = structural_hash(&kind);
        Expr(Arc::new(Node { kind, hash }))
    }

    /// Creates an `And` node when `neutral` is `true` and an `Or` node otherwise.
    pub fn create_op(neutral: bool, children: Vec<Expr>) -> Expr {
        Expr::from_kind(ExprKind::Operator(Operator { neutral, children }))
    }

    pub fn and(children: Vec<Expr>) -> Expr {
        Expr::create_op(true, children)
    }

    pub fn or(children: Vec<Expr>) -> Expr {
        Expr::create_op(false, children)
    }

    pub fn constant(value: bool) -> Expr {
        Expr::from_kind(ExprKind::Const(value))
    }

    pub fn min_credits(credits: u32) -> Expr {
        Expr::from_kind(ExprKind::MinCredits(credits))
    }

    pub fn level(level: impl Into<String>, equal: bool) -> Expr {
        Expr::from_kind(ExprKind::ReqLevel(AttributeReq {
            value: level.into(),
            equal,
        }))
    }

    pub fn school(school: impl Into<String>, equal: bool) -> Expr {
        Expr::from_kind(ExprKind::ReqSchool(AttributeReq {
            value: school.into(),
            equal,
        }))
    }

    pub fn program(program: impl Into<String>, equal: bool) -> Expr {
        Expr::from_kind(ExprKind::ReqProgram(AttributeReq {
            value: program.into(),
            equal,
        }))
    }

    pub fn career(career: impl Into<String>, equal: bool) -> Expr {
        Expr::from_kind(ExprKind::ReqCareer(AttributeReq {
            value: career.into(),
            equal,
        }))
    }

    /// A regular prerequisite on `code`.
    pub fn course(code: impl Into<String>) -> Expr {
        Expr::course_req(code, false)
    }

    /// A corequisite on `code`.
    pub fn coreq(code: impl Into<String>) -> Expr {
        Expr::course_req(code, true)
    }

    pub fn course_req(code: impl Into<String>, coreq: bool) -> Expr {
        Expr::from_kind(ExprKind::ReqCourse(CourseReq {
            code: code.into(),
            coreq,
        }))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// The memoized structural hash of this node.
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// Whether both handles point to the very same node, as opposed to structurally equal nodes.
    pub fn same_node(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self.kind() {
            ExprKind::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<bool> {
        match self.kind() {
            ExprKind::Const(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_course_req(&self) -> Option<&CourseReq> {
        match self.kind() {
            ExprKind::ReqCourse(course) => Some(course),
            _ => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        self.as_operator().is_none()
    }

    /// Whether this atom restricts the school, program or career of the student.
    pub fn is_enrollment_restriction(&self) -> bool {
        matches!(
            self.kind(),
            ExprKind::ReqSchool(_) | ExprKind::ReqProgram(_) | ExprKind::ReqCareer(_)
        )
    }

    /// Rebuilds the tree with every atom replaced by `map(atom)`.
    ///
    /// Subtrees in which no atom changes identity are shared with `self`, so `map_atoms` with a
    /// function returning its input returns `self` (by identity).
    pub fn map_atoms(&self, map: &mut impl FnMut(&Expr) -> Expr) -> Expr {
        match self.kind() {
            ExprKind::Operator(operator) => {
                let children = operator
                    .children
                    .iter()
                    .map(|child| child.map_atoms(map))
                    .collect::<Vec<_>>();
                if children
                    .iter()
                    .zip(&operator.children)
                    .all(|(new, old)| new.same_node(old))
                {
                    self.clone()
                } else {
                    Expr::create_op(operator.neutral, children)
                }
            }
            _ => map(self),
        }
    }

    /// Iterates over the atoms of the tree, depth first, left to right.
    pub fn atoms(&self) -> Atoms<'_> {
        Atoms { stack: vec![self] }
    }
}

/// Iterator over the atoms of an [`Expr`], see [`Expr::atoms`].
#[derive(Debug)]
pub struct Atoms<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for Atoms<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(expr) = self.stack.pop() {
            match expr.kind() {
                ExprKind::Operator(operator) => self.stack.extend(operator.children.iter().rev()),
                _ => return Some(expr),
            }
        }
        None
    }
}

fn structural_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FnvHasher::default();
    match kind {
        ExprKind::Operator(operator) => {
            0_u8.hash(&mut hasher);
            operator.neutral.hash(&mut hasher);
            for child in &operator.children {
                hasher.write_u64(child.structural_hash());
            }
        }
        ExprKind::Const(value) => {
            1_u8.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        ExprKind::MinCredits(credits) => {
            2_u8.hash(&mut hasher);
            credits.hash(&mut hasher);
        }
        ExprKind::ReqLevel(req) => hash_attribute(3, req, &mut hasher),
        ExprKind::ReqSchool(req) => hash_attribute(4, req, &mut hasher),
        ExprKind::ReqProgram(req) => hash_attribute(5, req, &mut hasher),
        ExprKind::ReqCareer(req) => hash_attribute(6, req, &mut hasher),
        ExprKind::ReqCourse(req) => {
            7_u8.hash(&mut hasher);
            req.code.hash(&mut hasher);
            req.coreq.hash(&mut hasher);
        }
    }
    hasher.finish()
}

fn hash_attribute(tag: u8, req: &AttributeReq, hasher: &mut FnvHasher) {
    tag.hash(hasher);
    req.value.hash(hasher);
    req.equal.hash(hasher);
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other) || (self.0.hash == other.0.hash && self.0.kind == other.0.kind)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0.kind, f)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            ExprKind::Operator(operator) => {
                if operator.children.is_empty() {
                    return write!(f, "{}()", if operator.neutral { "and" } else { "or" });
                }
                let separator = if operator.neutral { " & " } else { " | " };
                for (index, child) in operator.children.iter().enumerate() {
                    if index > 0 {
                        write!(f, "{separator}")?;
                    }
                    if child.as_operator().is_some() {
                        write!(f, "({child})")?;
                    } else {
                        write!(f, "{child}")?;
                    }
                }
                Ok(())
            }
            ExprKind::Const(value) => write!(f, "{value}"),
            ExprKind::MinCredits(credits) => write!(f, "credits >= {credits}"),
            ExprKind::ReqLevel(req) => write_attribute(f, "level", req),
            ExprKind::ReqSchool(req) => write_attribute(f, "school", req),
            ExprKind::ReqProgram(req) => write_attribute(f, "program", req),
            ExprKind::ReqCareer(req) => write_attribute(f, "career", req),
            ExprKind::ReqCourse(req) if req.coreq => write!(f, "{}(c)", req.code),
            ExprKind::ReqCourse(req) => write!(f, "{}", req.code),
        }
    }
}

fn write_attribute(f: &mut Formatter<'_>, name: &str, req: &AttributeReq) -> std::fmt::Result {
    let relation = if req.equal { "=" } else { "!=" };
    write!(f, "{name} {relation} {}", req.value)
}
