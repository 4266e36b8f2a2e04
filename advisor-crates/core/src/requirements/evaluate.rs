use super::expression::AttributeReq;
use super::expression::Expr;
use super::expression::ExprKind;
use crate::catalog::CourseCatalog;
use crate::containers::HashMap;
use crate::plan::Plan;
use crate::plan::PseudoCourse;

/// The position of a class within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassPosition {
    pub semester: usize,
    pub index: usize,
}

/// Everything needed to evaluate requirements against one plan.
///
/// The context records where each course is first taken (keyed by its canonical code, so that
/// renamed courses satisfy requirements on either code) and how many credits have been approved
/// before each semester.
#[derive(Debug, Clone)]
pub struct PlanContext<'a> {
    catalog: &'a CourseCatalog,
    first_occurrence: HashMap<String, ClassPosition>,
    /// `approved_credits[s]` is the number of credits taken in semesters `0..s`.
    approved_credits: Vec<u32>,
    level: Option<String>,
    school: Option<String>,
    program: Option<String>,
    career: Option<String>,
}

impl<'a> PlanContext<'a> {
    pub fn new(catalog: &'a CourseCatalog, plan: &Plan) -> PlanContext<'a> {
        let mut context = PlanContext {
            catalog,
            first_occurrence: HashMap::default(),
            approved_credits: vec![0; plan.classes.len() + 1],
            level: plan.level.clone(),
            school: plan.school.clone(),
            program: plan.program.clone(),
            career: plan.career.clone(),
        };
        for (semester, index, class) in plan.iter_classes() {
            context.record(class, ClassPosition { semester, index });
        }
        context
    }

    pub fn catalog(&self) -> &'a CourseCatalog {
        self.catalog
    }

    /// Registers `class` as taken at `position`.
    ///
    /// Only the first occurrence of a course is remembered; credits are counted for every
    /// occurrence.
    pub fn record(&mut self, class: &PseudoCourse, position: ClassPosition) {
        if let PseudoCourse::Concrete(concrete) = class {
            let canonical = self.catalog.canonical_code(&concrete.code).to_owned();
            let _ = self.first_occurrence.entry(canonical).or_insert(position);
        }

        let credits = self.catalog.credits_of(class).unwrap_or(0);
        if self.approved_credits.len() < position.semester + 2 {
            let last = self.approved_credits.last().copied().unwrap_or(0);
            self.approved_credits.resize(position.semester + 2, last);
        }
        for approved in &mut self.approved_credits[position.semester + 1..] {
            *approved += credits;
        }
    }

    /// The credits approved in the semesters before `semester`.
    pub fn approved_credits_before(&self, semester: usize) -> u32 {
        let index = semester.min(self.approved_credits.len() - 1);
        self.approved_credits[index]
    }

    /// Where `code`, or any course renamed to the same modern code, is first taken.
    pub fn first_occurrence(&self, code: &str) -> Option<ClassPosition> {
        self.first_occurrence
            .get(self.catalog.canonical_code(code))
            .copied()
    }

    /// Whether `code` counts as taken for a class in `semester`.
    pub fn is_taken_for(&self, code: &str, semester: usize, coreq: bool) -> bool {
        self.first_occurrence(code).is_some_and(|position| {
            if coreq {
                position.semester <= semester
            } else {
                position.semester < semester
            }
        })
    }

    /// Whether `code` appears anywhere in the plan.
    pub fn is_in_plan(&self, code: &str) -> bool {
        self.first_occurrence(code).is_some()
    }
}

/// Evaluates `expr` for a class taken in `semester`.
pub fn evaluate(expr: &Expr, context: &PlanContext<'_>, semester: usize) -> bool {
    evaluate_with(expr, &mut |atom| evaluate_atom(atom, context, semester))
}

/// Evaluates the operators of `expr`, asking `atom_value` for the truth of every atom.
pub fn evaluate_with(expr: &Expr, atom_value: &mut impl FnMut(&Expr) -> bool) -> bool {
    match expr.kind() {
        ExprKind::Operator(operator) if operator.neutral => operator
            .children
            .iter()
            .all(|child| evaluate_with(child, atom_value)),
        ExprKind::Operator(operator) => operator
            .children
            .iter()
            .any(|child| evaluate_with(child, atom_value)),
        _ => atom_value(expr),
    }
}

/// Evaluates a single atom for a class taken in `semester`.
pub fn evaluate_atom(atom: &Expr, context: &PlanContext<'_>, semester: usize) -> bool {
    match atom.kind() {
        ExprKind::Operator(_) => evaluate(atom, context, semester),
        ExprKind::Const(value) => *value,
        ExprKind::MinCredits(credits) => context.approved_credits_before(semester) >= *credits,
        ExprKind::ReqLevel(req) => match context.level.as_deref() {
            Some(level) => attribute_matches(Some(level), req),
            None => false,
        },
        ExprKind::ReqSchool(req) => attribute_matches(context.school.as_deref(), req),
        ExprKind::ReqProgram(req) => attribute_matches(context.program.as_deref(), req),
        ExprKind::ReqCareer(req) => attribute_matches(context.career.as_deref(), req),
        ExprKind::ReqCourse(req) => context.is_taken_for(&req.code, semester, req.coreq),
    }
}

fn attribute_matches(value: Option<&str>, req: &AttributeReq) -> bool {
    (value == Some(req.value.as_str())) == req.equal
}
