use serde::Deserialize;
use serde::Serialize;

use super::expression::AttributeReq;
use super::expression::Expr;
use super::expression::ExprKind;

/// The serialized shape of an [`Expr`], e.g.
/// `{"expr": "and", "children": [{"expr": "req_course", "code": "MAT1610"}]}`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub(crate) enum RawExpr {
    And {
        children: Vec<Expr>,
    },
    Or {
        children: Vec<Expr>,
    },
    Const {
        value: bool,
    },
    MinCredits {
        min_credits: u32,
    },
    ReqLevel {
        level: String,
        #[serde(default = "default_equal")]
        equal: bool,
    },
    ReqSchool {
        school: String,
        #[serde(default = "default_equal")]
        equal: bool,
    },
    ReqProgram {
        program: String,
        #[serde(default = "default_equal")]
        equal: bool,
    },
    ReqCareer {
        career: String,
        #[serde(default = "default_equal")]
        equal: bool,
    },
    ReqCourse {
        code: String,
        #[serde(default)]
        coreq: bool,
    },
}

fn default_equal() -> bool {
    true
}

impl From<RawExpr> for Expr {
    fn from(raw: RawExpr) -> Self {
        match raw {
            RawExpr::And { children } => Expr::and(children),
            RawExpr::Or { children } => Expr::or(children),
            RawExpr::Const { value } => Expr::constant(value),
            RawExpr::MinCredits { min_credits } => Expr::min_credits(min_credits),
            RawExpr::ReqLevel { level, equal } => Expr::level(level, equal),
            RawExpr::ReqSchool { school, equal } => Expr::school(school, equal),
            RawExpr::ReqProgram { program, equal } => Expr::program(program, equal),
            RawExpr::ReqCareer { career, equal } => Expr::career(career, equal),
            RawExpr::ReqCourse { code, coreq } => Expr::course_req(code, coreq),
        }
    }
}

impl From<Expr> for RawExpr {
    fn from(expr: Expr) -> Self {
        let attribute = |req: &AttributeReq| (req.value.clone(), req.equal);
        match expr.kind() {
            ExprKind::Operator(operator) if operator.neutral => RawExpr::And {
                children: operator.children.clone(),
            },
            ExprKind::Operator(operator) => RawExpr::Or {
                children: operator.children.clone(),
            },
            ExprKind::Const(value) => RawExpr::Const { value: *value },
            ExprKind::MinCredits(min_credits) => RawExpr::MinCredits {
                min_credits: *min_credits,
            },
            ExprKind::ReqLevel(req) => {
                let (level, equal) = attribute(req);
                RawExpr::ReqLevel { level, equal }
            }
            ExprKind::ReqSchool(req) => {
                let (school, equal) = attribute(req);
                RawExpr::ReqSchool { school, equal }
            }
            ExprKind::ReqProgram(req) => {
                let (program, equal) = attribute(req);
                RawExpr::ReqProgram { program, equal }
            }
            ExprKind::ReqCareer(req) => {
                let (career, equal) = attribute(req);
                RawExpr::ReqCareer { career, equal }
            }
            ExprKind::ReqCourse(req) => RawExpr::ReqCourse {
                code: req.code.clone(),
                coreq: req.coreq,
            },
        }
    }
}
