#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use course_advisor::requirements::as_dnf;
use course_advisor::requirements::simplify;
use course_advisor::requirements::Expr;

fn parse(json: &str) -> Expr {
    serde_json::from_str(json).expect("valid expression")
}

#[test]
fn expressions_are_read_from_tagged_json() {
    let expr = parse(
        r#"{"expr": "and", "children": [
            {"expr": "req_course", "code": "MAT1"},
            {"expr": "or", "children": [
                {"expr": "req_course", "code": "LAB1", "coreq": true},
                {"expr": "min_credits", "min_credits": 100},
                {"expr": "req_career", "career": "Engineering", "equal": false}
            ]}
        ]}"#,
    );

    assert_eq!(
        expr,
        Expr::and(vec![
            Expr::course("MAT1"),
            Expr::or(vec![
                Expr::coreq("LAB1"),
                Expr::min_credits(100),
                Expr::career("Engineering", false),
            ]),
        ])
    );
}

#[test]
fn expressions_survive_a_json_round_trip() {
    let expr = Expr::or(vec![
        Expr::and(vec![Expr::course("A"), Expr::school("Math", true)]),
        Expr::constant(false),
    ]);

    let json = serde_json::to_string(&expr).expect("serializable");
    assert_eq!(parse(&json), expr);
}

#[test]
fn satisfied_alternatives_absorb_their_siblings() {
    let expr = parse(
        r#"{"expr": "and", "children": [
            {"expr": "req_course", "code": "A"},
            {"expr": "or", "children": [
                {"expr": "req_course", "code": "A"},
                {"expr": "req_course", "code": "B"}
            ]},
            {"expr": "const", "value": true}
        ]}"#,
    );

    assert_eq!(simplify(&expr), Expr::course("A"));
}

#[test]
fn normal_forms_are_disjunctions_of_conjunctions() {
    let expr = Expr::and(vec![
        Expr::or(vec![Expr::course("A"), Expr::course("B")]),
        Expr::course("C"),
    ]);

    let dnf = as_dnf(&expr);

    let clauses = dnf.as_operator().expect("an operator");
    assert!(!clauses.neutral);
    for clause in &clauses.children {
        let conjunction = clause.as_operator().expect("an operator");
        assert!(conjunction.neutral);
        assert!(conjunction.children.iter().all(Expr::is_atom));
    }
    assert_eq!(clauses.children.len(), 2);
}
