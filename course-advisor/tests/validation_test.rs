#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use course_advisor::catalog::Term;
use course_advisor::plan::StudentContext;
use course_advisor::requirements::Expr;
use course_advisor::validate_plan;
use course_advisor::validation::DiagnosticPayload;
use course_advisor::validation::DiagnosticTarget;
use course_advisor::validation::Severity;
use course_advisor::validation::ValidationOptions;
use course_advisor::validation::ValidationResult;
use course_advisor::PlanValidator;
use helpers::catalog;
use helpers::curriculum;
use helpers::plan;

fn validate(semesters: &[&[&str]], student: Option<&StudentContext>) -> ValidationResult {
    let catalog = catalog();
    let curriculum = curriculum(&catalog);
    validate_plan(
        &plan(semesters),
        &catalog,
        &curriculum,
        student,
        ValidationOptions::default(),
    )
}

fn payloads_for<'a>(
    result: &'a ValidationResult,
    code: &'a str,
) -> impl Iterator<Item = &'a DiagnosticPayload> + 'a {
    result
        .diagnostics
        .iter()
        .filter(move |diagnostic| match &diagnostic.target {
            DiagnosticTarget::Course { code: target, .. } => target == code,
            _ => false,
        })
        .map(|diagnostic| &diagnostic.payload)
}

#[test]
fn complete_plan_has_no_diagnostics() {
    let result = validate(
        &[
            &["MAT1", "LAB1", "THE1", "HUM1/HUMS"],
            &["MAT2", "SPR1"],
            &["FIS1"],
        ],
        None,
    );

    assert_eq!(result.diagnostics, vec![]);
    assert_eq!(
        result.course_superblocks[0],
        vec![
            Some("Major".to_owned()),
            Some("Major".to_owned()),
            Some("Major".to_owned()),
            Some("FormacionGeneral".to_owned()),
        ]
    );
}

#[test]
fn class_problems_are_reported_independently() {
    let result = validate(&[&["MAT2", "SPR1", "ZZZ9", "ENG1"]], None);

    assert_eq!(
        payloads_for(&result, "MAT2").collect::<Vec<_>>(),
        vec![&DiagnosticPayload::UnmetRequirements {
            missing: Expr::course("MAT1"),
            modernized: Expr::course("MAT1"),
        }]
    );
    assert_eq!(
        payloads_for(&result, "SPR1").collect::<Vec<_>>(),
        vec![&DiagnosticPayload::WrongTerm { term: Term::First }]
    );
    assert_eq!(
        payloads_for(&result, "ZZZ9").collect::<Vec<_>>(),
        vec![&DiagnosticPayload::UnknownCourse]
    );
    assert_eq!(
        payloads_for(&result, "ENG1").collect::<Vec<_>>(),
        vec![&DiagnosticPayload::UnmetRequirements {
            missing: Expr::school("Engineering", true),
            modernized: Expr::school("Engineering", true),
        }]
    );
    assert!(result.has_errors());
}

#[test]
fn renamed_courses_satisfy_requirements_on_their_modern_code() {
    let student = StudentContext {
        current_semester: 1,
        passed_courses: vec!["OLD1".to_owned()],
    };
    let result = validate(&[&["OLD1"], &["MAT2"]], Some(&student));

    assert_eq!(payloads_for(&result, "MAT2").count(), 0);
    assert_eq!(payloads_for(&result, "OLD1").count(), 0);
}

#[test]
fn overloaded_semesters_are_errors_beyond_the_hard_limit() {
    let result = validate(
        &[&["MAT1", "ALG1", "GEO1", "HUM1", "HUM2", "LAB1", "THE1", "ENG1"]],
        None,
    );

    let overloads = result
        .diagnostics
        .iter()
        .filter(|diagnostic| {
            matches!(
                diagnostic.payload,
                DiagnosticPayload::CreditOverload { .. }
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(overloads.len(), 1);
    assert_eq!(overloads[0].severity, Severity::Error);
    assert_eq!(
        overloads[0].target,
        DiagnosticTarget::Semester { semester: 0 }
    );
}

#[test]
fn unmet_blocks_recommend_fillers() {
    let result = validate(&[&["MAT1", "LAB1", "THE1", "HUM1/HUMS"], &["MAT2"]], None);

    let unmet = result
        .diagnostics
        .iter()
        .filter_map(|diagnostic| match (&diagnostic.target, &diagnostic.payload) {
            (
                DiagnosticTarget::Curriculum { block },
                DiagnosticPayload::UnmetBlock {
                    superblock,
                    missing_credits,
                    recommended,
                },
            ) => Some((
                block.as_str(),
                superblock.as_str(),
                *missing_credits,
                recommended.len(),
            )),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        unmet,
        vec![
            ("physics", "Major", 10, 1),
            ("seasonal", "FormacionGeneral", 10, 1),
        ]
    );
}

#[test]
fn ambiguous_equivalences_are_warnings() {
    let result = validate(&[&["HUMS"]], None);

    let ambiguous = result
        .warnings()
        .filter(|diagnostic| {
            matches!(
                diagnostic.payload,
                DiagnosticPayload::AmbiguousEquivalence { .. }
            )
        })
        .count();
    assert_eq!(ambiguous, 1);
}

#[test]
fn diagnostics_serialize_with_tagged_payloads() {
    let result = validate(&[&["ZZZ9"]], None);

    let json = serde_json::to_value(&result).expect("serializable");
    let diagnostic = &json["diagnostics"][0];
    assert_eq!(diagnostic["severity"], "error");
    assert_eq!(diagnostic["target"]["kind"], "course");
    assert_eq!(diagnostic["payload"]["kind"], "unknown_course");
}

#[test]
fn validator_statistics_accumulate() {
    let catalog = catalog();
    let curriculum = curriculum(&catalog);
    let mut validator = PlanValidator::new(ValidationOptions::default());

    let _ = validator.validate(&plan(&[&["MAT1"]]), &catalog, &curriculum, None);
    let _ = validator.validate(&plan(&[&["MAT1", "MAT2"]]), &catalog, &curriculum, None);

    let statistics = validator.statistics();
    assert_eq!(statistics.num_validations, 2);
    assert_eq!(statistics.num_checked_classes, 3);
    assert!(statistics.num_errors > 0);
    assert!(statistics.augmenting_paths > 0);
}
