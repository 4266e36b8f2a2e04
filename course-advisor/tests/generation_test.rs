#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use course_advisor::catalog::Term;
use course_advisor::generate_recommended_plan;
use course_advisor::generation::GeneratorOptions;
use course_advisor::plan::Plan;
use course_advisor::plan::StudentContext;
use course_advisor::solver::solve_curriculum;
use course_advisor::solver::SolveMode;
use course_advisor::validate_plan;
use course_advisor::validation::ValidationOptions;
use course_advisor::PlanGenerator;
use helpers::catalog;
use helpers::curriculum;
use helpers::plan;
use helpers::semester_of;

fn generate(base: &Plan, reference: Option<&Plan>, student: Option<&StudentContext>) -> Plan {
    let catalog = catalog();
    let curriculum = curriculum(&catalog);
    generate_recommended_plan(
        base,
        &catalog,
        &curriculum,
        reference,
        student,
        GeneratorOptions::default(),
    )
}

#[test]
fn generated_plan_from_scratch_validates_without_errors() {
    let catalog = catalog();
    let curriculum = curriculum(&catalog);
    let generated = generate(&plan(&[]), None, None);

    let solved = solve_curriculum(&curriculum, &catalog, &generated, SolveMode::TakenOnly);
    assert!(solved.is_complete());

    let result = validate_plan(
        &generated,
        &catalog,
        &curriculum,
        None,
        ValidationOptions::default(),
    );
    assert!(!result.has_errors(), "{:?}", result.diagnostics);
}

#[test]
fn prerequisites_come_before_the_courses_requiring_them() {
    let generated = generate(&plan(&[]), None, None);

    let mat1 = semester_of(&generated, "MAT1").expect("MAT1 is recommended");
    let mat2 = semester_of(&generated, "MAT2").expect("MAT2 is recommended");
    let fis1 = semester_of(&generated, "FIS1").expect("FIS1 is recommended");
    assert!(mat1 < mat2);
    assert!(mat2 < fis1);
}

#[test]
fn mutual_corequisites_are_placed_together() {
    let generated = generate(&plan(&[]), None, None);

    let lab = semester_of(&generated, "LAB1").expect("LAB1 is recommended");
    let theory = semester_of(&generated, "THE1").expect("THE1 is recommended");
    assert_eq!(lab, theory);
}

#[test]
fn term_bound_courses_land_in_their_term() {
    let generated = generate(&plan(&[]), None, None);

    let spring = semester_of(&generated, "SPR1").expect("SPR1 is recommended");
    assert_eq!(generated.term_of(spring), Term::Second);
}

#[test]
fn history_is_kept_and_new_semesters_start_at_the_current_one() {
    let base = plan(&[&["MAT1"], &["MAT2"]]);
    let student = StudentContext {
        current_semester: 2,
        passed_courses: vec!["MAT1".to_owned(), "MAT2".to_owned()],
    };

    let generated = generate(&base, None, Some(&student));

    assert_eq!(generated.classes[..2], base.classes[..]);
    assert!(generated.classes.len() > 2);
    assert_eq!(
        generated
            .iter_classes()
            .filter(|(_, _, class)| class.code() == "MAT1")
            .count(),
        1
    );
    let fis1 = semester_of(&generated, "FIS1").expect("FIS1 is recommended");
    assert!(fis1 >= 2);
}

#[test]
fn equivalence_choices_are_carried_over_from_the_reference() {
    let reference = plan(&[&["HUM2/HUMS"]]);

    let generated = generate(&plan(&[]), Some(&reference), None);

    assert!(semester_of(&generated, "HUM2").is_some());
    assert!(semester_of(&generated, "HUMS").is_none());
}

#[test]
fn semesters_respect_the_credit_ceiling() {
    let catalog = catalog();
    let curriculum = curriculum(&catalog);
    let options = GeneratorOptions {
        max_credits: 20,
        ..GeneratorOptions::default()
    };
    let mut generator = PlanGenerator::new(options);

    let generated = generator.generate(&plan(&[]), &catalog, &curriculum, None, None);

    for semester in &generated.classes {
        let credits = semester
            .iter()
            .map(|class| catalog.credits_of(class).unwrap_or(0))
            .sum::<u32>();
        assert!(credits <= 20, "{semester:?} has {credits} credits");
    }
    assert_eq!(generator.statistics().num_generations, 1);
    assert_eq!(generator.statistics().leftover_courses, 0);
}
