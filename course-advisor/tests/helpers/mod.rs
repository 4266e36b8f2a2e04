//! Shared fixtures for the integration tests: a small catalog and curriculum in the JSON format
//! read by the binary.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use course_advisor::catalog::CourseCatalog;
use course_advisor::catalog::CourseInfo;
use course_advisor::catalog::EquivalenceInfo;
use course_advisor::curriculum::Curriculum;
use course_advisor::curriculum::CurriculumData;
use course_advisor::plan::ConcreteId;
use course_advisor::plan::CurriculumSpec;
use course_advisor::plan::EquivalenceId;
use course_advisor::plan::Plan;
use course_advisor::plan::PseudoCourse;
use serde::Deserialize;

pub(crate) const CATALOG: &str = r#"{
    "courses": [
        {"code": "MAT1", "credits": 10},
        {"code": "MAT2", "credits": 10,
         "deps": {"expr": "req_course", "code": "MAT1"}},
        {"code": "FIS1", "credits": 10,
         "deps": {"expr": "or", "children": [
             {"expr": "req_course", "code": "MAT2"},
             {"expr": "and", "children": [
                 {"expr": "req_course", "code": "ALG1"},
                 {"expr": "req_course", "code": "GEO1"}
             ]}
         ]}},
        {"code": "ALG1", "credits": 10},
        {"code": "GEO1", "credits": 10},
        {"code": "LAB1", "credits": 5,
         "deps": {"expr": "req_course", "code": "THE1", "coreq": true}},
        {"code": "THE1", "credits": 10,
         "deps": {"expr": "req_course", "code": "LAB1", "coreq": true}},
        {"code": "HUM1", "credits": 10},
        {"code": "HUM2", "credits": 10},
        {"code": "SPR1", "credits": 10,
         "semestrality": {"first": false, "second": true}},
        {"code": "ENG1", "credits": 10,
         "deps": {"expr": "req_school", "school": "Engineering"}},
        {"code": "OLD1", "credits": 10, "canonical": "MAT1", "is_available": false}
    ],
    "equivalences": [
        {"code": "HUMS", "courses": ["HUM1", "HUM2"]}
    ]
}"#;

pub(crate) const CURRICULUM: &str = r#"{
    "root": {"kind": "combination", "code": "root", "children": [
        {"kind": "combination", "code": "Major", "name": "Major", "children": [
            {"kind": "leaf", "code": "calculus", "name": "Calculus", "cap": 20,
             "codes": ["MAT1", "MAT2"]},
            {"kind": "leaf", "code": "physics", "name": "Physics", "cap": 10,
             "codes": ["FIS1"]},
            {"kind": "leaf", "code": "lab", "name": "Laboratory", "cap": 15,
             "codes": ["LAB1", "THE1"]}
        ]},
        {"kind": "combination", "code": "FormacionGeneral", "name": "General", "children": [
            {"kind": "leaf", "code": "humanities", "name": "Humanities", "cap": 10,
             "codes": ["HUMS"]},
            {"kind": "leaf", "code": "seasonal", "name": "Seasonal", "cap": 10,
             "codes": ["SPR1"]}
        ]}
    ]},
    "fillers": {
        "MAT1": [{"course": {"kind": "concrete", "code": "MAT1"}, "order": 0}],
        "MAT2": [{"course": {"kind": "concrete", "code": "MAT2"}, "order": 1}],
        "FIS1": [{"course": {"kind": "concrete", "code": "FIS1"}, "order": 2}],
        "LAB1": [{"course": {"kind": "concrete", "code": "LAB1"}, "order": 3}],
        "THE1": [{"course": {"kind": "concrete", "code": "THE1"}, "order": 4}],
        "HUMS": [{"course": {"kind": "equivalence", "code": "HUMS", "credits": 10}, "order": 5}],
        "SPR1": [{"course": {"kind": "concrete", "code": "SPR1"}, "order": 6}]
    }
}"#;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    courses: Vec<CourseInfo>,
    equivalences: Vec<EquivalenceInfo>,
}

pub(crate) fn catalog() -> CourseCatalog {
    let file: CatalogFile = serde_json::from_str(CATALOG).expect("valid catalog");
    CourseCatalog::new(file.courses, file.equivalences)
}

pub(crate) fn curriculum(catalog: &CourseCatalog) -> Curriculum {
    let data: CurriculumData = serde_json::from_str(CURRICULUM).expect("valid curriculum");
    data.build(catalog).expect("well formed curriculum")
}

pub(crate) fn plan(semesters: &[&[&str]]) -> Plan {
    let mut plan = Plan::new(CurriculumSpec {
        cyear: "C2020".to_owned(),
        ..CurriculumSpec::default()
    });
    plan.classes = semesters
        .iter()
        .map(|codes| codes.iter().map(|code| class(code)).collect())
        .collect();
    plan
}

/// `"HUMS"` is an unresolved equivalence slot, `"HUM1/HUMS"` a course chosen for it and anything
/// else a plain concrete course.
pub(crate) fn class(code: &str) -> PseudoCourse {
    if code == "HUMS" {
        return PseudoCourse::equivalence(code, 10);
    }
    match code.split_once('/') {
        Some((course, equivalence)) => PseudoCourse::Concrete(ConcreteId {
            code: course.to_owned(),
            equivalence: Some(EquivalenceId {
                code: equivalence.to_owned(),
                credits: 10,
            }),
        }),
        None => PseudoCourse::concrete(code),
    }
}

pub(crate) fn semester_of(plan: &Plan, code: &str) -> Option<usize> {
    plan.iter_classes()
        .find(|(_, _, class)| class.code() == code)
        .map(|(semester, _, _)| semester)
}
