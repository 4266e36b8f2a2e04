use itertools::Itertools;
use log::debug;

use super::diagnostic::Diagnostic;
use super::diagnostic::DiagnosticPayload;
use super::diagnostic::DiagnosticTarget;
use super::diagnostic::ValidationResult;
use crate::catalog::CourseCatalog;
use crate::create_statistics_struct;
use crate::curriculum::Curriculum;
use crate::plan::Plan;
use crate::plan::PseudoCourse;
use crate::plan::StudentContext;
use crate::requirements::diagnose;
use crate::requirements::PlanContext;
use crate::solver::diagnose_curriculum;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Semesters above this many credits get a warning.
pub const DEFAULT_MAX_CREDITS: u32 = 50;
/// Semesters above this many credits are an error.
pub const DEFAULT_HARD_MAX_CREDITS: u32 = 65;

/// Configures the checks run by a [`PlanValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub max_credits: u32,
    pub hard_max_credits: u32,
    /// Whether to check curriculum fulfilment, which requires solving the curriculum.
    pub check_curriculum: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            max_credits: DEFAULT_MAX_CREDITS,
            hard_max_credits: DEFAULT_HARD_MAX_CREDITS,
            check_curriculum: true,
        }
    }
}

create_statistics_struct!(
    /// Counters accumulated over all validations of one [`PlanValidator`].
    ValidationStatistics {
        num_validations: u64,
        num_checked_classes: u64,
        num_errors: u64,
        num_warnings: u64,
        /// Augmenting paths of the curriculum solves
        augmenting_paths: u64,
        bellman_ford_rounds: u64,
});

/// Checks plans for problems.
///
/// Every class is checked on its own (existence, term, prerequisites), every semester for its
/// credit load, and the plan as a whole against the curriculum. A problem never stops the
/// remaining checks.
#[derive(Debug, Default)]
pub struct PlanValidator {
    options: ValidationOptions,
    statistics: ValidationStatistics,
}

impl PlanValidator {
    pub fn new(options: ValidationOptions) -> PlanValidator {
        PlanValidator {
            options,
            statistics: ValidationStatistics::default(),
        }
    }

    pub fn statistics(&self) -> ValidationStatistics {
        self.statistics
    }

    pub fn log_statistics(&self) {
        self.statistics.log(StatisticLogger::new("validation"));
    }

    pub fn validate(
        &mut self,
        plan: &Plan,
        catalog: &CourseCatalog,
        curriculum: &Curriculum,
        student: Option<&StudentContext>,
    ) -> ValidationResult {
        let current_semester = student.map_or(0, |student| student.current_semester);
        let context = PlanContext::new(catalog, plan);
        let mut result = ValidationResult::default();

        for (semester, index, class) in plan.iter_classes() {
            self.statistics.num_checked_classes += 1;
            let target = DiagnosticTarget::Course {
                semester,
                index,
                code: class.code().to_owned(),
            };
            check_class(
                plan,
                &context,
                class,
                semester,
                semester >= current_semester,
                target,
                &mut result.diagnostics,
            );
        }

        for (semester, classes) in plan.classes.iter().enumerate().skip(current_semester) {
            let credits = classes
                .iter()
                .map(|class| catalog.credits_of(class).unwrap_or(0))
                .sum::<u32>();
            self.check_credits(semester, credits, &mut result.diagnostics);
        }

        if self.options.check_curriculum {
            self.check_curriculum(plan, catalog, curriculum, student, &mut result);
        }

        self.statistics.num_validations += 1;
        for diagnostic in &result.diagnostics {
            if diagnostic.is_error() {
                self.statistics.num_errors += 1;
            } else {
                self.statistics.num_warnings += 1;
            }
        }
        debug!(
            "Validated plan with {} semesters: {} diagnostics",
            plan.classes.len(),
            result.diagnostics.len()
        );

        result
    }

    fn check_credits(&self, semester: usize, credits: u32, diagnostics: &mut Vec<Diagnostic>) {
        let target = DiagnosticTarget::Semester { semester };
        if credits > self.options.hard_max_credits {
            diagnostics.push(Diagnostic::error(
                target,
                format!(
                    "Semester {} has {credits} credits, more than the allowed {}",
                    semester + 1,
                    self.options.hard_max_credits
                ),
                DiagnosticPayload::CreditOverload {
                    credits,
                    max_credits: self.options.hard_max_credits,
                },
            ));
        } else if credits > self.options.max_credits {
            diagnostics.push(Diagnostic::warning(
                target,
                format!(
                    "Semester {} has {credits} credits, more than the recommended {}",
                    semester + 1,
                    self.options.max_credits
                ),
                DiagnosticPayload::CreditOverload {
                    credits,
                    max_credits: self.options.max_credits,
                },
            ));
        }
    }

    fn check_curriculum(
        &mut self,
        plan: &Plan,
        catalog: &CourseCatalog,
        curriculum: &Curriculum,
        student: Option<&StudentContext>,
        result: &mut ValidationResult,
    ) {
        let diagnosis = diagnose_curriculum(curriculum, catalog, plan, student);
        let summary = diagnosis.solved.summary();
        self.statistics.augmenting_paths += summary.augmenting_paths;
        self.statistics.bellman_ford_rounds += summary.bellman_ford_rounds;

        for block in &diagnosis.unmet_blocks {
            let mut message = format!(
                "Missing {} credits in '{}'",
                block.missing_credits, block.name
            );
            if !block.recommended.is_empty() {
                message.push_str(&format!(", e.g. {}", block.recommended.iter().join(", ")));
            }
            result.diagnostics.push(Diagnostic::error(
                DiagnosticTarget::Curriculum {
                    block: block.code.clone(),
                },
                message,
                DiagnosticPayload::UnmetBlock {
                    superblock: block.superblock.clone(),
                    missing_credits: block.missing_credits,
                    recommended: block.recommended.clone(),
                },
            ));
        }

        if diagnosis.should_warn_unassigned() {
            let codes = diagnosis
                .unassigned
                .iter()
                .map(|class| class.code.clone())
                .collect::<Vec<_>>();
            result.diagnostics.push(Diagnostic::warning(
                DiagnosticTarget::Plan,
                format!(
                    "{} credits do not count towards the curriculum: {}",
                    diagnosis.unassigned_credits,
                    codes.join(", ")
                ),
                DiagnosticPayload::UnassignedCourses {
                    codes,
                    credits: diagnosis.unassigned_credits,
                },
            ));
        }

        result.course_superblocks = diagnosis.superblocks;
    }
}

/// Validates `plan` with a fresh [`PlanValidator`].
pub fn validate_plan(
    plan: &Plan,
    catalog: &CourseCatalog,
    curriculum: &Curriculum,
    student: Option<&StudentContext>,
    options: ValidationOptions,
) -> ValidationResult {
    PlanValidator::new(options).validate(plan, catalog, curriculum, student)
}

/// Checks a single class. Term and prerequisite checks are skipped for semesters that are
/// already history.
fn check_class(
    plan: &Plan,
    context: &PlanContext<'_>,
    class: &PseudoCourse,
    semester: usize,
    is_pending: bool,
    target: DiagnosticTarget,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let catalog = context.catalog();
    match class {
        PseudoCourse::Concrete(concrete) => {
            let Some(course) = catalog.course(&concrete.code) else {
                diagnostics.push(Diagnostic::error(
                    target,
                    format!("Unknown course {}", concrete.code),
                    DiagnosticPayload::UnknownCourse,
                ));
                return;
            };
            if !is_pending {
                return;
            }
            if !course.is_available {
                diagnostics.push(Diagnostic::warning(
                    target.clone(),
                    format!("{} is no longer offered", concrete.code),
                    DiagnosticPayload::UnavailableCourse,
                ));
            }
            let term = plan.term_of(semester);
            if !course.semestrality.is_offered_in(term) {
                diagnostics.push(Diagnostic::error(
                    target.clone(),
                    format!("{} is not offered in the {term} term", concrete.code),
                    DiagnosticPayload::WrongTerm { term },
                ));
            }
        }
        PseudoCourse::Equivalence(equivalence) => {
            let Some(info) = catalog.equivalence(&equivalence.code) else {
                diagnostics.push(Diagnostic::error(
                    target,
                    format!("Unknown equivalence {}", equivalence.code),
                    DiagnosticPayload::UnknownCourse,
                ));
                return;
            };
            if !info.is_homogeneous && info.courses.len() > 1 {
                diagnostics.push(Diagnostic::warning(
                    target.clone(),
                    format!("Choose a course for {}", equivalence.code),
                    DiagnosticPayload::AmbiguousEquivalence {
                        equivalence: equivalence.code.clone(),
                        options: info.courses.clone(),
                    },
                ));
            }
            if !is_pending {
                return;
            }
        }
    }

    let Some(requirements) = catalog.requirements_of(class) else {
        return;
    };
    if let Some(missing) = diagnose(requirements, context, semester) {
        diagnostics.push(Diagnostic::error(
            target,
            format!("Missing requirements for {}: {}", class.code(), missing.missing),
            DiagnosticPayload::UnmetRequirements {
                missing: missing.missing,
                modernized: missing.modernized,
            },
        ));
    }
}
