use itertools::Itertools;
use log::debug;
use log::info;
use log::warn;

use super::corequisites::corequisite_clusters;
use super::generator_options::GeneratorOptions;
use super::hidden_requirements::infer_hidden_requirements;
use super::superblock::sort_by_superblock;
use crate::catalog::CourseCatalog;
use crate::create_statistics_struct;
use crate::curriculum::Curriculum;
use crate::plan::ConcreteId;
use crate::plan::Plan;
use crate::plan::PseudoCourse;
use crate::plan::StudentContext;
use crate::requirements::evaluate;
use crate::requirements::ClassPosition;
use crate::requirements::PlanContext;
use crate::solver::solve_curriculum;
use crate::solver::tag_superblocks;
use crate::solver::SolveMode;
use crate::solver::SolvedCurriculum;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters accumulated over all generations of one [`PlanGenerator`].
    GeneratorStatistics {
        num_generations: u64,
        curriculum_solves: u64,
        augmenting_paths: u64,
        inference_rounds: u64,
        inferred_courses: u64,
        simplifier_passes: u64,
        /// Inference rounds skipped because the normal form grew too large
        dnf_blowups: u64,
        placed_courses: u64,
        opened_semesters: u64,
        leftover_courses: u64,
});

/// Completes plans with the courses their curriculum still demands.
#[derive(Debug, Default)]
pub struct PlanGenerator {
    options: GeneratorOptions,
    statistics: GeneratorStatistics,
}

impl PlanGenerator {
    pub fn new(options: GeneratorOptions) -> PlanGenerator {
        PlanGenerator {
            options,
            statistics: GeneratorStatistics::default(),
        }
    }

    pub fn statistics(&self) -> GeneratorStatistics {
        self.statistics
    }

    pub fn log_statistics(&self) {
        self.statistics.log(StatisticLogger::new("generation"));
    }

    /// Appends semesters to `base` until its curriculum is fulfilled.
    ///
    /// Existing classes are never moved or removed. Recommended equivalences are replaced by the
    /// course that `reference` chose for them, if any. Classes that cannot be placed while
    /// respecting terms, prerequisites and the credit load are appended in one final semester.
    pub fn generate(
        &mut self,
        base: &Plan,
        catalog: &CourseCatalog,
        curriculum: &Curriculum,
        reference: Option<&Plan>,
        student: Option<&StudentContext>,
    ) -> Plan {
        self.statistics.num_generations += 1;
        let mut plan = base.clone();

        let solved = self.solve(curriculum, catalog, &plan, SolveMode::WithFillers);
        let mut queue = recommended_classes(&solved);
        if let Some(reference) = reference {
            carry_over_choices(&mut queue, reference, &plan);
        }
        debug!("Recommended {} classes before inference", queue.len());

        let inference = infer_hidden_requirements(&mut queue, &plan, catalog, &self.options);
        self.statistics.inference_rounds += inference.rounds;
        self.statistics.inferred_courses += inference.inferred_courses;
        self.statistics.simplifier_passes += inference.simplifier_passes;
        self.statistics.dnf_blowups += inference.dnf_blowups;

        let clusters = corequisite_clusters(&queue, catalog)
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .map(|index| queue[index].clone())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let current_semester = student.map_or(0, |student| student.current_semester);
        let first_semester = self.place(&mut plan, catalog, clusters, current_semester);

        let solved = self.solve(curriculum, catalog, &plan, SolveMode::TakenOnly);
        let tags = tag_superblocks(curriculum, &solved, &plan);
        sort_by_superblock(&mut plan, &tags, first_semester);

        info!(
            "Generated plan with {} semesters, curriculum {}",
            plan.classes.len(),
            if solved.is_complete() {
                "complete"
            } else {
                "incomplete"
            }
        );
        plan
    }

    fn solve(
        &mut self,
        curriculum: &Curriculum,
        catalog: &CourseCatalog,
        plan: &Plan,
        mode: SolveMode,
    ) -> SolvedCurriculum {
        let solved = solve_curriculum(curriculum, catalog, plan, mode);
        self.statistics.curriculum_solves += 1;
        self.statistics.augmenting_paths += solved.summary().augmenting_paths;
        solved
    }

    /// Places the clusters greedily, semester by semester, after the classes already in `plan`.
    /// Returns the first semester that placement could modify.
    fn place(
        &mut self,
        plan: &mut Plan,
        catalog: &CourseCatalog,
        mut pending: Vec<Vec<PseudoCourse>>,
        current_semester: usize,
    ) -> usize {
        let base_len = plan.classes.len().max(current_semester);
        while plan.classes.len() < current_semester {
            plan.classes.push(Vec::new());
        }
        // A trailing empty semester that is still open to the student is reused.
        let reuse_last = plan.classes.len() > current_semester
            && plan.classes.last().is_some_and(Vec::is_empty);
        if !reuse_last {
            plan.classes.push(Vec::new());
        }
        let first_semester = plan.classes.len() - 1;

        let mut empty_semesters = 0;
        while !pending.is_empty() {
            let semester = plan.classes.len() - 1;
            let mut placed_here = 0;
            while let Some(index) = pending
                .iter()
                .position(|cluster| can_place(plan, catalog, cluster, semester, &self.options))
            {
                let cluster = pending.remove(index);
                placed_here += cluster.len();
                plan.classes[semester].extend(cluster);
            }
            self.statistics.placed_courses += placed_here as u64;

            if pending.is_empty() {
                break;
            }
            if placed_here == 0 {
                empty_semesters += 1;
                if empty_semesters >= self.options.max_empty_semesters {
                    break;
                }
            } else {
                empty_semesters = 0;
            }
            plan.classes.push(Vec::new());
            self.statistics.opened_semesters += 1;
        }

        while plan.classes.len() > base_len && plan.classes.last().is_some_and(Vec::is_empty) {
            let _ = plan.classes.pop();
        }

        if !pending.is_empty() {
            let leftovers = pending.into_iter().flatten().collect::<Vec<_>>();
            warn!(
                "Could not place {} classes, appending them in a final semester: {}",
                leftovers.len(),
                leftovers.iter().join(", ")
            );
            self.statistics.leftover_courses += leftovers.len() as u64;
            plan.classes.push(leftovers);
        }

        first_semester
    }
}

/// Generates a recommended plan with a fresh [`PlanGenerator`].
pub fn generate_recommended_plan(
    base: &Plan,
    catalog: &CourseCatalog,
    curriculum: &Curriculum,
    reference: Option<&Plan>,
    student: Option<&StudentContext>,
    options: GeneratorOptions,
) -> Plan {
    PlanGenerator::new(options).generate(base, catalog, curriculum, reference, student)
}

/// The fillers the solver used, in filler order.
fn recommended_classes(solved: &SolvedCurriculum) -> Vec<PseudoCourse> {
    solved
        .used_fillers()
        .map(|(_, instance)| instance.class.clone())
        .collect()
}

/// Replaces recommended equivalences with the concrete course `reference` holds for them.
fn carry_over_choices(queue: &mut [PseudoCourse], reference: &Plan, plan: &Plan) {
    let mut choices = reference
        .iter_classes()
        .filter_map(|(_, _, class)| class.as_concrete())
        .filter(|concrete| concrete.equivalence.is_some())
        .filter(|concrete| {
            plan.iter_classes()
                .all(|(_, _, taken)| taken.code() != concrete.code)
        })
        .cloned()
        .collect::<Vec<_>>();

    for class in queue.iter_mut() {
        let PseudoCourse::Equivalence(equivalence) = class else {
            continue;
        };
        let chosen = choices.iter().position(|choice| {
            choice
                .equivalence
                .as_ref()
                .is_some_and(|chosen_for| chosen_for.code == equivalence.code)
        });
        if let Some(index) = chosen {
            let choice = choices.remove(index);
            *class = PseudoCourse::Concrete(ConcreteId {
                code: choice.code,
                equivalence: Some(equivalence.clone()),
            });
        }
    }
}

/// Whether `cluster` can be added to `semester`, the last semester of `plan`.
fn can_place(
    plan: &Plan,
    catalog: &CourseCatalog,
    cluster: &[PseudoCourse],
    semester: usize,
    options: &GeneratorOptions,
) -> bool {
    let term = plan.term_of(semester);
    let offered = cluster.iter().all(|class| {
        class
            .as_concrete()
            .and_then(|concrete| catalog.course(&concrete.code))
            .map_or(true, |course| course.semestrality.is_offered_in(term))
    });
    if !offered {
        return false;
    }

    let credits_of = |classes: &[PseudoCourse]| -> u32 {
        classes
            .iter()
            .map(|class| catalog.credits_of(class).unwrap_or(0))
            .sum()
    };
    let existing = &plan.classes[semester];
    if !existing.is_empty() && credits_of(existing) + credits_of(cluster) > options.max_credits {
        return false;
    }

    let mut context = PlanContext::new(catalog, plan);
    for (offset, class) in cluster.iter().enumerate() {
        context.record(
            class,
            ClassPosition {
                semester,
                index: existing.len() + offset,
            },
        );
    }
    cluster.iter().all(|class| {
        catalog
            .requirements_of(class)
            .map_or(true, |requirements| evaluate(requirements, &context, semester))
    })
}
