use log::debug;

use super::curriculum_solver::solve_curriculum;
use super::curriculum_solver::SolveMode;
use super::solved_curriculum::InstanceOrigin;
use super::solved_curriculum::SolvedCurriculum;
use crate::catalog::CourseCatalog;
use crate::curriculum::Block;
use crate::curriculum::BlockId;
use crate::curriculum::Curriculum;
use crate::plan::Plan;
use crate::plan::PseudoCourse;
use crate::plan::StudentContext;
use crate::requirements::ClassPosition;

/// A curriculum block that is not fulfilled by the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmetBlock {
    pub block: BlockId,
    pub code: String,
    pub name: String,
    pub superblock: String,
    pub missing_credits: u32,
    /// The fillers which would complete the block, in recommendation order.
    pub recommended: Vec<PseudoCourse>,
}

/// A class of the plan that counts towards no block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignedClass {
    pub position: ClassPosition,
    pub code: String,
    pub credits: u32,
    /// Whether the class lies in a semester the student has already passed, or is a course the
    /// student has officially passed.
    pub passed: bool,
}

/// The curriculum-level findings about a plan.
#[derive(Debug, Clone)]
pub struct CurriculumDiagnosis {
    pub unmet_blocks: Vec<UnmetBlock>,
    /// The superblock each class of the plan counts towards, indexed like `Plan::classes`.
    pub superblocks: Vec<Vec<Option<String>>>,
    pub unassigned: Vec<UnassignedClass>,
    pub unassigned_credits: u32,
    pub solved: SolvedCurriculum,
}

impl CurriculumDiagnosis {
    pub fn is_complete(&self) -> bool {
        self.solved.is_complete()
    }

    /// Unassigned classes are only worth a warning when the student can still change them.
    pub fn should_warn_unassigned(&self) -> bool {
        self.unassigned.iter().any(|class| !class.passed)
    }
}

/// Solves the curriculum against `plan` and explains what is missing.
///
/// Unmet requirements are reported per maximal unsatisfied subtree: a combination requiring all
/// of its children is broken down into its children, every other unsatisfied block is reported
/// as a whole together with the fillers that would complete it.
pub fn diagnose_curriculum(
    curriculum: &Curriculum,
    catalog: &CourseCatalog,
    plan: &Plan,
    student: Option<&StudentContext>,
) -> CurriculumDiagnosis {
    let solved = solve_curriculum(curriculum, catalog, plan, SolveMode::TakenOnly);

    let mut unmet_blocks = Vec::new();
    if !solved.is_complete() {
        let with_fillers = solve_curriculum(curriculum, catalog, plan, SolveMode::WithFillers);
        collect_unmet(
            curriculum,
            &solved,
            &with_fillers,
            curriculum.root(),
            &mut unmet_blocks,
        );
    }

    let current_semester = student.map_or(0, |student| student.current_semester);
    let mut unassigned = Vec::new();
    for (id, instance) in solved.instances() {
        let InstanceOrigin::Taken(position) = instance.origin else {
            continue;
        };
        if instance.credits == 0 || solved.assigned_credits(id) > 0 {
            continue;
        }
        unassigned.push(UnassignedClass {
            position,
            code: instance.class.code().to_owned(),
            credits: instance.credits,
            passed: position.semester < current_semester
                || student.is_some_and(|student| student.has_passed(instance.class.code())),
        });
    }
    let unassigned_credits = unassigned.iter().map(|class| class.credits).sum();

    debug!(
        "Curriculum diagnosis: {} unmet blocks, {} unassigned credits",
        unmet_blocks.len(),
        unassigned_credits
    );

    CurriculumDiagnosis {
        unmet_blocks,
        superblocks: tag_superblocks(curriculum, &solved, plan),
        unassigned,
        unassigned_credits,
        solved,
    }
}

/// Tags every class of `plan` with the superblock of the leaf receiving most of its credits.
pub fn tag_superblocks(
    curriculum: &Curriculum,
    solved: &SolvedCurriculum,
    plan: &Plan,
) -> Vec<Vec<Option<String>>> {
    let mut tags = plan
        .classes
        .iter()
        .map(|semester| vec![None; semester.len()])
        .collect::<Vec<_>>();
    for (id, instance) in solved.instances() {
        let InstanceOrigin::Taken(position) = instance.origin else {
            continue;
        };
        let Some(tag) = tags
            .get_mut(position.semester)
            .and_then(|semester| semester.get_mut(position.index))
        else {
            continue;
        };
        *tag = solved
            .main_leaf(id)
            .map(|leaf| curriculum.superblock(leaf).to_owned());
    }
    tags
}

fn collect_unmet(
    curriculum: &Curriculum,
    solved: &SolvedCurriculum,
    with_fillers: &SolvedCurriculum,
    block: BlockId,
    unmet: &mut Vec<UnmetBlock>,
) {
    if solved.is_satisfied(block) {
        return;
    }

    if let Block::Combination(combination) = curriculum.block(block) {
        let children_cap: u32 = combination
            .children
            .iter()
            .map(|&child| curriculum.cap(child))
            .sum();
        if !combination.children.is_empty() && children_cap == curriculum.cap(block) {
            for &child in &combination.children {
                collect_unmet(curriculum, solved, with_fillers, child, unmet);
            }
            return;
        }
    }

    let flow = solved.block(block);
    unmet.push(UnmetBlock {
        block,
        code: curriculum.block(block).code().to_owned(),
        name: curriculum.block(block).display_name().to_owned(),
        superblock: curriculum.superblock(block).to_owned(),
        missing_credits: flow.missing(),
        recommended: fillers_within(curriculum, with_fillers, block),
    });
}

/// The filler classes that the filler solve routed into the subtree of `block`.
fn fillers_within(
    curriculum: &Curriculum,
    with_fillers: &SolvedCurriculum,
    block: BlockId,
) -> Vec<PseudoCourse> {
    with_fillers
        .used_fillers()
        .filter(|(id, _)| {
            with_fillers
                .assignments_of(*id)
                .any(|assignment| is_within(curriculum, assignment.leaf, block))
        })
        .map(|(_, instance)| instance.class.clone())
        .collect()
}

fn is_within(curriculum: &Curriculum, mut block: BlockId, ancestor: BlockId) -> bool {
    loop {
        if block == ancestor {
            return true;
        }
        match curriculum.parent(block) {
            Some(parent) => block = parent,
            None => return false,
        }
    }
}
