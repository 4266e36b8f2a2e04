use super::curriculum_solver::SolveMode;
use crate::containers::KeyedVec;
use crate::curriculum::BlockId;
use crate::curriculum::FillerId;
use crate::flow::FlowSummary;
use crate::plan::PseudoCourse;
use crate::requirements::ClassPosition;

crate::storage_key!(
    /// Addresses a [`ClassInstance`] of a [`SolvedCurriculum`].
    pub InstanceId
);

/// Where a class that entered the solve comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceOrigin {
    /// A class of the plan.
    Taken(ClassPosition),
    /// A copy of a curriculum filler, only present in [`SolveMode::WithFillers`].
    Filler(FillerId),
}

/// One class that can contribute credits to the curriculum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInstance {
    pub class: PseudoCourse,
    pub credits: u32,
    pub origin: InstanceOrigin,
}

impl ClassInstance {
    pub fn is_filler(&self) -> bool {
        matches!(self.origin, InstanceOrigin::Filler(_))
    }
}

/// The capacity of a block and the credits that were routed into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockFlow {
    pub cap: u32,
    pub flow: u32,
}

impl BlockFlow {
    pub fn is_satisfied(&self) -> bool {
        self.flow >= self.cap
    }

    pub fn missing(&self) -> u32 {
        self.cap.saturating_sub(self.flow)
    }
}

/// Credits of one class instance counted towards one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub instance: InstanceId,
    pub leaf: BlockId,
    pub credits: u32,
}

/// The outcome of assigning classes to a curriculum.
///
/// Mirrors the block tree of the curriculum, annotating every block with its achieved flow. It is
/// rebuilt for every solve and never stored.
#[derive(Debug, Clone)]
pub struct SolvedCurriculum {
    pub(crate) mode: SolveMode,
    pub(crate) root: BlockId,
    pub(crate) blocks: KeyedVec<BlockId, BlockFlow>,
    pub(crate) instances: KeyedVec<InstanceId, ClassInstance>,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) summary: FlowSummary,
}

impl SolvedCurriculum {
    pub fn mode(&self) -> SolveMode {
        self.mode
    }

    pub fn block(&self, block: BlockId) -> BlockFlow {
        self.blocks[block]
    }

    pub fn is_satisfied(&self, block: BlockId) -> bool {
        self.blocks[block].is_satisfied()
    }

    /// Whether the curriculum as a whole is fulfilled.
    pub fn is_complete(&self) -> bool {
        self.is_satisfied(self.root)
    }

    pub fn root_flow(&self) -> BlockFlow {
        self.blocks[self.root]
    }

    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &ClassInstance)> + '_ {
        self.instances.iter_with_keys()
    }

    pub fn instance(&self, instance: InstanceId) -> &ClassInstance {
        &self.instances[instance]
    }

    /// Every non-empty assignment, in the order the network was built.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assignments_of(&self, instance: InstanceId) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.instance == instance)
    }

    pub fn assigned_credits(&self, instance: InstanceId) -> u32 {
        self.assignments_of(instance)
            .map(|assignment| assignment.credits)
            .sum()
    }

    /// The leaf receiving most of the credits of `instance`, the first such leaf on ties.
    pub fn main_leaf(&self, instance: InstanceId) -> Option<BlockId> {
        let mut best: Option<&Assignment> = None;
        for assignment in self.assignments_of(instance) {
            if best.map_or(true, |best| assignment.credits > best.credits) {
                best = Some(assignment);
            }
        }
        best.map(|assignment| assignment.leaf)
    }

    /// The filler instances that received flow, in filler order.
    pub fn used_fillers(&self) -> impl Iterator<Item = (InstanceId, &ClassInstance)> + '_ {
        self.instances()
            .filter(move |(id, instance)| instance.is_filler() && self.assigned_credits(*id) > 0)
    }

    pub fn summary(&self) -> FlowSummary {
        self.summary
    }
}
