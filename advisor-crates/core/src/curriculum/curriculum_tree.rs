use std::collections::BTreeMap;

use log::debug;

use super::block::Block;
use super::block::BlockId;
use super::block::Combination;
use super::block::Leaf;
use super::curriculum_error::CurriculumError;
use super::filler::Filler;
use super::filler::FillerEntry;
use super::filler::FillerId;
use super::multiplicity::Multiplicity;
use super::multiplicity::MultiplicityClass;
use crate::advisor_assert_simple;
use crate::catalog::CourseCatalog;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::plan::PseudoCourse;

/// A validated curriculum tree with frozen capacities.
///
/// Blocks live in an arena and are addressed by [`BlockId`]. Capacities are resolved once, when
/// the curriculum is built: a combination without an explicit capacity requires the sum of the
/// capacities of its children.
#[derive(Debug, Clone)]
pub struct Curriculum {
    blocks: KeyedVec<BlockId, Block>,
    caps: KeyedVec<BlockId, u32>,
    parents: KeyedVec<BlockId, Option<BlockId>>,
    superblocks: KeyedVec<BlockId, String>,
    /// Every block, parents before their children.
    pre_order: Vec<BlockId>,
    root: BlockId,
    fillers: KeyedVec<FillerId, FillerEntry>,
    multiplicity: HashMap<String, Multiplicity>,
    layers: Vec<String>,
}

impl Curriculum {
    pub fn root(&self) -> BlockId {
        self.root
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    /// The frozen capacity of a block.
    pub fn cap(&self, id: BlockId) -> u32 {
        self.caps[id]
    }

    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.parents[id]
    }

    /// The code of the top-level block that `id` belongs to.
    pub fn superblock(&self, id: BlockId) -> &str {
        &self.superblocks[id]
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates over all blocks, parents before their children.
    pub fn pre_order(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.pre_order.iter().copied()
    }

    /// Iterates over all blocks, children before their parents.
    pub fn post_order(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.pre_order.iter().rev().copied()
    }

    pub fn leaves(&self) -> impl Iterator<Item = (BlockId, &Leaf)> + '_ {
        self.pre_order
            .iter()
            .filter_map(|&id| self.blocks[id].as_leaf().map(|leaf| (id, leaf)))
    }

    /// The distinct leaf layers, in tree order.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// The fillers of the curriculum, sorted by recommendation order.
    pub fn fillers(&self) -> impl Iterator<Item = (FillerId, &FillerEntry)> + '_ {
        self.fillers.iter_with_keys()
    }

    pub fn filler(&self, id: FillerId) -> &FillerEntry {
        &self.fillers[id]
    }

    /// The multiplicity class of `class`: classes with the same key share one credit bound.
    ///
    /// Without configuration a course counts once, while every unresolved equivalence stands for
    /// a distinct course and is only bounded by its own credits.
    pub(crate) fn multiplicity_class(
        &self,
        class: &PseudoCourse,
        catalog: &CourseCatalog,
    ) -> MultiplicityClass {
        let code = class.code();
        if let Some(multiplicity) = self.multiplicity.get(code) {
            return MultiplicityClass {
                key: Some(multiplicity.group_key()),
                credits: multiplicity.credits,
            };
        }
        let credits = Some(catalog.credits_of(class).unwrap_or(0));
        match class {
            PseudoCourse::Concrete(_) => MultiplicityClass {
                key: Some(code.to_owned()),
                credits,
            },
            PseudoCourse::Equivalence(_) => MultiplicityClass { key: None, credits },
        }
    }
}

/// Assembles and validates a [`Curriculum`].
///
/// # Example
/// ```
/// # use advisor_core::catalog::CourseCatalog;
/// # use advisor_core::catalog::CourseInfo;
/// # use advisor_core::curriculum::Combination;
/// # use advisor_core::curriculum::CurriculumBuilder;
/// # use advisor_core::curriculum::Leaf;
/// let catalog = CourseCatalog::new([CourseInfo::new("MAT1610", 10)], []);
///
/// let mut builder = CurriculumBuilder::default();
/// let calculus = builder.add_leaf(Leaf::new("calculus", 10, ["MAT1610"]));
/// let root = builder.add_combination(Combination::new("root", None, vec![calculus]));
/// builder.set_root(root);
///
/// let curriculum = builder.build(&catalog).expect("valid curriculum");
/// assert_eq!(curriculum.cap(root), 10);
/// ```
#[derive(Debug, Default)]
pub struct CurriculumBuilder {
    blocks: KeyedVec<BlockId, Block>,
    root: Option<BlockId>,
    fillers: BTreeMap<String, Vec<Filler>>,
    multiplicity: HashMap<String, Multiplicity>,
}

impl CurriculumBuilder {
    pub fn add_leaf(&mut self, leaf: Leaf) -> BlockId {
        self.blocks.push(Block::Leaf(leaf))
    }

    pub fn add_combination(&mut self, combination: Combination) -> BlockId {
        self.blocks.push(Block::Combination(combination))
    }

    pub fn set_root(&mut self, root: BlockId) {
        self.root = Some(root);
    }

    /// Registers a recommendation for blocks that accept `code`.
    pub fn add_filler(&mut self, code: impl Into<String>, filler: Filler) {
        self.fillers.entry(code.into()).or_default().push(filler);
    }

    pub fn set_multiplicity(&mut self, code: impl Into<String>, multiplicity: Multiplicity) {
        let _ = self.multiplicity.insert(code.into(), multiplicity);
    }

    /// Validates the tree against `catalog` and freezes the capacities.
    pub fn build(self, catalog: &CourseCatalog) -> Result<Curriculum, CurriculumError> {
        let root = self.root.ok_or(CurriculumError::MissingRoot)?;
        let root_block = self
            .blocks
            .get(root)
            .ok_or(CurriculumError::MissingRoot)?;
        if let Block::Leaf(leaf) = root_block {
            return Err(CurriculumError::RootIsLeaf(leaf.code.clone()));
        }

        for block in self.blocks.iter() {
            for child in block.children() {
                if child.index() >= self.blocks.len() {
                    return Err(CurriculumError::DanglingBlock {
                        parent: block.code().to_owned(),
                        child: child.index(),
                    });
                }
            }
        }

        let mut parents = KeyedVec::filled(self.blocks.len(), None);
        let mut visited = KeyedVec::filled(self.blocks.len(), false);
        let mut pre_order = Vec::with_capacity(self.blocks.len());
        let mut stack = vec![root];
        visited[root] = true;
        while let Some(id) = stack.pop() {
            pre_order.push(id);
            for &child in self.blocks[id].children().iter().rev() {
                if visited[child] {
                    return Err(CurriculumError::SharedBlock(
                        self.blocks[child].code().to_owned(),
                    ));
                }
                visited[child] = true;
                parents[child] = Some(id);
                stack.push(child);
            }
        }
        if let Some((id, _)) = visited.iter_with_keys().find(|(_, seen)| !**seen) {
            return Err(CurriculumError::UnreachableBlock(
                self.blocks[id].code().to_owned(),
            ));
        }

        for (_, block) in self.blocks.iter_with_keys() {
            let Block::Leaf(leaf) = block else {
                continue;
            };
            if leaf.codes.is_empty() {
                return Err(CurriculumError::EmptyLeaf(leaf.code.clone()));
            }
            let mut codes = leaf.codes.iter().collect::<Vec<_>>();
            codes.sort();
            for code in codes {
                if catalog.course(code).is_none() && catalog.equivalence(code).is_none() {
                    return Err(CurriculumError::DanglingCourse {
                        block: leaf.code.clone(),
                        code: code.clone(),
                    });
                }
            }
        }

        let mut caps = KeyedVec::filled(self.blocks.len(), 0_u32);
        for &id in pre_order.iter().rev() {
            caps[id] = match &self.blocks[id] {
                Block::Leaf(leaf) => leaf.cap,
                Block::Combination(Combination { cap: Some(cap), .. }) => *cap,
                Block::Combination(combination) => {
                    combination.children.iter().map(|&child| caps[child]).sum()
                }
            };
        }

        let mut superblocks = KeyedVec::filled(self.blocks.len(), String::new());
        for &id in &pre_order {
            superblocks[id] = match parents[id] {
                Some(parent) if parent != root => superblocks[parent].clone(),
                _ => self.blocks[id].code().to_owned(),
            };
        }

        let mut configured = self.multiplicity.iter().collect::<Vec<_>>();
        configured.sort_by(|(left, _), (right, _)| left.cmp(right));
        let mut group_credits: HashMap<String, Option<u32>> = HashMap::default();
        for &(code, multiplicity) in &configured {
            if multiplicity.group.is_empty() {
                return Err(CurriculumError::EmptyMultiplicityGroup(code.clone()));
            }
            let credits = *group_credits
                .entry(multiplicity.group_key())
                .or_insert(multiplicity.credits);
            if credits != multiplicity.credits {
                return Err(CurriculumError::ConflictingMultiplicity {
                    code: code.clone(),
                    group: multiplicity.group_key(),
                });
            }
        }
        // Members of a group without their own configuration are bound by the group.
        let mut multiplicity = self.multiplicity.clone();
        for (_, grouped) in configured {
            for member in &grouped.group {
                if !multiplicity.contains_key(member) {
                    let _ = multiplicity.insert(member.clone(), grouped.clone());
                }
            }
        }

        let fillers = validated_fillers(self.fillers, catalog)?;

        let mut layers: Vec<String> = Vec::new();
        for &id in &pre_order {
            if let Block::Leaf(leaf) = &self.blocks[id] {
                if !layers.contains(&leaf.layer) {
                    layers.push(leaf.layer.clone());
                }
            }
        }

        advisor_assert_simple!(pre_order.len() == self.blocks.len());
        debug!(
            "Built curriculum with {} blocks, {} fillers and {} layers",
            self.blocks.len(),
            fillers.len(),
            layers.len()
        );

        Ok(Curriculum {
            blocks: self.blocks,
            caps,
            parents,
            superblocks,
            pre_order,
            root,
            fillers,
            multiplicity,
            layers,
        })
    }
}

/// Checks every filler against the catalog and sorts them by order, then by code and position.
fn validated_fillers(
    fillers: BTreeMap<String, Vec<Filler>>,
    catalog: &CourseCatalog,
) -> Result<KeyedVec<FillerId, FillerEntry>, CurriculumError> {
    let mut entries = Vec::new();
    for (code, list) in fillers {
        for filler in list {
            match &filler.course {
                PseudoCourse::Concrete(concrete) => {
                    if catalog.course(&concrete.code).is_none() {
                        return Err(CurriculumError::UnknownFillerCourse {
                            code,
                            course: concrete.code.clone(),
                        });
                    }
                }
                PseudoCourse::Equivalence(equivalence) => {
                    match catalog.equivalence(&equivalence.code) {
                        None => {
                            return Err(CurriculumError::UnknownFillerCourse {
                                code,
                                course: equivalence.code.clone(),
                            })
                        }
                        Some(info) if info.courses.is_empty() => {
                            return Err(CurriculumError::EmptyEquivalence(info.code.clone()))
                        }
                        Some(_) => {}
                    }
                }
            }
            entries.push(FillerEntry {
                code: code.clone(),
                filler,
            });
        }
    }
    entries.sort_by_key(|entry| entry.filler.order);

    let mut sorted = KeyedVec::default();
    for entry in entries {
        let _ = sorted.push(entry);
    }
    Ok(sorted)
}
