//! Assigns the classes of a plan to the blocks of a curriculum by solving a min-cost maximum flow.
//!
//! The network has the following shape, built separately for every layer:
//!
//! ```text
//! source -> multiplicity group -> class instance -> accepting leaf -> ... -> root -> sink
//! ```
//!
//! A group edge carries the credit bound shared by the classes of that group, an instance edge
//! carries the credits of one class, and every block sends its flow to its parent through an edge
//! with the capacity of the block. A block with capacity zero still accepts one unit, which leaves
//! through a costly edge straight to the sink so that it is never counted by the ancestors of the
//! block. The reported flow is clamped back to the nominal capacity.
use log::debug;

use super::solved_curriculum::Assignment;
use super::solved_curriculum::BlockFlow;
use super::solved_curriculum::ClassInstance;
use super::solved_curriculum::InstanceId;
use super::solved_curriculum::InstanceOrigin;
use super::solved_curriculum::SolvedCurriculum;
use crate::advisor_assert_simple;
use crate::catalog::CourseCatalog;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::curriculum::BlockId;
use crate::curriculum::Curriculum;
use crate::curriculum::FillerEntry;
use crate::curriculum::Leaf;
use crate::flow::EdgeId;
use crate::flow::FlowGraph;
use crate::flow::VertexId;
use crate::plan::Plan;
use crate::plan::PseudoCourse;
use crate::requirements::ClassPosition;

/// Added to the cost of every filler assignment, so that classes of the plan are always used
/// before any recommendation.
pub const FILLER_BASE_COST: i64 = 1000;

/// Added when a class is accepted by a leaf only through its equivalence, so that leaves naming
/// the course directly are preferred.
pub const EQUIVALENCE_COST: i64 = 1;

/// The cost of the unit absorbed by a block with capacity zero. It outweighs every other path, so
/// absorbed units never replace credits that count towards the curriculum.
pub const ZERO_CAPACITY_COST: i64 = 1_000_000_000;

/// Which classes take part in a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveMode {
    /// Only the classes of the plan; used to decide which blocks are fulfilled.
    TakenOnly,
    /// The classes of the plan plus copies of the curriculum fillers; the fillers that receive
    /// flow are the recommendations for the unfulfilled blocks.
    WithFillers,
}

/// Assigns the classes of `plan` to the blocks of `curriculum`.
///
/// The result maximises the credits counted towards the root and, among all such assignments,
/// minimises the total leaf and filler cost.
pub fn solve_curriculum(
    curriculum: &Curriculum,
    catalog: &CourseCatalog,
    plan: &Plan,
    mode: SolveMode,
) -> SolvedCurriculum {
    let instances = collect_instances(curriculum, catalog, plan, mode);
    let mut network = Network::new(curriculum);

    for layer in curriculum.layers() {
        network.add_layer(curriculum, catalog, &instances, layer);
    }
    network.add_block_edges(curriculum);

    let summary = network
        .graph
        .min_cost_max_flow(network.source, network.sink);

    let root_edge = network.block_edges[curriculum.root()];
    advisor_assert_simple!(
        network.graph.edge(root_edge).flow <= i64::from(curriculum.cap(curriculum.root())),
        "the sink cannot receive more than the root capacity"
    );

    let mut blocks = KeyedVec::filled(curriculum.num_blocks(), BlockFlow::default());
    for block in curriculum.pre_order() {
        let cap = curriculum.cap(block);
        let flow = network.graph.edge(network.block_edges[block]).flow;
        blocks[block] = BlockFlow {
            cap,
            flow: clamp_flow(flow, cap),
        };
    }

    let assignments = network
        .leaf_edges
        .iter()
        .filter_map(|&(edge, instance, leaf)| {
            let flow = network.graph.edge(edge).flow;
            (flow > 0).then(|| Assignment {
                instance,
                leaf,
                credits: clamp_flow(flow, u32::MAX),
            })
        })
        .collect::<Vec<_>>();

    debug!(
        "Solved curriculum ({mode:?}): root {}/{} with {} instances, {} augmenting paths",
        blocks[curriculum.root()].flow,
        blocks[curriculum.root()].cap,
        instances.len(),
        summary.augmenting_paths
    );

    SolvedCurriculum {
        mode,
        root: curriculum.root(),
        blocks,
        instances,
        assignments,
        summary,
    }
}

fn clamp_flow(flow: i64, cap: u32) -> u32 {
    u32::try_from(flow.max(0)).map_or(cap, |flow| flow.min(cap))
}

/// Zero capacities are widened to one unit on the edges into a block.
fn internal_cap(cap: u32) -> i64 {
    i64::from(cap.max(1))
}

fn collect_instances(
    curriculum: &Curriculum,
    catalog: &CourseCatalog,
    plan: &Plan,
    mode: SolveMode,
) -> KeyedVec<InstanceId, ClassInstance> {
    let mut instances = KeyedVec::default();
    for (semester, index, class) in plan.iter_classes() {
        let _ = instances.push(ClassInstance {
            class: class.clone(),
            credits: catalog.credits_of(class).unwrap_or(0),
            origin: InstanceOrigin::Taken(ClassPosition { semester, index }),
        });
    }

    if mode == SolveMode::WithFillers {
        for (filler_id, entry) in curriculum.fillers() {
            let credits = catalog.credits_of(&entry.filler.course).unwrap_or(0);
            if credits == 0 {
                continue;
            }
            for _ in 0..filler_copies(curriculum, catalog, entry, credits) {
                let _ = instances.push(ClassInstance {
                    class: entry.filler.course.clone(),
                    credits,
                    origin: InstanceOrigin::Filler(filler_id),
                });
            }
        }
    }

    instances
}

/// How many copies of a filler could be useful: enough to fill the largest layer of leaves that
/// accept it, but no more than its multiplicity allows.
fn filler_copies(
    curriculum: &Curriculum,
    catalog: &CourseCatalog,
    entry: &FillerEntry,
    credits: u32,
) -> u32 {
    let course = &entry.filler.course;
    let demand = curriculum
        .layers()
        .iter()
        .map(|layer| {
            curriculum
                .leaves()
                .filter(|(_, leaf)| &leaf.layer == layer && accepts(leaf, course))
                .map(|(id, _)| curriculum.cap(id))
                .sum::<u32>()
        })
        .max()
        .unwrap_or(0);
    let multiplicity = curriculum.multiplicity_class(course, catalog);
    let bound = match (multiplicity.key, multiplicity.credits) {
        (Some(_), Some(credits)) => demand.min(credits),
        _ => demand,
    };
    bound.div_ceil(credits).max(1)
}

fn accepts(leaf: &Leaf, class: &PseudoCourse) -> bool {
    leaf.accepts(class.code()) || class.equivalence_code().is_some_and(|code| leaf.accepts(code))
}

struct Network {
    graph: FlowGraph,
    source: VertexId,
    sink: VertexId,
    block_vertices: KeyedVec<BlockId, VertexId>,
    block_edges: KeyedVec<BlockId, EdgeId>,
    leaf_edges: Vec<(EdgeId, InstanceId, BlockId)>,
}

/// The classes of one layer that share a credit bound.
struct Group {
    credits: Option<u32>,
    members: Vec<(InstanceId, Vec<BlockId>)>,
}

impl Network {
    fn new(curriculum: &Curriculum) -> Network {
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let sink = graph.add_vertex();
        let mut block_vertices = KeyedVec::filled(curriculum.num_blocks(), source);
        for block in curriculum.pre_order() {
            block_vertices[block] = graph.add_vertex();
        }
        Network {
            graph,
            source,
            sink,
            block_vertices,
            block_edges: KeyedVec::default(),
            leaf_edges: Vec::new(),
        }
    }

    fn add_layer(
        &mut self,
        curriculum: &Curriculum,
        catalog: &CourseCatalog,
        instances: &KeyedVec<InstanceId, ClassInstance>,
        layer: &str,
    ) {
        let leaves = curriculum
            .leaves()
            .filter(|(_, leaf)| leaf.layer == layer)
            .collect::<Vec<_>>();

        let mut groups: Vec<Group> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::default();
        for (id, instance) in instances.iter_with_keys() {
            if instance.credits == 0 {
                continue;
            }
            let accepting = leaves
                .iter()
                .filter(|(_, leaf)| accepts(leaf, &instance.class))
                .map(|(leaf_id, _)| *leaf_id)
                .collect::<Vec<_>>();
            if accepting.is_empty() {
                continue;
            }

            let multiplicity = curriculum.multiplicity_class(&instance.class, catalog);
            let existing = multiplicity
                .key
                .as_ref()
                .and_then(|key| group_index.get(key).copied());
            let index = match existing {
                Some(index) => index,
                None => {
                    if let Some(key) = multiplicity.key {
                        let _ = group_index.insert(key, groups.len());
                    }
                    groups.push(Group {
                        credits: multiplicity.credits,
                        members: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            groups[index].members.push((id, accepting));
        }

        for group in groups {
            let group_vertex = self.graph.add_vertex();
            let total = group
                .members
                .iter()
                .map(|(id, _)| instances[*id].credits)
                .sum::<u32>();
            let group_cap = group.credits.unwrap_or(total);
            let _ = self
                .graph
                .add_edge(self.source, group_vertex, i64::from(group_cap), 0);

            for (id, accepting) in group.members {
                let instance = &instances[id];
                let instance_vertex = self.graph.add_vertex();
                let _ = self.graph.add_edge(
                    group_vertex,
                    instance_vertex,
                    i64::from(instance.credits),
                    0,
                );

                let filler_cost = match instance.origin {
                    InstanceOrigin::Filler(filler) => {
                        FILLER_BASE_COST + curriculum.filler(filler).filler.cost_offset
                    }
                    InstanceOrigin::Taken(_) => 0,
                };
                for leaf_id in accepting {
                    let Some(leaf) = curriculum.block(leaf_id).as_leaf() else {
                        continue;
                    };
                    let equivalence_cost = if leaf.accepts(instance.class.code()) {
                        0
                    } else {
                        EQUIVALENCE_COST
                    };
                    let edge = self.graph.add_edge(
                        instance_vertex,
                        self.block_vertices[leaf_id],
                        internal_cap(leaf.cap),
                        leaf.cost + equivalence_cost + filler_cost,
                    );
                    self.leaf_edges.push((edge, id, leaf_id));
                }
            }
        }
    }

    fn add_block_edges(&mut self, curriculum: &Curriculum) {
        let mut block_edges = Vec::with_capacity(curriculum.num_blocks());
        for block in curriculum.pre_order() {
            let target = match curriculum.parent(block) {
                Some(parent) => self.block_vertices[parent],
                None => self.sink,
            };
            let cap = curriculum.cap(block);
            let edge = self
                .graph
                .add_edge(self.block_vertices[block], target, i64::from(cap), 0);
            if cap == 0 {
                let _ = self.graph.add_edge(
                    self.block_vertices[block],
                    self.sink,
                    1,
                    ZERO_CAPACITY_COST,
                );
            }
            block_edges.push((block, edge));
        }

        block_edges.sort_by_key(|(block, _)| *block);
        for (_, edge) in block_edges {
            let _ = self.block_edges.push(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CourseInfo;
    use crate::catalog::EquivalenceInfo;
    use crate::curriculum::Combination;
    use crate::curriculum::CurriculumBuilder;
    use crate::curriculum::Filler;
    use crate::curriculum::Multiplicity;
    use crate::plan::CurriculumSpec;

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(
            [
                CourseInfo::new("A", 10),
                CourseInfo::new("B", 10),
                CourseInfo::new("C", 10),
                CourseInfo::new("R", 5),
                CourseInfo::new("N", 9),
            ],
            [EquivalenceInfo::new("ELECTIVE", false, ["B", "C"])],
        )
    }

    fn plan(semesters: Vec<Vec<PseudoCourse>>) -> Plan {
        let mut plan = Plan::new(CurriculumSpec::default());
        plan.classes = semesters;
        plan
    }

    #[test]
    fn taken_courses_fill_their_leaves() {
        let mut builder = CurriculumBuilder::default();
        let a = builder.add_leaf(Leaf::new("a", 10, ["A"]));
        let b = builder.add_leaf(Leaf::new("b", 10, ["B"]));
        let root = builder.add_combination(Combination::new("root", None, vec![a, b]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![PseudoCourse::concrete("A")]]),
            SolveMode::TakenOnly,
        );

        assert!(solved.is_satisfied(a));
        assert!(!solved.is_satisfied(b));
        assert_eq!(solved.root_flow(), BlockFlow { cap: 20, flow: 10 });
    }

    #[test]
    fn a_course_counts_once_across_leaves_of_a_layer() {
        let mut builder = CurriculumBuilder::default();
        let first = builder.add_leaf(Leaf::new("first", 10, ["A"]));
        let second = builder.add_leaf(Leaf::new("second", 10, ["A"]));
        let root = builder.add_combination(Combination::new("root", None, vec![first, second]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![
                vec![PseudoCourse::concrete("A")],
                vec![PseudoCourse::concrete("A")],
            ]),
            SolveMode::TakenOnly,
        );

        assert_eq!(solved.root_flow().flow, 10);
        assert!(solved.is_satisfied(first));
        assert!(!solved.is_satisfied(second));
    }

    #[test]
    fn layers_do_not_compete_for_a_course() {
        let mut builder = CurriculumBuilder::default();
        let major = builder.add_leaf(Leaf::new("major", 10, ["A"]));
        let track = builder.add_leaf(Leaf::new("track", 10, ["A"]).in_layer("track"));
        let root = builder.add_combination(Combination::new("root", None, vec![major, track]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![PseudoCourse::concrete("A")]]),
            SolveMode::TakenOnly,
        );

        assert!(solved.is_satisfied(major));
        assert!(solved.is_satisfied(track));
        assert!(solved.is_complete());
    }

    #[test]
    fn repeatable_courses_are_bounded_by_their_multiplicity() {
        let mut builder = CurriculumBuilder::default();
        let sports = builder.add_leaf(Leaf::new("sports", 20, ["R"]));
        let root = builder.add_combination(Combination::new("root", None, vec![sports]));
        builder.set_root(root);
        builder.set_multiplicity("R", Multiplicity::new(["R"], Some(10)));
        let curriculum = builder.build(&catalog()).expect("valid");

        for times in 2..5 {
            let solved = solve_curriculum(
                &curriculum,
                &catalog(),
                &plan(vec![vec![PseudoCourse::concrete("R")]; times]),
                SolveMode::TakenOnly,
            );
            assert_eq!(solved.block(sports).flow, 10);
        }
    }

    #[test]
    fn sink_flow_never_exceeds_the_root_capacity() {
        let mut builder = CurriculumBuilder::default();
        let any = builder.add_leaf(Leaf::new("any", 30, ["A", "B", "C"]));
        let root = builder.add_combination(Combination::new("root", Some(20), vec![any]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![
                PseudoCourse::concrete("A"),
                PseudoCourse::concrete("B"),
                PseudoCourse::concrete("C"),
            ]]),
            SolveMode::TakenOnly,
        );

        assert_eq!(solved.summary().flow, 20);
        assert_eq!(solved.root_flow(), BlockFlow { cap: 20, flow: 20 });
    }

    #[test]
    fn zero_capacity_blocks_report_clamped_flow() {
        let mut builder = CurriculumBuilder::default();
        let empty = builder.add_leaf(Leaf::new("empty", 0, ["A"]));
        let root = builder.add_combination(Combination::new("root", Some(0), vec![empty]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![PseudoCourse::concrete("A")]]),
            SolveMode::TakenOnly,
        );

        assert_eq!(solved.block(empty), BlockFlow { cap: 0, flow: 0 });
        assert!(solved.is_complete());
    }

    #[test]
    fn zero_capacity_blocks_do_not_count_towards_their_parent() {
        let mut builder = CurriculumBuilder::default();
        let short = builder.add_leaf(Leaf::new("short", 10, ["N"]));
        let empty = builder.add_leaf(Leaf::new("empty", 0, ["B"]));
        let root = builder.add_combination(Combination::new("root", None, vec![short, empty]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![
                PseudoCourse::concrete("N"),
                PseudoCourse::concrete("B"),
            ]]),
            SolveMode::TakenOnly,
        );

        assert_eq!(solved.block(short), BlockFlow { cap: 10, flow: 9 });
        assert_eq!(solved.block(empty), BlockFlow { cap: 0, flow: 0 });
        assert_eq!(solved.root_flow(), BlockFlow { cap: 10, flow: 9 });
        assert!(!solved.is_complete());
    }

    #[test]
    fn zero_capacity_blocks_never_take_credits_from_other_leaves() {
        let mut builder = CurriculumBuilder::default();
        let a = builder.add_leaf(Leaf::new("a", 10, ["A"]));
        let empty = builder.add_leaf(Leaf::new("empty", 0, ["A"]));
        let root = builder.add_combination(Combination::new("root", None, vec![empty, a]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![PseudoCourse::concrete("A")]]),
            SolveMode::TakenOnly,
        );

        assert!(solved.is_satisfied(a));
        assert!(solved.is_complete());
    }

    #[test]
    fn courses_configured_outside_their_group_share_its_bound() {
        let mut builder = CurriculumBuilder::default();
        let any = builder.add_leaf(Leaf::new("any", 20, ["A", "B"]));
        let root = builder.add_combination(Combination::new("root", None, vec![any]));
        builder.set_root(root);
        builder.set_multiplicity("A", Multiplicity::new(["B"], Some(10)));
        builder.set_multiplicity("B", Multiplicity::new(["B"], Some(10)));
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![
                PseudoCourse::concrete("A"),
                PseudoCourse::concrete("B"),
            ]]),
            SolveMode::TakenOnly,
        );

        assert_eq!(solved.block(any), BlockFlow { cap: 20, flow: 10 });
    }

    #[test]
    fn fillers_complete_the_curriculum_after_taken_courses() {
        let mut builder = CurriculumBuilder::default();
        let a = builder.add_leaf(Leaf::new("a", 10, ["A"]));
        let electives = builder.add_leaf(Leaf::new("electives", 20, ["ELECTIVE"]));
        let root = builder.add_combination(Combination::new("root", None, vec![a, electives]));
        builder.set_root(root);
        builder.add_filler("A", Filler::new(PseudoCourse::concrete("A"), 0));
        builder.add_filler(
            "ELECTIVE",
            Filler::new(PseudoCourse::equivalence("ELECTIVE", 10), 1),
        );
        let curriculum = builder.build(&catalog()).expect("valid");

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![PseudoCourse::concrete("A")]]),
            SolveMode::WithFillers,
        );

        assert!(solved.is_complete());
        let recommended = solved
            .used_fillers()
            .map(|(_, instance)| instance.class.code().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(recommended, vec!["ELECTIVE", "ELECTIVE"]);
    }

    #[test]
    fn courses_chosen_for_an_equivalence_fill_its_leaf() {
        let mut builder = CurriculumBuilder::default();
        let electives = builder.add_leaf(Leaf::new("electives", 10, ["ELECTIVE"]));
        let root = builder.add_combination(Combination::new("root", None, vec![electives]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog()).expect("valid");

        let mut chosen = PseudoCourse::concrete("B");
        if let PseudoCourse::Concrete(concrete) = &mut chosen {
            concrete.equivalence = Some(crate::plan::EquivalenceId {
                code: "ELECTIVE".to_owned(),
                credits: 10,
            });
        }

        let solved = solve_curriculum(
            &curriculum,
            &catalog(),
            &plan(vec![vec![chosen]]),
            SolveMode::TakenOnly,
        );

        assert!(solved.is_complete());
    }
}
