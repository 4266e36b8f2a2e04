use std::fmt::Write;

use super::solved_curriculum::SolvedCurriculum;
use crate::containers::StorageKey;
use crate::curriculum::Curriculum;

impl SolvedCurriculum {
    /// Renders the blocks of `curriculum` as a Graphviz digraph, labelled with `flow/cap`.
    ///
    /// Satisfied blocks are drawn in green and unsatisfied ones in red. Classes are listed under
    /// the leaves they were assigned to.
    pub fn to_dot(&self, curriculum: &Curriculum) -> String {
        let mut out = String::new();
        out.push_str("digraph curriculum {\n");
        out.push_str("    rankdir=BT;\n");
        out.push_str("    node [shape=box, style=rounded, fontsize=10];\n");

        for block in curriculum.pre_order() {
            let flow = self.block(block);
            let color = if flow.is_satisfied() {
                "#006600"
            } else {
                "#aa0000"
            };
            let _ = writeln!(
                out,
                "    b{} [label=\"{}\\n{}/{}\", color=\"{color}\"];",
                block.index(),
                escape(curriculum.block(block).display_name()),
                flow.flow,
                flow.cap,
            );
            if let Some(parent) = curriculum.parent(block) {
                let _ = writeln!(out, "    b{} -> b{};", block.index(), parent.index());
            }
        }

        for (index, assignment) in self.assignments().iter().enumerate() {
            let instance = self.instance(assignment.instance);
            let shape = if instance.is_filler() {
                "note"
            } else {
                "ellipse"
            };
            let _ = writeln!(
                out,
                "    c{index} [label=\"{}\", shape={shape}];",
                escape(&instance.class.to_string())
            );
            let _ = writeln!(
                out,
                "    c{index} -> b{} [label=\"{}\"];",
                assignment.leaf.index(),
                assignment.credits
            );
        }

        out.push_str("}\n");
        out
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use crate::catalog::CourseCatalog;
    use crate::catalog::CourseInfo;
    use crate::curriculum::Combination;
    use crate::curriculum::CurriculumBuilder;
    use crate::curriculum::Leaf;
    use crate::plan::CurriculumSpec;
    use crate::plan::Plan;
    use crate::plan::PseudoCourse;
    use crate::solver::solve_curriculum;
    use crate::solver::SolveMode;

    #[test]
    fn dot_output_labels_blocks_with_their_flow() {
        let catalog = CourseCatalog::new([CourseInfo::new("A", 10)], []);
        let mut builder = CurriculumBuilder::default();
        let a = builder.add_leaf(Leaf::new("a", 10, ["A"]).named("Calculus \"I\""));
        let root = builder.add_combination(Combination::new("root", None, vec![a]));
        builder.set_root(root);
        let curriculum = builder.build(&catalog).expect("valid");
        let mut plan = Plan::new(CurriculumSpec::default());
        plan.classes = vec![vec![PseudoCourse::concrete("A")]];

        let dot = solve_curriculum(&curriculum, &catalog, &plan, SolveMode::TakenOnly)
            .to_dot(&curriculum);

        assert!(dot.starts_with("digraph curriculum {"));
        assert!(dot.contains("Calculus \\\"I\\\"\\n10/10"));
        assert!(dot.contains("c0 [label=\"A\", shape=ellipse];"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
