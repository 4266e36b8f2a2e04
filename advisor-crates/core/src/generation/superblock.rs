use crate::plan::Plan;

/// Superblock codes in the order their classes are presented within a semester.
pub const SUPERBLOCK_PRIORITY: [&str; 5] = [
    "PlanComun",
    "Major",
    "Minor",
    "Titulo",
    "FormacionGeneral",
];

/// The presentation rank of a superblock; unknown and missing superblocks go last.
pub fn superblock_priority(superblock: Option<&str>) -> usize {
    superblock
        .and_then(|code| SUPERBLOCK_PRIORITY.iter().position(|known| *known == code))
        .unwrap_or(SUPERBLOCK_PRIORITY.len())
}

/// Stably sorts the classes of the semesters from `first_semester` on by superblock priority.
///
/// `tags` holds the superblock of every class, indexed like `Plan::classes`.
pub(crate) fn sort_by_superblock(
    plan: &mut Plan,
    tags: &[Vec<Option<String>>],
    first_semester: usize,
) {
    for (semester, classes) in plan.classes.iter_mut().enumerate().skip(first_semester) {
        let Some(semester_tags) = tags.get(semester) else {
            continue;
        };
        let mut ranked = std::mem::take(classes)
            .into_iter()
            .enumerate()
            .map(|(index, class)| {
                let tag = semester_tags.get(index).and_then(|tag| tag.as_deref());
                (superblock_priority(tag), class)
            })
            .collect::<Vec<_>>();
        ranked.sort_by_key(|(priority, _)| *priority);
        *classes = ranked.into_iter().map(|(_, class)| class).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::CurriculumSpec;
    use crate::plan::PseudoCourse;

    #[test]
    fn classes_are_ordered_by_priority_and_keep_their_relative_order() {
        let mut plan = Plan::new(CurriculumSpec::default());
        plan.classes = vec![
            vec![PseudoCourse::concrete("H1")],
            vec![
                PseudoCourse::concrete("FG1"),
                PseudoCourse::concrete("M1"),
                PseudoCourse::concrete("X1"),
                PseudoCourse::concrete("M2"),
                PseudoCourse::concrete("PC1"),
            ],
        ];
        let tags = vec![
            vec![None],
            vec![
                Some("FormacionGeneral".to_owned()),
                Some("Major".to_owned()),
                None,
                Some("Major".to_owned()),
                Some("PlanComun".to_owned()),
            ],
        ];

        sort_by_superblock(&mut plan, &tags, 1);

        let codes = plan.classes[1]
            .iter()
            .map(PseudoCourse::code)
            .collect::<Vec<_>>();
        assert_eq!(codes, vec!["PC1", "M1", "M2", "FG1", "X1"]);
    }
}
