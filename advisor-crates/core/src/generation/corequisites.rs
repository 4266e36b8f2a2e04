use crate::catalog::CourseCatalog;
use crate::plan::PseudoCourse;
use crate::requirements::Expr;

/// Groups `classes` into clusters of mutual corequisites, which must share a semester.
///
/// Two classes are related when one lists the other as a corequisite and the other references
/// the first in its requirements; clusters are the connected components of that relation.
/// Clusters are returned as indices into `classes`, ordered by their first member.
pub(crate) fn corequisite_clusters(
    classes: &[PseudoCourse],
    catalog: &CourseCatalog,
) -> Vec<Vec<usize>> {
    let requirements = classes
        .iter()
        .map(|class| catalog.requirements_of(class))
        .collect::<Vec<_>>();
    let codes = classes
        .iter()
        .map(|class| catalog.canonical_code(class.code()))
        .collect::<Vec<_>>();

    let mut neighbours = vec![Vec::new(); classes.len()];
    for x in 0..classes.len() {
        for y in 0..classes.len() {
            if x == y {
                continue;
            }
            let x_needs_y = requirements[x]
                .is_some_and(|deps| mentions(deps, codes[y], catalog, Some(true)));
            let y_needs_x =
                requirements[y].is_some_and(|deps| mentions(deps, codes[x], catalog, None));
            if x_needs_y && y_needs_x {
                neighbours[x].push(y);
                neighbours[y].push(x);
            }
        }
    }

    let mut cluster_of = vec![None; classes.len()];
    let mut clusters = Vec::new();
    for start in 0..classes.len() {
        if cluster_of[start].is_some() {
            continue;
        }
        let cluster_index = clusters.len();
        let mut members = Vec::new();
        let mut stack = vec![start];
        cluster_of[start] = Some(cluster_index);
        while let Some(member) = stack.pop() {
            members.push(member);
            for &neighbour in &neighbours[member] {
                if cluster_of[neighbour].is_none() {
                    cluster_of[neighbour] = Some(cluster_index);
                    stack.push(neighbour);
                }
            }
        }
        members.sort_unstable();
        clusters.push(members);
    }
    clusters
}

/// Whether `deps` has a course atom on `code`, restricted to corequisites or to regular
/// prerequisites when `coreq` is given.
fn mentions(deps: &Expr, code: &str, catalog: &CourseCatalog, coreq: Option<bool>) -> bool {
    deps.atoms().any(|atom| {
        atom.as_course_req().is_some_and(|req| {
            catalog.canonical_code(&req.code) == code
                && coreq.map_or(true, |coreq| req.coreq == coreq)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CourseInfo;

    #[test]
    fn mutual_corequisites_form_one_cluster() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("LAB", 5).with_deps(Expr::coreq("THEORY")),
                CourseInfo::new("THEORY", 10).with_deps(Expr::coreq("LAB")),
                CourseInfo::new("OTHER", 10).with_deps(Expr::coreq("THEORY")),
            ],
            [],
        );
        let classes = vec![
            PseudoCourse::concrete("OTHER"),
            PseudoCourse::concrete("THEORY"),
            PseudoCourse::concrete("LAB"),
        ];

        let clusters = corequisite_clusters(&classes, &catalog);

        assert_eq!(clusters, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn one_sided_corequisites_stay_apart() {
        let catalog = CourseCatalog::new(
            [
                CourseInfo::new("A", 10).with_deps(Expr::coreq("B")),
                CourseInfo::new("B", 10),
            ],
            [],
        );
        let classes = vec![PseudoCourse::concrete("A"), PseudoCourse::concrete("B")];

        assert_eq!(
            corequisite_clusters(&classes, &catalog),
            vec![vec![0], vec![1]]
        );
    }
}
