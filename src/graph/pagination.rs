//! Page assembly from raw enumerations.

use crate::types::{IdPath, OccurrenceId, PathPage};
use super::enumerator::PageScope;

/// Turn collected paths into a page of at most `limit` paths.
///
/// The collector holds up to `limit + 1` paths; the extra one only signals
/// that another page exists in the direction of travel.
pub fn assemble(
    collected: Vec<IdPath>,
    scope: &PageScope,
    limit: usize,
    target: OccurrenceId,
) -> PathPage<OccurrenceId> {
    let overflow = collected.len() > limit;

    match scope {
        PageScope::Unscoped if collected.is_empty() => PathPage {
            // Unreachable target: report the occurrence on its own.
            paths: vec![IdPath::new(vec![target])],
            has_previous_page: false,
            has_next_page: false,
        },
        PageScope::Unscoped => PathPage {
            paths: head(collected, limit),
            has_previous_page: false,
            has_next_page: overflow,
        },
        PageScope::After(_) => PathPage {
            paths: head(collected, limit),
            has_previous_page: true,
            has_next_page: overflow,
        },
        PageScope::Before(_) => PathPage {
            paths: tail(collected, limit),
            has_previous_page: overflow,
            has_next_page: true,
        },
    }
}

/// Prepend `[target]` to a first page when the target is a root.
///
/// Scoped pages and pages that already hold `[target]` are left untouched.
pub fn inject_self_reference(
    page: &mut PathPage<OccurrenceId>,
    scope: &PageScope,
    target: OccurrenceId,
    target_is_root: bool,
) {
    if !matches!(scope, PageScope::Unscoped) || !target_is_root {
        return;
    }

    if !page.paths.iter().any(|path| path.is_single(target)) {
        page.paths.insert(0, IdPath::new(vec![target]));
    }
}

fn head(mut paths: Vec<IdPath>, limit: usize) -> Vec<IdPath> {
    paths.truncate(limit);
    paths
}

fn tail(mut paths: Vec<IdPath>, limit: usize) -> Vec<IdPath> {
    let excess = paths.len().saturating_sub(limit);
    paths.drain(..excess);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathCursor;

    fn path(raw: &[i64]) -> IdPath {
        IdPath::new(raw.iter().copied().map(OccurrenceId::new).collect())
    }

    fn raw(page: &PathPage<OccurrenceId>) -> Vec<Vec<i64>> {
        page.paths
            .iter()
            .map(|p| p.nodes.iter().map(OccurrenceId::get).collect())
            .collect()
    }

    fn cursor() -> PathCursor {
        PathCursor::from(&[1, 9][..])
    }

    #[test]
    fn test_unscoped_overflow() {
        let page = assemble(
            vec![path(&[1, 5]), path(&[2, 5]), path(&[3, 5])],
            &PageScope::Unscoped,
            2,
            OccurrenceId::new(5),
        );

        assert_eq!(raw(&page), vec![vec![1, 5], vec![2, 5]]);
        assert!(!page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_unscoped_empty_synthesizes_target() {
        let page = assemble(Vec::new(), &PageScope::Unscoped, 20, OccurrenceId::new(9));

        assert_eq!(raw(&page), vec![vec![9]]);
        assert!(!page.paths[0].is_cyclic);
        assert!(!page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_after_always_has_previous() {
        let page = assemble(vec![path(&[2, 5])], &PageScope::After(cursor()), 2, OccurrenceId::new(5));

        assert_eq!(raw(&page), vec![vec![2, 5]]);
        assert!(page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_after_empty_stays_empty() {
        let page = assemble(Vec::new(), &PageScope::After(cursor()), 2, OccurrenceId::new(5));
        assert!(page.is_empty());
    }

    #[test]
    fn test_before_keeps_tail() {
        let page = assemble(
            vec![path(&[1, 5]), path(&[2, 5]), path(&[3, 5])],
            &PageScope::Before(cursor()),
            2,
            OccurrenceId::new(5),
        );

        assert_eq!(raw(&page), vec![vec![2, 5], vec![3, 5]]);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_before_without_overflow() {
        let page = assemble(vec![path(&[1, 5])], &PageScope::Before(cursor()), 2, OccurrenceId::new(5));

        assert!(!page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_zero_limit() {
        let page = assemble(vec![path(&[1, 5])], &PageScope::Unscoped, 0, OccurrenceId::new(5));

        assert!(page.is_empty());
        assert!(page.has_next_page);
    }

    #[test]
    fn test_inject_prepends_for_roots() {
        let mut page = PathPage {
            paths: vec![path(&[1, 5])],
            has_previous_page: false,
            has_next_page: false,
        };
        inject_self_reference(&mut page, &PageScope::Unscoped, OccurrenceId::new(1), true);

        assert_eq!(raw(&page), vec![vec![1], vec![1, 5]]);
    }

    #[test]
    fn test_inject_skips_existing_self_path() {
        let mut page = PathPage {
            paths: vec![path(&[1])],
            has_previous_page: false,
            has_next_page: false,
        };
        inject_self_reference(&mut page, &PageScope::Unscoped, OccurrenceId::new(1), true);

        assert_eq!(raw(&page), vec![vec![1]]);
    }

    #[test]
    fn test_inject_ignores_scoped_pages_and_non_roots() {
        let mut page = PathPage::empty();
        inject_self_reference(&mut page, &PageScope::After(cursor()), OccurrenceId::new(1), true);
        assert!(page.is_empty());

        inject_self_reference(&mut page, &PageScope::Unscoped, OccurrenceId::new(1), false);
        assert!(page.is_empty());
    }
}
