//! Depth-first path enumeration from graph roots toward a target.
//!
//! ## Algorithm
//!
//! 1. Walk each root in ascending order, children in ascending order
//! 2. Skip a node already on the current branch (per-branch cycle guard)
//! 3. In `After` mode, prune a branch whose prefix sorts before the cursor
//! 4. A path equal to the cursor marks it found and is never collected
//! 5. A path ending at the target is offered to the collector; the walk
//!    does not continue past the target
//!
//! Because roots and children are visited in ascending order, paths reach
//! the collector in ascending lexicographic order. Pagination relies on it.
//!
//! The walk runs on an explicit stack of enter/leave steps, so chain depth
//! is bounded by heap, not by the call stack.

use std::collections::{HashSet, VecDeque};

use crate::types::{IdPath, OccurrenceId, PathCursor};
use super::adjacency::{AdjacencyMap, ChildIndex};

/// Which slice of the canonical path order a page covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScope {
    /// The first page.
    Unscoped,
    /// Paths strictly after the cursor.
    After(PathCursor),
    /// Paths strictly before the cursor.
    Before(PathCursor),
}

impl PageScope {
    /// Select the scope from caller cursors. Empty cursors count as absent.
    ///
    /// Returns `None` when both cursors carry a path.
    pub fn from_cursors(after: Option<PathCursor>, before: Option<PathCursor>) -> Option<Self> {
        let after = after.filter(|c| !c.is_empty());
        let before = before.filter(|c| !c.is_empty());

        match (after, before) {
            (Some(_), Some(_)) => None,
            (Some(cursor), None) => Some(Self::After(cursor)),
            (None, Some(cursor)) => Some(Self::Before(cursor)),
            (None, None) => Some(Self::Unscoped),
        }
    }

    /// The boundary cursor, if any.
    pub fn cursor(&self) -> Option<&PathCursor> {
        match self {
            Self::Unscoped => None,
            Self::After(cursor) | Self::Before(cursor) => Some(cursor),
        }
    }

    /// Short name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unscoped => "unscoped",
            Self::After(_) => "after",
            Self::Before(_) => "before",
        }
    }
}

/// Mode-specific accumulator, owned by a single enumeration.
#[derive(Debug)]
enum Collector {
    /// Keeps the first `capacity` paths offered.
    Forward { paths: Vec<IdPath>, capacity: usize },
    /// Keeps the last `capacity` paths offered.
    Window { paths: VecDeque<IdPath>, capacity: usize },
}

impl Collector {
    fn for_scope(scope: &PageScope, limit: usize) -> Self {
        // One extra path tells the assembler whether a further page exists.
        let capacity = limit.saturating_add(1);
        match scope {
            PageScope::Unscoped | PageScope::After(_) => Self::Forward {
                paths: Vec::new(),
                capacity,
            },
            PageScope::Before(_) => Self::Window {
                paths: VecDeque::new(),
                capacity,
            },
        }
    }

    fn offer(&mut self, path: IdPath) {
        match self {
            Self::Forward { paths, capacity } => {
                if paths.len() < *capacity {
                    paths.push(path);
                }
            }
            Self::Window { paths, capacity } => {
                paths.push_back(path);
                if paths.len() > *capacity {
                    paths.pop_front();
                }
            }
        }
    }

    fn is_saturated(&self) -> bool {
        match self {
            Self::Forward { paths, capacity } => paths.len() >= *capacity,
            Self::Window { .. } => false,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Forward { paths, .. } => paths.len(),
            Self::Window { paths, .. } => paths.len(),
        }
    }

    fn into_paths(self) -> Vec<IdPath> {
        match self {
            Self::Forward { paths, .. } => paths,
            Self::Window { paths, .. } => paths.into(),
        }
    }
}

enum Step {
    Enter(OccurrenceId),
    Leave,
}

/// Raw output of one enumeration, before page assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    /// Collected paths, in canonical order. At most `limit + 1`.
    pub paths: Vec<IdPath>,
    /// Whether the scope's cursor was met during the walk.
    pub cursor_found: bool,
    /// Number of nodes entered.
    pub nodes_visited: usize,
}

/// Enumerates root → target paths over one adjacency snapshot.
#[derive(Debug, Clone)]
pub struct PathEnumerator {
    roots: Vec<OccurrenceId>,
    children: ChildIndex,
}

impl PathEnumerator {
    /// Index the graph for traversal.
    pub fn new(graph: &AdjacencyMap) -> Self {
        Self {
            roots: graph.roots(),
            children: graph.child_index(),
        }
    }

    /// Graph roots, ascending.
    pub fn roots(&self) -> &[OccurrenceId] {
        &self.roots
    }

    /// Whether `id` is a graph root.
    pub fn is_root(&self, id: OccurrenceId) -> bool {
        self.roots.binary_search(&id).is_ok()
    }

    /// Collect the paths to `target` that a page of `limit` paths in `scope` needs.
    pub fn enumerate(&self, target: OccurrenceId, scope: &PageScope, limit: usize) -> Enumeration {
        let mut collector = Collector::for_scope(scope, limit);
        let mut path: Vec<OccurrenceId> = Vec::new();
        let mut on_branch: HashSet<OccurrenceId> = HashSet::new();
        let mut cursor_found = false;
        let mut nodes_visited = 0usize;

        let mut stack: Vec<Step> = self.roots.iter().rev().map(|&root| Step::Enter(root)).collect();

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Enter(node) => node,
                Step::Leave => {
                    if let Some(left) = path.pop() {
                        on_branch.remove(&left);
                    }
                    continue;
                }
            };

            if !on_branch.insert(node) {
                continue;
            }
            path.push(node);
            stack.push(Step::Leave);
            nodes_visited += 1;

            if let PageScope::After(cursor) = scope {
                if !cursor_found && cursor.precedes(&path) {
                    continue;
                }
            }

            if scope.cursor().is_some_and(|cursor| cursor.matches(&path)) {
                cursor_found = true;
                // Everything left sorts after the cursor.
                if matches!(scope, PageScope::Before(_)) {
                    break;
                }
            } else if node == target && collects(scope, cursor_found) {
                // Cycle detection is not modelled; every emitted path is acyclic.
                collector.offer(IdPath::new(path.clone()));
                if collector.is_saturated() {
                    break;
                }
            }

            if node == target {
                continue;
            }

            stack.extend(
                self.children
                    .children_of(node)
                    .iter()
                    .rev()
                    .map(|&child| Step::Enter(child)),
            );
        }

        tracing::debug!(
            target_id = %target,
            scope = scope.name(),
            limit,
            roots = self.roots.len(),
            nodes_visited,
            collected = collector.len(),
            cursor_found,
            "Path enumeration finished"
        );

        Enumeration {
            paths: collector.into_paths(),
            cursor_found,
            nodes_visited,
        }
    }
}

fn collects(scope: &PageScope, cursor_found: bool) -> bool {
    match scope {
        PageScope::Unscoped => true,
        PageScope::After(_) => cursor_found,
        PageScope::Before(_) => !cursor_found,
    }
}
