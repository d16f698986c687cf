//! Core types for dependency path resolution.

pub mod occurrence;
pub mod edge;
pub mod cursor;
pub mod path;

pub use occurrence::{OccurrenceId, ProjectId, Occurrence, OccurrenceKey};
pub use edge::GraphEdge;
pub use cursor::{PathCursor, CursorError};
pub use path::{DependencyPath, IdPath, PathPage};
