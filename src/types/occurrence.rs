//! Occurrence types for the dependency graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an occurrence in a project's dependency graph.
///
/// Implements `Ord` so traversal order and cursor comparison are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceId(i64);

impl OccurrenceId {
    /// Create a new OccurrenceId.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse an OccurrenceId from its decimal form.
    pub fn from_str(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }

    /// Get the raw id.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OccurrenceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of the project that owns a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    /// Create a new ProjectId.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProjectId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A fully attributed occurrence, as returned by the materializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Occurrence identifier.
    pub id: OccurrenceId,
    /// Component name.
    pub name: String,
    /// Component version, when the scanner reported one.
    pub version: Option<String>,
    /// Package manager that introduced the component (e.g. "npm", "bundler").
    pub package_manager: Option<String>,
    /// License identifiers (SPDX where available).
    pub licenses: Vec<String>,
}

impl Occurrence {
    /// Create an occurrence with a name and no further attributes.
    pub fn new(id: OccurrenceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: None,
            package_manager: None,
            licenses: Vec::new(),
        }
    }

    /// Set the component version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the package manager.
    pub fn with_package_manager(mut self, package_manager: impl Into<String>) -> Self {
        self.package_manager = Some(package_manager.into());
        self
    }

    /// Append a license identifier.
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.licenses.push(license.into());
        self
    }
}

/// Anything that names a single occurrence.
///
/// Lets cursors be derived from both raw id paths and materialized paths.
pub trait OccurrenceKey {
    /// The occurrence this value refers to.
    fn occurrence_id(&self) -> OccurrenceId;
}

impl OccurrenceKey for OccurrenceId {
    fn occurrence_id(&self) -> OccurrenceId {
        *self
    }
}

impl OccurrenceKey for Occurrence {
    fn occurrence_id(&self) -> OccurrenceId {
        self.id
    }
}
