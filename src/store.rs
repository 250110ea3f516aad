//! The in-memory project store.
//!
//! An ordered, mutex-guarded list of [`Project`] records. Insertion order is
//! the iteration order; entries are only appended or removed, never
//! reordered. All data lives for the lifetime of the process — there is no
//! persistence layer, on purpose.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project record.
///
/// `id` is a v4 UUID string, minted at creation and never reassigned.
/// `title` and `owner` are free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub owner: String,
}

/// The store as shared by the router and every handler invocation.
pub type SharedStore = Arc<ProjectStore>;

/// Ordered in-memory collection of projects.
///
/// Every read-scan-mutate sequence holds the lock for its whole duration,
/// so id uniqueness and insertion order hold even under concurrent
/// connections. The lock is never held across an await point.
pub struct ProjectStore {
    projects: Mutex<Vec<Project>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self { projects: Mutex::new(Vec::new()) }
    }

    /// Convenience constructor for the form handlers consume.
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    /// Returns projects in insertion order, optionally narrowed to those
    /// whose title contains `filter` as a case-sensitive substring.
    pub fn list(&self, filter: Option<&str>) -> Vec<Project> {
        let projects = self.guard();
        match filter {
            Some(needle) => {
                projects.iter().filter(|p| p.title.contains(needle)).cloned().collect()
            }
            None => projects.clone(),
        }
    }

    /// Mints an id, appends the new project, and returns it.
    pub fn create(&self, title: String, owner: String) -> Project {
        let project = Project { id: mint_id(), title, owner };
        self.guard().push(project.clone());
        project
    }

    /// Replaces the record with the given id wholesale, keeping its id and
    /// position. Returns `None` when no record matches.
    ///
    /// This is full replacement, not a merge: callers pass the complete new
    /// field set, and whatever was stored before is discarded.
    pub fn replace(&self, id: &str, title: String, owner: String) -> Option<Project> {
        let mut projects = self.guard();
        let slot = projects.iter_mut().find(|p| p.id == id)?;
        *slot = Project { id: slot.id.clone(), title, owner };
        Some(slot.clone())
    }

    /// Removes the record with the given id, preserving the relative order
    /// of the rest. Returns `false` when no record matches.
    pub fn remove(&self, id: &str) -> bool {
        let mut projects = self.guard();
        match projects.iter().position(|p| p.id == id) {
            Some(index) => {
                projects.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// A poisoned lock means a handler panicked mid-mutation; the data is
    /// still structurally valid (single push/replace/remove per critical
    /// section), so keep serving rather than propagate the panic.
    fn guard(&self) -> MutexGuard<'_, Vec<Project>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Mints a fresh hyphenated v4 UUID string.
pub fn mint_id() -> String {
    Uuid::new_v4().to_string()
}
