//! Named endpoint groups
//!
//! Groups are user-defined sets of endpoints aggregated for display and
//! billing as one unit. The registry holds them in memory and moves them
//! through a `GroupRepository` as a single document; membership against the
//! known endpoint set is checked softly (logged, not rejected).

use crate::core::{Error, Result};
use crate::store::{GroupMap, GroupRepository};

/// In-memory registry of group definitions
pub struct GroupRegistry {
    groups: GroupMap,
    known_endpoints: Vec<String>,
}

impl GroupRegistry {
    pub fn new(known_endpoints: Vec<String>) -> Self {
        Self {
            groups: GroupMap::new(),
            known_endpoints,
        }
    }

    /// Create a group, or replace an existing definition with the same name.
    /// Name and member list must be non-empty.
    pub fn create(&mut self, name: &str, members: Vec<String>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("group name is required".to_string()));
        }
        if members.is_empty() {
            return Err(Error::InvalidInput(format!(
                "group '{}' needs at least one endpoint",
                name
            )));
        }

        for member in &members {
            if !self.known_endpoints.contains(member) {
                log::warn!("Group '{}' references unknown endpoint {}", name, member);
            }
        }

        self.groups.insert(name.to_string(), members);
        Ok(())
    }

    /// Rename a group, keeping its members
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(Error::InvalidInput("group name is required".to_string()));
        }
        if self.groups.contains_key(new_name) {
            return Err(Error::InvalidInput(format!(
                "group '{}' already exists",
                new_name
            )));
        }

        let members = self.groups.remove(old_name).ok_or_else(|| {
            Error::InvalidInput(format!("no group named '{}'", old_name))
        })?;
        self.groups.insert(new_name.to_string(), members);
        Ok(())
    }

    /// Delete a group; returns whether it existed
    pub fn delete(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    /// Members of a group, if defined
    pub fn get(&self, name: &str) -> Option<&Vec<String>> {
        self.groups.get(name)
    }

    /// Sorted group names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Replace the registry contents from the repository
    pub fn load(&mut self, repo: &dyn GroupRepository) -> Result<()> {
        self.groups = repo.load_groups()?;
        log::info!("Loaded {} group definition(s)", self.groups.len());
        Ok(())
    }

    /// Persist the registry contents through the repository.
    /// A failed save leaves the in-memory definitions untouched.
    pub fn persist(&self, repo: &dyn GroupRepository) -> Result<()> {
        repo.save_groups(&self.groups)
    }
}
