//! Name-keyed registry of groups.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use crate::group::{Group, Loader};

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Group names are unique for the process lifetime.
    #[error("group {0:?} is already registered")]
    DuplicateGroup(String),
}

/// Owns every group in the process.
///
/// Lookups take the shared lock: unknown names are an expected input from
/// remote requests and are reported as `None`, not as an error.
/// Registration takes the exclusive lock; it normally happens once at
/// startup, so write contention is not a concern. Groups are never
/// removed.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a group.
    ///
    /// Fails when the name is already taken: two groups sharing a name is
    /// a wiring bug, caught at startup rather than papered over.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        capacity_bytes: i64,
        loader: Arc<dyn Loader>,
    ) -> Result<Arc<Group>, RegistryError> {
        let name = name.into();
        let mut groups = self.groups.write();
        if groups.contains_key(&name) {
            return Err(RegistryError::DuplicateGroup(name));
        }
        let group = Arc::new(Group::new(name.clone(), capacity_bytes, loader));
        groups.insert(name.clone(), group.clone());
        info!(group = %name, capacity_bytes, "registered group");
        Ok(group)
    }

    /// Look up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Names of all registered groups, for monitoring.
    pub fn group_names(&self) -> Vec<String> {
        self.groups.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::LoaderFn;

    fn noop_loader() -> Arc<dyn Loader> {
        Arc::new(LoaderFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            Ok(key.as_bytes().to_vec())
        }))
    }

    #[test]
    fn test_register_then_lookup() {
        let registry = GroupRegistry::new();
        let group = registry.new_group("scores", 1024, noop_loader()).unwrap();
        assert_eq!(group.name(), "scores");

        let found = registry.get_group("scores").unwrap();
        assert_eq!(found.name(), "scores");
        assert!(Arc::ptr_eq(&group, &found));
    }

    #[test]
    fn test_unknown_name_is_none_not_an_error() {
        let registry = GroupRegistry::new();
        assert!(registry.get_group("nope").is_none());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let registry = GroupRegistry::new();
        registry.new_group("scores", 1024, noop_loader()).unwrap();

        let err = registry
            .new_group("scores", 2048, noop_loader())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateGroup(name) if name == "scores"));
    }

    #[test]
    fn test_group_names_lists_everything() {
        let registry = GroupRegistry::new();
        registry.new_group("a", 0, noop_loader()).unwrap();
        registry.new_group("b", 0, noop_loader()).unwrap();

        let mut names = registry.group_names();
        names.sort();
        assert_eq!(names, vec!["a".to_owned(), "b".to_owned()]);
    }
}
