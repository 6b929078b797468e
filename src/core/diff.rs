//! Snapshot diffing by logical endpoint identity.
//!
//! Endpoints are keyed by `method:route-or-url`. Within one set a later
//! descriptor with the same key replaces an earlier one. Added and changed
//! entries follow the new set's order, removed entries the old set's.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::descriptor::ApiDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedEndpoint {
    pub key: String,
    pub old: ApiDescriptor,
    pub new: ApiDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub added: Vec<ApiDescriptor>,
    pub removed: Vec<ApiDescriptor>,
    pub changed: Vec<ChangedEndpoint>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} added, {} removed, {} changed",
            self.added.len(),
            self.removed.len(),
            self.changed.len()
        )
    }
}

/// Keys in first-seen order, each mapped to its last descriptor.
fn index(set: &[ApiDescriptor]) -> (Vec<String>, HashMap<String, &ApiDescriptor>) {
    let mut order = Vec::new();
    let mut by_key = HashMap::new();
    for descriptor in set {
        let key = descriptor.diff_key();
        if by_key.insert(key.clone(), descriptor).is_none() {
            order.push(key);
        }
    }
    (order, by_key)
}

pub fn diff(old: &[ApiDescriptor], new: &[ApiDescriptor]) -> DiffResult {
    let (old_order, old_by_key) = index(old);
    let (new_order, new_by_key) = index(new);
    let mut result = DiffResult::default();

    for key in new_order {
        let current = new_by_key[&key];
        match old_by_key.get(&key) {
            None => result.added.push(current.clone()),
            Some(previous) if !previous.same_content(current) => {
                result.changed.push(ChangedEndpoint {
                    key,
                    old: (*previous).clone(),
                    new: current.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for key in old_order {
        if !new_by_key.contains_key(&key) {
            result.removed.push(old_by_key[&key].clone());
        }
    }

    result
}
