//! Per-section "editor open" flags keyed by section id.

use std::collections::BTreeMap;

use serde::Serialize;

/// Absent ids read as closed. Entries are flipped, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibilityMap {
    flags: BTreeMap<String, bool>,
}

impl VisibilityMap {
    pub fn is_open(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Returns whether the flag changed.
    pub fn open(&mut self, id: &str) -> bool {
        self.set(id, true)
    }

    /// Returns whether the flag changed. Closing an unseen id still records it.
    pub fn close(&mut self, id: &str) -> bool {
        self.set(id, false)
    }

    fn set(&mut self, id: &str, open: bool) -> bool {
        let previous = self.flags.insert(id.to_string(), open);
        previous.unwrap_or(false) != open
    }

    pub fn open_ids(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, open)| **open)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
