//! Disjoint `available` / `selected` section collections.
//!
//! A title lives in exactly one of the two collections. [`PartitionStore::toggle`]
//! is the only mutation: it moves the first match to the end of the other
//! collection, so toggling twice does not restore the original position.

use serde::Serialize;
use shared::domain::Section;
use tracing::debug;

use crate::{
    catalog::SectionCatalog,
    error::{PortfolioError, Result},
};

/// Title that opens the generic editor instead of moving a section.
pub const CUSTOM_SECTION_SENTINEL: &str = "custom";

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// Moved from `available` to the end of `selected`.
    Selected(Section),
    /// Moved from `selected` to the end of `available`.
    Deselected(Section),
    CustomEditorRequested,
}

impl ToggleOutcome {
    pub fn section(&self) -> Option<&Section> {
        match self {
            Self::Selected(section) | Self::Deselected(section) => Some(section),
            Self::CustomEditorRequested => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionStore {
    available: Vec<Section>,
    selected: Vec<Section>,
}

impl PartitionStore {
    pub fn from_catalog(catalog: &SectionCatalog) -> Self {
        Self {
            available: catalog.iter().map(|def| def.section.clone()).collect(),
            selected: Vec::new(),
        }
    }

    pub fn available(&self) -> &[Section] {
        &self.available
    }

    pub fn selected(&self) -> &[Section] {
        &self.selected
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.selected.len()
    }

    pub fn is_selected(&self, title: &str) -> bool {
        self.selected.iter().any(|section| section.title == title)
    }

    pub fn is_available(&self, title: &str) -> bool {
        self.available.iter().any(|section| section.title == title)
    }

    pub fn toggle(&mut self, title: &str) -> Result<ToggleOutcome> {
        if title == CUSTOM_SECTION_SENTINEL {
            return Ok(ToggleOutcome::CustomEditorRequested);
        }

        if let Some(index) = self.selected.iter().position(|s| s.title == title) {
            let section = self.selected.remove(index);
            debug!(section = title, "partition: moved selected -> available");
            self.available.push(section.clone());
            return Ok(ToggleOutcome::Deselected(section));
        }

        if let Some(index) = self.available.iter().position(|s| s.title == title) {
            let section = self.available.remove(index);
            debug!(section = title, "partition: moved available -> selected");
            self.selected.push(section.clone());
            return Ok(ToggleOutcome::Selected(section));
        }

        Err(PortfolioError::UnknownSection(title.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/partition_tests.rs"]
mod tests;
