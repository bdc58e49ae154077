//! Static, ordered section definitions the partition is seeded from.

use shared::domain::{Section, SectionKind};

#[derive(Debug, Clone, PartialEq)]
pub struct SectionDefinition {
    pub section: Section,
    pub default_visible: bool,
}

impl SectionDefinition {
    pub fn title(&self) -> &str {
        &self.section.title
    }

    pub fn id(&self) -> &str {
        &self.section.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionCatalog {
    definitions: Vec<SectionDefinition>,
}

impl SectionCatalog {
    /// The thirteen portfolio section kinds, all visible by default.
    pub fn standard() -> Self {
        Self::from_sections(SectionKind::ALL.into_iter().map(Section::from))
    }

    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            definitions: sections
                .into_iter()
                .map(|section| SectionDefinition {
                    section,
                    default_visible: true,
                })
                .collect(),
        }
    }

    pub fn from_definitions(definitions: Vec<SectionDefinition>) -> Self {
        Self { definitions }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionDefinition> {
        self.definitions.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &SectionDefinition> {
        self.definitions.iter().filter(|def| def.default_visible)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&SectionDefinition> {
        self.definitions.iter().find(|def| def.title() == title)
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_lists_every_kind_in_order() {
        let catalog = SectionCatalog::standard();
        assert_eq!(catalog.len(), 13);
        let ids: Vec<&str> = catalog.iter().map(SectionDefinition::id).collect();
        assert_eq!(ids.first(), Some(&"about"));
        assert_eq!(ids.get(2), Some(&"workExperience"));
        assert_eq!(ids.last(), Some(&"custom"));
        assert_eq!(
            catalog.find_by_title("Work Experience").map(SectionDefinition::id),
            Some("workExperience")
        );
    }

    #[test]
    fn hidden_definitions_are_skipped_by_visible() {
        let catalog = SectionCatalog::from_definitions(vec![
            SectionDefinition {
                section: Section::new("A", "a"),
                default_visible: true,
            },
            SectionDefinition {
                section: Section::new("B", "b"),
                default_visible: false,
            },
        ]);
        let visible: Vec<&str> = catalog.visible().map(SectionDefinition::title).collect();
        assert_eq!(visible, vec!["A"]);
        assert_eq!(catalog.len(), 2);
    }
}
