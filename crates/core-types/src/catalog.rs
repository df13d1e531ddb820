use crate::error::CoreError;
use crate::structs::{Category, CustomSetup, CustomTag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// The user's label definitions: tags, setups and the categories grouping them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCatalog {
    #[serde(default)]
    pub tags: Vec<CustomTag>,
    #[serde(default)]
    pub setups: Vec<CustomSetup>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl LabelCatalog {
    pub fn tag(&self, id: &Uuid) -> Option<&CustomTag> {
        self.tags.iter().find(|t| t.id == *id)
    }

    pub fn setup(&self, id: &Uuid) -> Option<&CustomSetup> {
        self.setups.iter().find(|s| s.id == *id)
    }

    pub fn tag_name(&self, id: &Uuid) -> Option<&str> {
        self.tag(id).map(|t| t.name.as_str())
    }

    pub fn setup_name(&self, id: &Uuid) -> Option<&str> {
        self.setup(id).map(|s| s.name.as_str())
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&CustomTag> {
        self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn setup_by_name(&self, name: &str) -> Option<&CustomSetup> {
        self.setups.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Validates every record and rejects duplicate ids within a collection.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for tag in &self.tags {
            tag.validate()?;
            if !seen.insert(tag.id) {
                return Err(CoreError::invalid("tags", format!("duplicate id {}", tag.id)));
            }
        }
        seen.clear();
        for setup in &self.setups {
            setup.validate()?;
            if !seen.insert(setup.id) {
                return Err(CoreError::invalid("setups", format!("duplicate id {}", setup.id)));
            }
        }
        seen.clear();
        for category in &self.categories {
            if !seen.insert(category.id) {
                return Err(CoreError::invalid("categories", format!("duplicate id {}", category.id)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_resolve_names_case_insensitively() {
        let tag = CustomTag::new("Breakout");
        let id = tag.id;
        let catalog = LabelCatalog {
            tags: vec![tag],
            ..Default::default()
        };
        assert_eq!(catalog.tag_name(&id), Some("Breakout"));
        assert_eq!(catalog.tag_by_name("breakout").map(|t| t.id), Some(id));
        assert!(catalog.setup_name(&id).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let tag = CustomTag::new("A");
        let catalog = LabelCatalog {
            tags: vec![tag.clone(), tag],
            ..Default::default()
        };
        assert!(catalog.validate().is_err());
    }
}
