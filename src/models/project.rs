//! Project and entity-class models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::DEFAULT_COLOR;

/// A named, colored label type defined per project (e.g., PERSON).
///
/// Annotations reference a class by name, not by id. The reference is
/// soft: deleting a class never invalidates existing annotations, their
/// color lookup just falls back to the default swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityClass {
    /// Class name, unique within the project.
    pub name: String,
    /// Palette swatch used to highlight spans of this class.
    pub color: String,
}

/// An annotation project: a set of documents with shared entity classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub entity_classes: Vec<EntityClass>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Look up an entity class by name.
    pub fn find_class(&self, name: &str) -> Option<&EntityClass> {
        self.entity_classes.iter().find(|ec| ec.name == name)
    }

    /// Display color for the named class, falling back to the default
    /// swatch when the class was deleted after annotations were made.
    pub fn class_color(&self, name: &str) -> &str {
        self.find_class(name)
            .map(|ec| ec.color.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            id: "p1".to_string(),
            name: "News NER".to_string(),
            description: None,
            entity_classes: vec![
                EntityClass {
                    name: "PERSON".to_string(),
                    color: "#ffcdd2".to_string(),
                },
                EntityClass {
                    name: "LOCATION".to_string(),
                    color: "#bbdefb".to_string(),
                },
            ],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_class_color_lookup() {
        let project = sample_project();
        assert_eq!(project.class_color("PERSON"), "#ffcdd2");
        assert_eq!(project.class_color("LOCATION"), "#bbdefb");
    }

    #[test]
    fn test_class_color_deleted_class_falls_back() {
        let project = sample_project();
        assert_eq!(project.class_color("ORGANIZATION"), DEFAULT_COLOR);
    }
}
