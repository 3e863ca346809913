use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A forum category threads are filed under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

impl Category {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// Categories seeded on startup, as (slug, name) pairs
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("lung-cancer", "Lung Cancer"),
    ("heart-related", "Heart Related"),
    ("cancer-research", "Cancer Research"),
    ("neurology", "Neurology"),
    ("oncology", "Oncology"),
    ("cardiology", "Cardiology"),
    ("clinical-trials", "Clinical Trials"),
    ("general-health", "General Health"),
];
