use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The subset of a user profile the forum reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Uuid,

    /// Present only for researcher accounts
    pub researcher: Option<ResearcherProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResearcherProfile {
    /// Declared subject-matter specialties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,

    /// Broader research interests, used when no specialties are declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl Profile {
    pub fn researcher(
        user_id: Uuid,
        specialties: Option<Vec<String>>,
        interests: Option<Vec<String>>,
    ) -> Self {
        Self {
            user_id,
            researcher: Some(ResearcherProfile {
                specialties,
                interests,
            }),
        }
    }
}
