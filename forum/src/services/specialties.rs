use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{Profile, Reply, Role};
use crate::storage::{ProfileStore, StoreResult};

/// Specialties per reply id
pub type SpecialtyMap = HashMap<Uuid, Vec<String>>;

/// Specialty tags shown next to a researcher's reply.
///
/// Declared specialties win, even when empty; otherwise research interests;
/// otherwise nothing.
pub fn select_specialties(profile: Option<&Profile>) -> Vec<String> {
    profile
        .and_then(|p| p.researcher.as_ref())
        .and_then(|r| r.specialties.as_ref().or(r.interests.as_ref()))
        .cloned()
        .unwrap_or_default()
}

/// Distinct researcher authors, in first-seen order
pub fn researcher_authors(replies: &[Reply]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    replies
        .iter()
        .filter(|r| r.author_role == Role::Researcher)
        .map(|r| r.author_user_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Pure half of the annotator: match already-fetched profiles to replies
pub fn annotate_with_profiles(replies: &[Reply], profiles: &[Profile]) -> SpecialtyMap {
    let by_user: HashMap<Uuid, &Profile> = profiles.iter().map(|p| (p.user_id, p)).collect();

    replies
        .iter()
        .map(|reply| {
            let specialties = match reply.author_role {
                Role::Researcher => select_specialties(by_user.get(&reply.author_user_id).copied()),
                Role::Patient => Vec::new(),
            };
            (reply.id, specialties)
        })
        .collect()
}

/// Fetch researcher profiles in one query and build the specialty map.
/// Never writes to the profile store.
pub async fn annotate<P>(profiles: &P, replies: &[Reply]) -> StoreResult<SpecialtyMap>
where
    P: ProfileStore + ?Sized,
{
    let researchers = researcher_authors(replies);
    let fetched = if researchers.is_empty() {
        Vec::new()
    } else {
        profiles.find_profiles(&researchers).await?
    };

    tracing::debug!(
        replies = replies.len(),
        researchers = researchers.len(),
        profiles = fetched.len(),
        "annotated reply specialties"
    );

    Ok(annotate_with_profiles(replies, &fetched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResearcherProfile;

    fn tags(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_specialties_fall_back_to_interests() {
        let user = Uuid::new_v4();
        let with_both = Profile::researcher(user, tags(&["oncology"]), tags(&["genomics"]));
        let interests_only = Profile::researcher(user, None, tags(&["genomics"]));
        let empty_specialties = Profile::researcher(user, tags(&[]), tags(&["genomics"]));
        let bare = Profile {
            user_id: user,
            researcher: Some(ResearcherProfile::default()),
        };

        assert_eq!(select_specialties(Some(&with_both)), vec!["oncology"]);
        assert_eq!(select_specialties(Some(&interests_only)), vec!["genomics"]);
        assert!(select_specialties(Some(&empty_specialties)).is_empty());
        assert!(select_specialties(Some(&bare)).is_empty());
        assert!(select_specialties(None).is_empty());
    }

    #[test]
    fn test_only_researcher_replies_are_annotated() {
        let thread = Uuid::new_v4();
        let researcher = Uuid::new_v4();
        let patient = Uuid::new_v4();

        let replies = vec![
            Reply::new(thread, None, researcher, Role::Researcher, "a".into()),
            Reply::new(thread, None, patient, Role::Patient, "b".into()),
            Reply::new(thread, None, Uuid::new_v4(), Role::Researcher, "c".into()),
        ];
        // A patient with researcher data on file still gets nothing
        let profiles = vec![
            Profile::researcher(researcher, tags(&["cardiology"]), None),
            Profile::researcher(patient, tags(&["should-not-show"]), None),
        ];

        let map = annotate_with_profiles(&replies, &profiles);
        assert_eq!(map[&replies[0].id], vec!["cardiology"]);
        assert!(map[&replies[1].id].is_empty());
        assert!(map[&replies[2].id].is_empty());
    }

    #[test]
    fn test_researcher_authors_are_distinct() {
        let thread = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let replies = vec![
            Reply::new(thread, None, a, Role::Researcher, "1".into()),
            Reply::new(thread, None, b, Role::Researcher, "2".into()),
            Reply::new(thread, None, a, Role::Researcher, "3".into()),
            Reply::new(thread, None, Uuid::new_v4(), Role::Patient, "4".into()),
        ];
        assert_eq!(researcher_authors(&replies), vec![a, b]);
    }
}
