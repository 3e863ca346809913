use crate::error::{ForumError, ForumResult};
use crate::models::Role;

/// Whether `replier` may post in a thread opened by `thread_author`.
///
/// Patient questions are answered by researchers only; researcher threads
/// are open to everyone. Only the thread root's role is consulted, never the
/// role of the reply being answered.
pub fn can_reply(thread_author: Role, replier: Role) -> bool {
    match (thread_author, replier) {
        (Role::Patient, Role::Researcher) => true,
        (Role::Patient, Role::Patient) => false,
        (Role::Researcher, _) => true,
    }
}

pub fn ensure_can_reply(thread_author: Role, replier: Role) -> ForumResult<()> {
    if can_reply(thread_author, replier) {
        Ok(())
    } else {
        Err(ForumError::Forbidden(
            "Only researchers can reply to patient questions".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert!(can_reply(Role::Patient, Role::Researcher));
        assert!(!can_reply(Role::Patient, Role::Patient));
        assert!(can_reply(Role::Researcher, Role::Patient));
        assert!(can_reply(Role::Researcher, Role::Researcher));
    }

    #[test]
    fn test_rejection_is_forbidden() {
        let err = ensure_can_reply(Role::Patient, Role::Patient).unwrap_err();
        assert!(matches!(err, ForumError::Forbidden(_)));
        assert!(ensure_can_reply(Role::Researcher, Role::Patient).is_ok());
    }
}
