pub mod forum;
pub mod permissions;
pub mod specialties;
pub mod tree;
pub mod votes;

pub use forum::ForumService;

#[derive(Clone)]
pub struct ServiceRegistry {
    pub forum: ForumService,
}

impl ServiceRegistry {
    pub fn new(forum: ForumService) -> Self {
        Self { forum }
    }
}
