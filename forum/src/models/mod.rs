pub mod category;
pub mod profile;
pub mod reply;
pub mod role;
pub mod thread;
pub mod vote;

pub use category::Category;
pub use profile::{Profile, ResearcherProfile};
pub use reply::{CreateReplyRequest, Reply, ReplyEnvelope, ReplyNode};
pub use role::Role;
pub use thread::{
    CreateThreadRequest, Thread, ThreadDetail, ThreadEnvelope, ThreadListQuery, ThreadSummary,
    ThreadView,
};
pub use vote::{VoteRequest, VoteResponse, VoteType, Votes};
