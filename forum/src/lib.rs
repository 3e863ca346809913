//! Threaded-reply aggregation and voting engine for the community forum.
//!
//! Patients and researchers post threads in categories, reply in nested
//! chains, and cast one up or down vote per thread or reply. The engine
//! enforces who may reply to whom, rebuilds reply trees, keeps vote tallies
//! and tags researcher replies with their specialties.

pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{ForumError, ForumResult};
pub use services::ForumService;
pub use state::AppState;
