// Service exports
pub mod ai;
pub mod memory;
pub mod postgres;
pub mod store;

pub use ai::{AiMatchingClient, ExternalScorer, ScoredCandidate};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{MatchStore, ProfileStore};
