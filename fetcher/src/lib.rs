pub mod cache;
pub mod client;
pub mod models;

pub use cache::{CacheKey, ResponseCache};
pub use client::{CamaraClient, ClientConfig, DEFAULT_BASE_URL, DEFAULT_PROPOSAL_LIMIT};
pub use models::{Proposal, Representative, PLACEHOLDER};
