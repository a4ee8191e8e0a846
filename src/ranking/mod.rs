//! Ranking Module
//!
//! Ranking-by-zone lookups: a cache in front of the backend's ranking view.

mod service;
mod source;

pub use service::{RankingLookup, RankingService};
pub use source::{RankingSource, RestRankingSource};
