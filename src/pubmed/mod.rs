//! PubMed E-utilities client for affiliation-restricted searches
//!
//! - `client` - Two-phase search client (ESearch, then batched EFetch)
//! - `query` - Affiliation query construction and date-bound translation
//! - `parser` - EFetch XML parsing into normalized records
//! - `responses` - ESearch JSON envelope types

pub mod client;
pub mod parser;
pub mod query;
mod responses;

pub use client::{PubMedClient, SearchFailure, SearchOutcome};
pub use parser::parse_articles_from_xml;
pub use query::{build_affiliation_query, QueryInput};

/// Platform label stamped on every record this client produces
pub const SOURCE_PLATFORM: &str = "PubMed";
