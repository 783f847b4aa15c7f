//! # Affiliation Search
//!
//! A Rust client library for finding articles affiliated with a specific
//! institution in bibliographic databases. It pairs a curated list of
//! institutional name variants with a PubMed E-utilities client that builds
//! affiliation-restricted queries, resolves them to record identifiers, and
//! fetches the records in batches as normalized article metadata.
//!
//! ## Features
//!
//! - **Affiliation terms**: curated name variants per institution, with a
//!   fail-closed text matcher for validating fetched articles
//! - **Two-phase search**: identifier search followed by batched record
//!   fetches, degrading to partial results instead of failing
//! - **Normalized output**: one article shape regardless of source, ready to
//!   hand to the application's record store
//!
//! ## Quick Start
//!
//! ```no_run
//! use affiliation_search::{InMemoryVariantStore, PubMedClient, TermProvider};
//! use affiliation_search::affiliation::seed::seed_default_variants;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut store = InMemoryVariantStore::new();
//!     seed_default_variants(&mut store);
//!     let provider = TermProvider::new(store);
//!
//!     let terms = provider.get_terms("HC-UFPE");
//!     let client = PubMedClient::new();
//!     let articles = client
//!         .search_by_affiliation(terms, Some("01/01/2021"), Some("31/12/2023"), 100)
//!         .await;
//!
//!     for article in &articles {
//!         let validated = provider.contains_known_affiliation(
//!             &format!("{} {}", article.abstract_text, article.title),
//!             "HC-UFPE",
//!         );
//!         println!("{} [{}] validated={}", article.title, article.external_id, validated);
//!     }
//! }
//! ```

pub mod affiliation;
pub mod article;
pub mod config;
pub mod error;
pub mod pubmed;

// Re-export main types for convenience
pub use affiliation::{AffiliationVariant, InMemoryVariantStore, TermProvider, VariantStore};
pub use article::NormalizedArticle;
pub use config::ClientConfig;
pub use error::{Result, SearchError};
pub use pubmed::{
    build_affiliation_query, PubMedClient, QueryInput, SearchFailure, SearchOutcome,
};
