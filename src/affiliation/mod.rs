//! Affiliation variants and the term provider
//!
//! An institution's name shows up in published affiliation strings under many
//! textual forms ("HC UFPE", "Hospital das Clínicas da Universidade Federal
//! de Pernambuco", ...). This module holds the variant record type, the
//! storage seam those records live behind, and the [`TermProvider`] that
//! feeds variants to the query builder and validates fetched articles
//! against them.

pub mod seed;

use serde::{Deserialize, Serialize};

/// One known textual form of an institution's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliationVariant {
    /// Storage-assigned identifier; `None` until persisted
    pub id: Option<i64>,
    /// The variant exactly as it appears in source text. Must be non-empty.
    pub original_text: String,
    /// Canonical display form
    pub normalized_text: String,
    /// Institution key the variant belongs to (e.g. `"HC-UFPE"`)
    pub institution: String,
    /// Bibliographic source the variant was curated for, or `"General"`
    pub source_platform: String,
}

impl AffiliationVariant {
    pub fn new<S1, S2, S3, S4>(
        original_text: S1,
        normalized_text: S2,
        institution: S3,
        source_platform: S4,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
    {
        Self {
            id: None,
            original_text: original_text.into(),
            normalized_text: normalized_text.into(),
            institution: institution.into(),
            source_platform: source_platform.into(),
        }
    }
}

/// Storage seam for affiliation variants.
///
/// The application persists variants in its own database; this trait models
/// the record-store surface the core reads through. Uniqueness of
/// `(institution, original_text)` is a caller-side duplicate check before
/// insert, not a storage constraint.
pub trait VariantStore {
    /// All variants registered for an institution, in storage order.
    /// Unknown institutions yield an empty vec, not an error.
    fn variants_for_institution(&self, institution: &str) -> Vec<AffiliationVariant>;

    /// Insert a variant and return its assigned id
    fn insert(&mut self, variant: AffiliationVariant) -> i64;

    /// Update a variant by id; returns false when the id is unknown
    fn update(&mut self, variant: &AffiliationVariant) -> bool;

    /// Delete a variant by id; returns false when the id is unknown
    fn delete(&mut self, id: i64) -> bool;
}

/// In-memory [`VariantStore`], used by tests and as the seed target when the
/// application has no database attached yet.
#[derive(Debug, Default)]
pub struct InMemoryVariantStore {
    next_id: i64,
    variants: Vec<AffiliationVariant>,
}

impl InMemoryVariantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl VariantStore for InMemoryVariantStore {
    fn variants_for_institution(&self, institution: &str) -> Vec<AffiliationVariant> {
        self.variants
            .iter()
            .filter(|v| v.institution == institution)
            .cloned()
            .collect()
    }

    fn insert(&mut self, mut variant: AffiliationVariant) -> i64 {
        self.next_id += 1;
        variant.id = Some(self.next_id);
        self.variants.push(variant);
        self.next_id
    }

    fn update(&mut self, variant: &AffiliationVariant) -> bool {
        let Some(id) = variant.id else {
            return false;
        };
        match self.variants.iter_mut().find(|v| v.id == Some(id)) {
            Some(existing) => {
                *existing = variant.clone();
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, id: i64) -> bool {
        let before = self.variants.len();
        self.variants.retain(|v| v.id != Some(id));
        self.variants.len() != before
    }
}

/// Supplies affiliation terms for query construction and answers whether a
/// block of free text mentions a known variant.
///
/// # Example
///
/// ```
/// use affiliation_search::{InMemoryVariantStore, TermProvider};
/// use affiliation_search::affiliation::seed::seed_default_variants;
///
/// let mut store = InMemoryVariantStore::new();
/// seed_default_variants(&mut store);
///
/// let provider = TermProvider::new(store);
/// let terms = provider.get_terms("HC-UFPE");
/// assert!(!terms.is_empty());
/// ```
#[derive(Debug)]
pub struct TermProvider<S> {
    store: S,
}

impl<S: VariantStore> TermProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// All `original_text` values registered for an institution.
    ///
    /// Ordering is not significant to callers. Unknown institutions yield an
    /// empty vec.
    pub fn get_terms(&self, institution: &str) -> Vec<String> {
        self.store
            .variants_for_institution(institution)
            .into_iter()
            .map(|v| v.original_text)
            .collect()
    }

    /// Whether `text` contains any known variant of the institution's name.
    ///
    /// Case-insensitive literal substring containment, short-circuiting on
    /// the first hit. Variants are matched as plain text: punctuation and
    /// regex metacharacters carry no special meaning. Returns `false` when
    /// the institution has no registered variants — an article cannot be
    /// validated as affiliated when there is nothing to compare against.
    pub fn contains_known_affiliation(&self, text: &str, institution: &str) -> bool {
        let haystack = text.to_lowercase();
        self.get_terms(institution)
            .iter()
            .filter(|term| !term.trim().is_empty())
            .any(|term| haystack.contains(&term.to_lowercase()))
    }
}
