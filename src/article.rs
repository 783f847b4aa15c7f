use serde::{Deserialize, Serialize};

/// One bibliographic record fetched from a source, in the normalized shape
/// shared by every client regardless of which platform produced it.
///
/// Every field is independently defaulted to the empty string when the source
/// omits it; the core never rejects a sparse record. Downstream validation
/// (e.g. requiring a title or an external id before persisting) is the
/// caller's responsibility.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NormalizedArticle {
    /// Article title
    pub title: String,
    /// Comma-joined author display list (e.g. `"Silva JA, Souza M"`)
    pub authors: String,
    /// DOI, empty when the record carries none
    pub doi: String,
    /// Which bibliographic source produced this record (e.g. `"PubMed"`)
    pub source_platform: String,
    /// Best-effort publication year; year granularity only, may be empty
    pub publication_year: String,
    /// Abstract text, sections joined with newlines; may be empty
    pub abstract_text: String,
    /// Link to the record: DOI-derived when possible, else the source's
    /// canonical record URL, else empty
    pub url: String,
    /// Preferred external key: the DOI if present, else the source's native
    /// identifier, else empty
    pub external_id: String,
}
