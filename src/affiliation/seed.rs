//! Curated default affiliation variants
//!
//! The Hospital das Clínicas - UFPE name list, loaded idempotently on first
//! run. Accented and unaccented spellings are registered as separate variants
//! because both appear verbatim in published affiliation strings.

use tracing::{debug, info};

use super::{AffiliationVariant, VariantStore};

/// Institution key the default variants are registered under
pub const DEFAULT_INSTITUTION: &str = "HC-UFPE";

/// The curated variant list: `(original_text, normalized_text)`
const DEFAULT_VARIANTS: &[(&str, &str)] = &[
    ("Hospital das Clinicas - UFPE", "Hospital das Clínicas - UFPE"),
    ("Hospital das Clínicas - UFPE", "Hospital das Clínicas - UFPE"),
    ("Hospital das Clinicas da UFPE", "Hospital das Clínicas da UFPE"),
    ("Hospital das Clínicas da UFPE", "Hospital das Clínicas da UFPE"),
    ("HC UFPE", "HC UFPE"),
    ("HC EBSERH", "HC EBSERH"),
    (
        "Universidade Federal de Pernambuco hospital",
        "Hospital - Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clinicas - Universidade Federal de Pernambuco",
        "Hospital das Clínicas - Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clínicas - Universidade Federal de Pernambuco",
        "Hospital das Clínicas - Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clinicas da Universidade Federal de Pernambuco",
        "Hospital das Clínicas da Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clínicas da Universidade Federal de Pernambuco",
        "Hospital das Clínicas da Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clinicas, Universidade Federal de Pernambuco",
        "Hospital das Clínicas, Universidade Federal de Pernambuco",
    ),
    (
        "Hospital das Clínicas, Universidade Federal de Pernambuco",
        "Hospital das Clínicas, Universidade Federal de Pernambuco",
    ),
    ("Hospital das Clinicas de Pernambuco", "Hospital das Clínicas de Pernambuco"),
    ("Hospital das Clínicas de Pernambuco", "Hospital das Clínicas de Pernambuco"),
    (
        "Hospital das Clinicas de Pernambuco-Empresa Brasileira de Servicos Hospitalares",
        "Hospital das Clínicas de Pernambuco - EBSERH",
    ),
    (
        "Hospital das Clínicas de Pernambuco-Empresa Brasileira de Serviços Hospitalares",
        "Hospital das Clínicas de Pernambuco - EBSERH",
    ),
    ("Hospital das Clinicas/EBSER-UFPE", "Hospital das Clínicas / EBSERH - UFPE"),
    ("Hospital das Clínicas/EBSER-UFPE", "Hospital das Clínicas / EBSERH - UFPE"),
    (
        "Clinics Hospital of Pernambuco Federal University",
        "Clinics Hospital of Pernambuco Federal University",
    ),
];

/// The default variant set as unpersisted records
pub fn default_variants() -> Vec<AffiliationVariant> {
    DEFAULT_VARIANTS
        .iter()
        .map(|(original, normalized)| {
            AffiliationVariant::new(*original, *normalized, DEFAULT_INSTITUTION, "General")
        })
        .collect()
}

/// Load the default variants into `store`, skipping entirely when any
/// variant already exists for the institution. Safe to call on every start.
///
/// Returns the number of variants inserted.
pub fn seed_default_variants<S: VariantStore>(store: &mut S) -> usize {
    let existing = store.variants_for_institution(DEFAULT_INSTITUTION);
    if !existing.is_empty() {
        debug!(
            existing = existing.len(),
            institution = DEFAULT_INSTITUTION,
            "affiliation variants already present, skipping seed"
        );
        return 0;
    }

    let variants = default_variants();
    let inserted = variants.len();
    for variant in variants {
        store.insert(variant);
    }
    info!(
        inserted,
        institution = DEFAULT_INSTITUTION,
        "loaded default affiliation variants"
    );
    inserted
}
