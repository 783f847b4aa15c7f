//! EFetch XML parsing and record normalization
//!
//! The entry point is [`parse_articles_from_xml`], which takes a raw EFetch
//! response and returns every record mapped to a
//! [`NormalizedArticle`](crate::NormalizedArticle). A record that cannot be
//! mapped is skipped with a warning so one malformed entry never aborts the
//! rest of its batch.

mod xml_types;

use std::sync::OnceLock;

use quick_xml::de::from_str;
use regex::Regex;
use tracing::{instrument, warn};

use crate::article::NormalizedArticle;
use crate::error::{Result, SearchError};
use xml_types::PubmedArticleSet;

/// Parse every article record in an EFetch XML response.
///
/// # Errors
///
/// Returns [`SearchError::XmlError`] when the document itself cannot be
/// deserialized. Failures of individual records inside a valid document are
/// logged and skipped, not returned.
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles_from_xml(xml: &str) -> Result<Vec<NormalizedArticle>> {
    let cleaned = strip_inline_markup(xml);

    let article_set: PubmedArticleSet = from_str(&cleaned)
        .map_err(|e| SearchError::XmlError(format!("failed to deserialize EFetch response: {e}")))?;

    let articles = article_set
        .articles
        .into_iter()
        .filter_map(|record| match record.into_article() {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(error = %e, "skipping unparseable record");
                None
            }
        })
        .collect();

    Ok(articles)
}

/// Remove inline formatting tags (`<i>`, `<sup>`, `<sub>`, ...) that appear
/// inside ArticleTitle and AbstractText. quick-xml's serde deserializer
/// treats them as mixed content and loses the surrounding text otherwise.
fn strip_inline_markup(xml: &str) -> String {
    static INLINE_TAGS: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAGS.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|em|strong|sup|sub)>").expect("inline markup regex is valid")
    });
    re.replace_all(xml, "").into_owned()
}
