//! Serde deserialization types for the EFetch XML document, plus the mapping
//! from one raw record to a [`NormalizedArticle`].
//!
//! Each output field is produced by its own extractor so one field's absence
//! cannot affect the others; a missing sub-element yields that field's empty
//! default rather than an error. Only a record with no article envelope at
//! all is rejected, and the batch parser skips it while siblings survive.

use serde::Deserialize;

use crate::article::NormalizedArticle;
use crate::error::{Result, SearchError};
use crate::pubmed::SOURCE_PLATFORM;

/// Canonical record URL prefix, used when a record has no DOI
const ACCESSION_URL_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov";

#[derive(Debug, Deserialize)]
#[serde(rename = "PubmedArticleSet")]
pub(crate) struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    pub(crate) articles: Vec<PubmedArticleXml>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PubmedArticleXml {
    #[serde(rename = "MedlineCitation")]
    medline_citation: Option<MedlineCitation>,
    #[serde(rename = "PubmedData")]
    pubmed_data: Option<PubmedData>,
}

impl PubmedArticleXml {
    /// Map one raw record into the normalized output shape
    pub(crate) fn into_article(self) -> Result<NormalizedArticle> {
        let Self {
            medline_citation,
            pubmed_data,
        } = self;

        let article = medline_citation
            .and_then(|citation| citation.article)
            .ok_or_else(|| SearchError::MalformedRecord {
                message: "record has no MedlineCitation/Article element".to_string(),
            })?;

        let (doi, accession) = extract_identifiers(pubmed_data.as_ref());
        let url = build_record_url(doi.as_deref(), accession.as_deref());
        let external_id = doi.clone().or_else(|| accession.clone()).unwrap_or_default();

        Ok(NormalizedArticle {
            title: extract_title(&article),
            authors: extract_authors(&article),
            doi: doi.unwrap_or_default(),
            source_platform: SOURCE_PLATFORM.to_string(),
            publication_year: extract_publication_year(&article),
            abstract_text: extract_abstract(&article),
            url,
            external_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MedlineCitation {
    #[serde(rename = "Article")]
    article: Option<ArticleXml>,
}

#[derive(Debug, Deserialize)]
struct ArticleXml {
    #[serde(rename = "ArticleTitle")]
    article_title: Option<String>,
    #[serde(rename = "Abstract")]
    abstract_section: Option<AbstractSection>,
    #[serde(rename = "AuthorList")]
    author_list: Option<AuthorList>,
    #[serde(rename = "Journal")]
    journal: Option<Journal>,
}

#[derive(Debug, Deserialize)]
struct AbstractSection {
    #[serde(rename = "AbstractText", default)]
    segments: Vec<AbstractTextElement>,
}

/// AbstractText appears both as plain text and as labeled sections
/// (`<AbstractText Label="METHODS">...`) in structured abstracts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AbstractTextElement {
    Simple(String),
    Labeled {
        #[serde(rename = "$text")]
        text: Option<String>,
        #[serde(rename = "@Label")]
        #[allow(dead_code)]
        label: Option<String>,
    },
}

impl AbstractTextElement {
    fn text(&self) -> &str {
        match self {
            AbstractTextElement::Simple(text) => text,
            AbstractTextElement::Labeled { text, .. } => text.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthorList {
    #[serde(rename = "Author", default)]
    authors: Vec<AuthorXml>,
}

#[derive(Debug, Deserialize)]
struct AuthorXml {
    #[serde(rename = "LastName")]
    last_name: Option<String>,
    #[serde(rename = "Initials")]
    initials: Option<String>,
    #[serde(rename = "CollectiveName")]
    collective_name: Option<String>,
}

impl AuthorXml {
    /// Display form: `LastName Initials`, falling back to the collective
    /// name for group authorship; `None` when neither is usable.
    fn display_name(&self) -> Option<String> {
        if let Some(last) = self.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let name = match self.initials.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(initials) => format!("{last} {initials}"),
                None => last.to_string(),
            };
            return Some(name);
        }
        self.collective_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

#[derive(Debug, Deserialize)]
struct Journal {
    #[serde(rename = "JournalIssue")]
    journal_issue: Option<JournalIssue>,
}

#[derive(Debug, Deserialize)]
struct JournalIssue {
    #[serde(rename = "PubDate")]
    pub_date: Option<PubDate>,
}

#[derive(Debug, Deserialize)]
struct PubDate {
    #[serde(rename = "Year")]
    year: Option<String>,
    /// Free-text date used by some records instead of Year/Month/Day,
    /// e.g. `"2000 Spring"` or `"1998 Dec-1999 Jan"`
    #[serde(rename = "MedlineDate")]
    medline_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PubmedData {
    #[serde(rename = "ArticleIdList")]
    article_id_list: Option<ArticleIdList>,
}

#[derive(Debug, Deserialize)]
struct ArticleIdList {
    #[serde(rename = "ArticleId", default)]
    ids: Vec<ArticleId>,
}

#[derive(Debug, Deserialize)]
struct ArticleId {
    #[serde(rename = "@IdType")]
    id_type: Option<String>,
    #[serde(rename = "$text")]
    value: Option<String>,
}

fn extract_title(article: &ArticleXml) -> String {
    article
        .article_title
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn extract_authors(article: &ArticleXml) -> String {
    let Some(list) = &article.author_list else {
        return String::new();
    };
    list.authors
        .iter()
        .filter_map(AuthorXml::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn extract_abstract(article: &ArticleXml) -> String {
    let Some(section) = &article.abstract_section else {
        return String::new();
    };
    section
        .segments
        .iter()
        .map(|segment| segment.text().trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_publication_year(article: &ArticleXml) -> String {
    article
        .journal
        .as_ref()
        .and_then(|journal| journal.journal_issue.as_ref())
        .and_then(|issue| issue.pub_date.as_ref())
        .and_then(|pub_date| {
            pub_date
                .year
                .as_deref()
                .map(str::trim)
                .filter(|year| !year.is_empty())
                .map(String::from)
                .or_else(|| {
                    // MedlineDate free text leads with the year
                    pub_date
                        .medline_date
                        .as_deref()
                        .and_then(|text| text.split_whitespace().next())
                        .map(String::from)
                })
        })
        .unwrap_or_default()
}

/// Scan the record's identifier list for a DOI and a native accession,
/// independently. Returns `(doi, accession)`.
fn extract_identifiers(pubmed_data: Option<&PubmedData>) -> (Option<String>, Option<String>) {
    let mut doi = None;
    let mut accession = None;

    let ids = pubmed_data
        .and_then(|data| data.article_id_list.as_ref())
        .map(|list| list.ids.as_slice())
        .unwrap_or(&[]);

    for id in ids {
        let Some(value) = id.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        match id.id_type.as_deref().map(str::to_lowercase).as_deref() {
            Some("doi") if doi.is_none() => doi = Some(value.to_string()),
            Some("pubmed") if accession.is_none() => accession = Some(value.to_string()),
            _ => {}
        }
    }

    (doi, accession)
}

fn build_record_url(doi: Option<&str>, accession: Option<&str>) -> String {
    if let Some(doi) = doi {
        return format!("https://doi.org/{doi}");
    }
    if let Some(accession) = accession {
        return format!("{ACCESSION_URL_BASE}/{accession}/");
    }
    String::new()
}
