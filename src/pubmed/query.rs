//! Query construction for affiliation-restricted searches
//!
//! Turns curated affiliation terms into the boolean query grammar the
//! ESearch endpoint expects, and translates the application's `dd/mm/yyyy`
//! date bounds into the service's native date-filter parameters.

use time::{Date, Month};
use tracing::warn;

/// Build a query string restricting every term to the affiliation field.
///
/// Each non-blank term is quoted (unless it already contains a quote
/// character, in which case it is used as-is) and tagged with
/// `[Affiliation]`. A single usable term is returned untouched; two or more
/// are ` OR `-joined and wrapped in parentheses. The single/multiple
/// asymmetry matches the query grammar the search endpoint expects and must
/// not be "simplified" into always-parenthesized output.
///
/// Returns an empty string when no usable term remains; callers must treat
/// that as "nothing to search" rather than sending an unscoped query.
///
/// # Example
///
/// ```
/// use affiliation_search::build_affiliation_query;
///
/// let query = build_affiliation_query(&["HC UFPE", "Hospital das Clínicas - UFPE"]);
/// assert_eq!(
///     query,
///     r#"("HC UFPE"[Affiliation] OR "Hospital das Clínicas - UFPE"[Affiliation])"#
/// );
/// ```
pub fn build_affiliation_query<S: AsRef<str>>(terms: &[S]) -> String {
    let mut tagged: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim();
        if term.is_empty() {
            continue;
        }
        let quoted = if term.contains('"') {
            term.to_string()
        } else {
            format!("\"{term}\"")
        };
        tagged.push(format!("{quoted}[Affiliation]"));
    }

    match tagged.len() {
        0 => String::new(),
        1 => tagged.swap_remove(0),
        _ => format!("({})", tagged.join(" OR ")),
    }
}

/// Search input: either a term list to build a query from, or a query string
/// the caller already formatted (used verbatim).
#[derive(Debug, Clone)]
pub enum QueryInput {
    /// Affiliation terms; the query is built via [`build_affiliation_query`]
    Terms(Vec<String>),
    /// A preformatted query string, passed through untouched
    Preformatted(String),
}

impl QueryInput {
    pub(crate) fn into_term_string(self) -> String {
        match self {
            QueryInput::Terms(terms) => build_affiliation_query(&terms),
            QueryInput::Preformatted(query) => query.trim().to_string(),
        }
    }
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        QueryInput::Preformatted(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        QueryInput::Preformatted(query)
    }
}

impl From<Vec<String>> for QueryInput {
    fn from(terms: Vec<String>) -> Self {
        QueryInput::Terms(terms)
    }
}

impl From<&[String]> for QueryInput {
    fn from(terms: &[String]) -> Self {
        QueryInput::Terms(terms.to_vec())
    }
}

impl From<&[&str]> for QueryInput {
    fn from(terms: &[&str]) -> Self {
        QueryInput::Terms(terms.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for QueryInput {
    fn from(terms: &[&str; N]) -> Self {
        QueryInput::Terms(terms.iter().map(|t| t.to_string()).collect())
    }
}

/// Optional inclusive publication-date window, already translated to the
/// service's `YYYY/MM/DD` form.
///
/// Each bound is validated and translated independently: a malformed or
/// impossible `dd/mm/yyyy` input disables only that bound's filter, never the
/// whole search.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DateWindow {
    pub(crate) mindate: Option<String>,
    pub(crate) maxdate: Option<String>,
}

impl DateWindow {
    pub(crate) fn from_bounds(date_start: Option<&str>, date_end: Option<&str>) -> Self {
        Self {
            mindate: translate_bound(date_start, "start"),
            maxdate: translate_bound(date_end, "end"),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.mindate.is_none() && self.maxdate.is_none()
    }

    /// Append `datetype`/`mindate`/`maxdate` parameters to a request URL.
    /// One-sided windows are sent as-is; the service honors a lone bound.
    pub(crate) fn append_query_params(&self, url: &mut String) {
        if self.is_empty() {
            return;
        }
        url.push_str("&datetype=pdat");
        if let Some(date) = &self.mindate {
            url.push_str(&format!("&mindate={}", urlencoding::encode(date)));
        }
        if let Some(date) = &self.maxdate {
            url.push_str(&format!("&maxdate={}", urlencoding::encode(date)));
        }
    }
}

fn translate_bound(raw: Option<&str>, which: &str) -> Option<String> {
    let raw = raw?;
    match to_entrez_date(raw) {
        Some(date) => Some(date),
        None => {
            warn!(input = raw, bound = which, "ignoring malformed date bound");
            None
        }
    }
}

/// `dd/mm/yyyy` → `YYYY/MM/DD`; `None` unless the input is a real calendar
/// date with a four-digit year.
fn to_entrez_date(raw: &str) -> Option<String> {
    let mut parts = raw.trim().splitn(3, '/');
    let day: u8 = parts.next()?.parse().ok()?;
    let month_number: u8 = parts.next()?.parse().ok()?;
    let year_text = parts.next()?;
    if year_text.len() != 4 {
        return None;
    }
    let year: i32 = year_text.parse().ok()?;
    let month = Month::try_from(month_number).ok()?;
    Date::from_calendar_date(year, month, day).ok()?;
    Some(format!("{year:04}/{month_number:02}/{day:02}"))
}
