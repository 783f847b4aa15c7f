//! Two-phase PubMed search client
//!
//! One search runs an identifier search (ESearch) followed by sequential
//! record fetches (EFetch) in fixed-size batches. The public boundary never
//! fails: transport and parse errors degrade to partial or empty results,
//! with each swallowed failure surfaced as a typed [`SearchFailure`] for the
//! application's logging boundary.

use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::article::NormalizedArticle;
use crate::config::ClientConfig;
use crate::error::{Result, SearchError};

use super::parser::parse_articles_from_xml;
use super::query::{DateWindow, QueryInput};
use super::responses::ESearchResult;

/// A failure the search flow swallowed while degrading to partial results.
///
/// `search_by_affiliation` logs these and returns articles only;
/// [`PubMedClient::search_by_affiliation_with_outcome`] hands them to the
/// caller so the surrounding application can log or persist them itself.
#[derive(Debug)]
pub enum SearchFailure {
    /// The identifier-search phase failed; no records could be retrieved
    IdSearch(SearchError),
    /// One record-fetch batch failed; its identifiers were dropped while the
    /// remaining batches were still attempted
    FetchBatch {
        /// Zero-based position of the batch in the fetch sequence
        batch_index: usize,
        /// The identifiers this batch would have resolved
        pmids: Vec<String>,
        error: SearchError,
    },
}

/// Everything a search produced: the retrieved records plus whatever was
/// swallowed along the way
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Successfully fetched and mapped records, in batch order
    pub articles: Vec<NormalizedArticle>,
    /// Failures that reduced the result set
    pub failures: Vec<SearchFailure>,
}

/// Client for affiliation-restricted searches against PubMed E-utilities
///
/// Stateless between calls: every invocation runs its own independent
/// request sequence.
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use affiliation_search::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use affiliation_search::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_batch_size(50);
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Create a new client reusing an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        let config = ClientConfig::new();
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            config,
        }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search for articles whose affiliation matches the given terms.
    ///
    /// `query` is either a term list (the affiliation query is built from
    /// it) or a preformatted query string used verbatim. `date_start` and
    /// `date_end` are optional inclusive `dd/mm/yyyy` bounds, each silently
    /// dropped when malformed. `max_results` caps the identifier search
    /// only; the output can be shorter but never longer.
    ///
    /// This method never fails: transport and parse errors degrade to an
    /// empty or partial list after being logged. Callers that need failure
    /// visibility should use
    /// [`search_by_affiliation_with_outcome`](Self::search_by_affiliation_with_outcome).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use affiliation_search::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = PubMedClient::new();
    ///     let articles = client
    ///         .search_by_affiliation(
    ///             &["HC UFPE", "Hospital das Clínicas - UFPE"],
    ///             Some("01/01/2021"),
    ///             Some("31/12/2023"),
    ///             50,
    ///         )
    ///         .await;
    ///
    ///     for article in articles {
    ///         println!("{}: {}", article.external_id, article.title);
    ///     }
    /// }
    /// ```
    pub async fn search_by_affiliation(
        &self,
        query: impl Into<QueryInput>,
        date_start: Option<&str>,
        date_end: Option<&str>,
        max_results: usize,
    ) -> Vec<NormalizedArticle> {
        let outcome = self
            .search_by_affiliation_with_outcome(query, date_start, date_end, max_results)
            .await;

        for failure in &outcome.failures {
            match failure {
                SearchFailure::IdSearch(error) => {
                    warn!(error = %error, "identifier search failed, returning no results");
                }
                SearchFailure::FetchBatch {
                    batch_index,
                    pmids,
                    error,
                } => {
                    warn!(
                        batch_index,
                        dropped = pmids.len(),
                        error = %error,
                        "fetch batch failed, dropping its records"
                    );
                }
            }
        }

        outcome.articles
    }

    /// Like [`search_by_affiliation`](Self::search_by_affiliation), but the
    /// swallowed failures come back alongside the partial results instead of
    /// only being logged.
    #[instrument(skip(self, query))]
    pub async fn search_by_affiliation_with_outcome(
        &self,
        query: impl Into<QueryInput>,
        date_start: Option<&str>,
        date_end: Option<&str>,
        max_results: usize,
    ) -> SearchOutcome {
        let term = query.into().into_term_string();
        if term.is_empty() {
            debug!("no usable search terms, skipping remote search");
            return SearchOutcome::default();
        }

        let window = DateWindow::from_bounds(date_start, date_end);

        let pmids = match self.search_identifiers(&term, &window, max_results).await {
            Ok(pmids) => pmids,
            Err(error) => {
                return SearchOutcome {
                    articles: Vec::new(),
                    failures: vec![SearchFailure::IdSearch(error)],
                };
            }
        };

        debug!(identifiers = pmids.len(), "identifier search completed");
        self.fetch_articles(&pmids).await
    }

    /// Fetch full records for the given identifiers in sequential batches of
    /// `config.batch_size`.
    ///
    /// A batch that fails to fetch or parse is recorded as a
    /// [`SearchFailure::FetchBatch`] and dropped; the remaining batches are
    /// still attempted. Partial results beat an all-or-nothing failure for a
    /// multi-hundred-record search.
    #[instrument(skip(self, pmids), fields(pmid_count = pmids.len()))]
    pub async fn fetch_articles(&self, pmids: &[String]) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        if pmids.is_empty() {
            return outcome;
        }

        for (batch_index, chunk) in pmids.chunks(self.config.batch_size).enumerate() {
            match self.fetch_batch(chunk).await {
                Ok(mut articles) => {
                    info!(
                        batch_index,
                        requested = chunk.len(),
                        parsed = articles.len(),
                        "fetch batch completed"
                    );
                    outcome.articles.append(&mut articles);
                }
                Err(error) => {
                    outcome.failures.push(SearchFailure::FetchBatch {
                        batch_index,
                        pmids: chunk.to_vec(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Phase one: resolve the query to a capped list of record identifiers
    async fn search_identifiers(
        &self,
        term: &str,
        window: &DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>> {
        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json&retmax={}",
            self.base_url,
            urlencoding::encode(term),
            retmax
        );
        window.append_query_params(&mut url);

        debug!("issuing ESearch request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;

        // NCBI sometimes returns 200 OK with an ERROR field instead of results
        if let Some(message) = search_result.esearchresult.error {
            return Err(SearchError::ApiError {
                status: 200,
                message: format!("ESearch reported an error: {message}"),
            });
        }

        Ok(search_result.esearchresult.idlist)
    }

    /// Phase two, one batch: fetch and parse up to `batch_size` records
    async fn fetch_batch(&self, pmids: &[String]) -> Result<Vec<NormalizedArticle>> {
        let id_list = pmids.join(",");
        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url, id_list
        );

        debug!(batch_size = pmids.len(), "issuing EFetch request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_articles_from_xml(&body)
    }

    /// Issue a GET request, appending the configured identification
    /// parameters and mapping non-success statuses to [`SearchError::ApiError`]
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        debug!("making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(SearchError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
