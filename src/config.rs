//! Client configuration
//!
//! All endpoint and batching knobs live here as explicit per-instance values
//! rather than module-level globals, so tests can point a client at a mock
//! server or shrink the fetch batch size without touching ambient state.

use std::time::Duration;

/// Default NCBI E-utilities base URL
const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Number of identifiers sent per EFetch request. Keeps request URLs within
/// the limits the service accepts.
const DEFAULT_FETCH_BATCH_SIZE: usize = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`PubMedClient`](crate::PubMedClient)
///
/// # Example
///
/// ```
/// use affiliation_search::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_email("researcher@university.edu")
///     .with_tool("hospital-publications");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Custom base URL; `None` means the NCBI E-utilities endpoint
    pub base_url: Option<String>,
    /// Identifiers per record-fetch request
    pub batch_size: usize,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Contact email forwarded to the service as the `email` parameter
    pub email: Option<String>,
    /// Tool name forwarded to the service as the `tool` parameter
    pub tool: Option<String>,
    /// Custom User-Agent header; `None` means the crate default
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            base_url: None,
            batch_size: DEFAULT_FETCH_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            email: None,
            tool: None,
            user_agent: None,
        }
    }

    /// Set a custom base URL (e.g. a mock server in tests)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the number of identifiers per record-fetch request.
    ///
    /// Values below 1 are clamped to 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the contact email sent with every request
    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the tool name sent with every request
    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Set a custom User-Agent header
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The base URL requests are issued against
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The User-Agent header sent with every request
    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!("affiliation-search/{}", env!("CARGO_PKG_VERSION"))
        })
    }

    /// Identification parameters appended to every request URL
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(tool) = &self.tool {
            params.push(("tool".to_string(), tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
