//! Main PanelClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// The client for the intranet REST backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely. It implements [`ResourceApi`](crate::api::ResourceApi).
///
/// # Example
///
/// ```ignore
/// use intranet_api::{PanelClient, auth::CookieTokenProvider};
///
/// let client = PanelClient::builder()
///     .url("https://intranet.example.org/api")
///     .token_provider(CookieTokenProvider::new(cookie_header))
///     .build()?;
///
/// let page = client.list("proyectos", &ListQuery::new(1, 10)).await?;
/// ```
#[derive(Clone)]
pub struct PanelClient {
    pub(crate) inner: Arc<PanelClientInner>,
}

pub(crate) struct PanelClientInner {
    pub(crate) base_url: Url,
    pub(crate) token_provider: Arc<dyn TokenProvider>,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl PanelClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> PanelClientBuilder<Missing, Missing> {
        PanelClientBuilder::new()
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }
}

impl std::fmt::Debug for PanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelClient")
            .field("base_url", &self.base_url())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`PanelClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The backend base URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct PanelClientBuilder<U, P> {
    url: U,
    token_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl PanelClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for PanelClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PanelClientBuilder<Missing, P> {
    /// Sets the backend base URL, e.g. `https://intranet.example.org/api`.
    pub fn url(self, url: impl Into<String>) -> PanelClientBuilder<Set<String>, P> {
        PanelClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> PanelClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> PanelClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        self.shared_token_provider(Arc::new(provider))
    }

    /// Sets a token provider that is also held elsewhere (e.g. to swap the
    /// cookie header after login).
    pub fn shared_token_provider(
        self,
        provider: Arc<dyn TokenProvider>,
    ) -> PanelClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        PanelClientBuilder {
            url: self.url,
            token_provider: Set(provider),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> PanelClientBuilder<U, P> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl PanelClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`PanelClient`].
    ///
    /// Fails if the URL cannot be parsed or cannot carry path segments, or
    /// if the HTTP client cannot be created.
    pub fn build(self) -> Result<PanelClient, Error> {
        let base_url = parse_base_url(&self.url.0)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        log::debug!("Built panel client for {}", base_url);

        Ok(PanelClient {
            inner: Arc::new(PanelClientInner {
                base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}
