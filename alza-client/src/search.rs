//! Product search with a suggestion-endpoint fallback.
//!
//! The full-text endpoint is the better source (codes, prices,
//! availability) but regularly returns nothing for queries the site's own
//! search box handles. The whisperer fills that gap with thinner records.

use alza_core::de::null_as_default;
use alza_core::extract::{parse_price, product_id_from_url};
use alza_core::{SearchResult, SearchSource};
use alza_fetch::{FetchError, FetchPipeline, FetchStrategy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::client::{ShopClient, auth};
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Strategy ID of the full-text search.
pub const PRIMARY_ID: &str = "search";

/// Strategy ID of the suggestion fallback.
pub const WHISPER_ID: &str = "whisper";

// ============================================================================
// Query Context
// ============================================================================

/// Everything a search strategy needs.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    /// Client to issue requests with.
    pub client: &'a ShopClient,
    /// Session whose token and identity scope the request.
    pub session: &'a Session,
    /// Search term.
    pub term: &'a str,
    /// Maximum number of results.
    pub limit: usize,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    search_term: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data2: Vec<SearchRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRow {
    #[serde(default, deserialize_with = "null_as_default")]
    id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    price_no_currency: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    avail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    img: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
}

impl SearchRow {
    fn into_result(self) -> SearchResult {
        let price = if self.price_no_currency == 0.0 {
            parse_price(&self.price)
        } else {
            self.price_no_currency
        };
        SearchResult {
            id: self.id,
            name: self.name,
            code: self.code,
            price,
            price_text: self.price,
            availability: self.avail,
            image_url: self.img,
            url: self.url,
            source: SearchSource::Search,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WhisperResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    commodities: Vec<WhisperCommodity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WhisperCommodity {
    #[serde(default, deserialize_with = "null_as_default")]
    image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    click_action: ClickAction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClickAction {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    web_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    href: String,
}

impl WhisperCommodity {
    fn into_result(self) -> SearchResult {
        let link = if self.click_action.web_link.is_empty() {
            self.click_action.href
        } else {
            self.click_action.web_link
        };
        SearchResult {
            id: product_id_from_url(&link),
            name: self.click_action.name,
            image_url: self.image_url,
            url: link,
            source: SearchSource::Whisper,
            ..SearchResult::default()
        }
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Full-text search endpoint.
#[derive(Debug, Default)]
pub struct PrimarySearch;

#[async_trait]
impl<'a> FetchStrategy<SearchQuery<'a>, Vec<SearchResult>> for PrimarySearch {
    fn id(&self) -> &str {
        PRIMARY_ID
    }

    #[instrument(skip(self, query), fields(term = %query.term))]
    async fn fetch(&self, query: &SearchQuery<'a>) -> Result<Vec<SearchResult>, FetchError> {
        let body = SearchRequest {
            search_term: query.term,
        };
        let response = query
            .client
            .http()
            .post_json(endpoints::SEARCH, auth(query.session), &body)
            .await?;
        let parsed: SearchResponse = response.json()?;

        let results: Vec<SearchResult> = parsed
            .data2
            .into_iter()
            .take(query.limit)
            .map(SearchRow::into_result)
            .collect();
        debug!(count = results.len(), "Primary search returned");
        Ok(results)
    }

    fn is_usable(&self, results: &Vec<SearchResult>) -> bool {
        !results.is_empty()
    }

    /// The whisperer is tried whatever went wrong here.
    fn should_fallback(&self, _error: &FetchError) -> bool {
        true
    }
}

/// Suggestion ("whisperer") endpoint.
#[derive(Debug, Default)]
pub struct WhisperSearch;

impl WhisperSearch {
    fn url(query: &SearchQuery<'_>) -> Result<Url, FetchError> {
        let target = format!(
            "{}{}",
            query.client.whisper_base(),
            endpoints::whisper(query.session.user_id())
        );
        Url::parse_with_params(
            &target,
            &[
                ("country", endpoints::COUNTRY),
                ("eshopUrl", endpoints::ESHOP_URL),
                ("searchTerm", query.term),
                ("visitor", endpoints::ANONYMOUS_VISITOR),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl<'a> FetchStrategy<SearchQuery<'a>, Vec<SearchResult>> for WhisperSearch {
    fn id(&self) -> &str {
        WHISPER_ID
    }

    #[instrument(skip(self, query), fields(term = %query.term))]
    async fn fetch(&self, query: &SearchQuery<'a>) -> Result<Vec<SearchResult>, FetchError> {
        let url = Self::url(query)?;
        let response = query
            .client
            .http()
            .get(url.as_str(), auth(query.session))
            .await?;
        let parsed: WhisperResponse = response.json()?;

        let results: Vec<SearchResult> = parsed
            .commodities
            .into_iter()
            .take(query.limit)
            .map(WhisperCommodity::into_result)
            .collect();
        debug!(count = results.len(), "Whisper search returned");
        Ok(results)
    }

    fn is_usable(&self, results: &Vec<SearchResult>) -> bool {
        !results.is_empty()
    }

    /// Last in line, so this only decides between its error and the
    /// primary's result.
    fn should_fallback(&self, _error: &FetchError) -> bool {
        true
    }
}

// ============================================================================
// Aggregation
// ============================================================================

impl ShopClient {
    /// Searches the catalog, falling back to suggestions.
    ///
    /// The fallback runs when the primary search fails or finds nothing.
    /// A non-empty fallback wins; otherwise the primary's result stands,
    /// even when it is empty. Only when both fail is the call an error.
    #[instrument(skip(self, session))]
    pub async fn search(
        &self,
        session: &Session,
        term: &str,
        limit: usize,
    ) -> ClientResult<Vec<SearchResult>> {
        let query = SearchQuery {
            client: self,
            session,
            term,
            limit,
        };
        let pipeline: FetchPipeline<SearchQuery<'_>, Vec<SearchResult>> =
            FetchPipeline::with_strategies(vec![Box::new(PrimarySearch), Box::new(WhisperSearch)]);

        let outcome = pipeline.execute(&query).await;
        debug!(
            source = ?outcome.source,
            attempts = outcome.attempts_count(),
            "Search finished"
        );

        let primary = outcome.error_for(PRIMARY_ID).map(str::to_string);
        let fallback = outcome.error_for(WHISPER_ID).map(str::to_string);
        let auth_expired = outcome.auth_failed();

        match outcome.result {
            Ok(results) => Ok(results),
            Err(FetchError::AllStrategiesFailed(_)) => Err(ClientError::SearchFailed {
                primary: primary.unwrap_or_default(),
                fallback: fallback.unwrap_or_default(),
                auth_expired,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
