//! HTTP client for the card list listing
//!
//! Fetches one listing page at a time with the view cookie and the unfiltered
//! search parameters. The sync loop only sees [`CardListSource`], so tests can
//! feed it canned markup.

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT},
};
use url::Url;

use crate::infrastructure::config::{SiteConfig, hololive};
use crate::infrastructure::error::{CollectorError, CollectorResult};

/// Source of raw listing page markup
#[async_trait]
pub trait CardListSource: Send + Sync {
    /// Fetch the markup of listing page `page` (1-based)
    async fn fetch_page(&self, page: u32) -> CollectorResult<String>;
}

/// reqwest-backed listing client
pub struct HttpClient {
    client: Client,
    card_search_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client with the given site configuration
    pub fn new(config: &SiteConfig) -> CollectorResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| CollectorError::validation(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&config.cookie)
                .map_err(|e| CollectorError::validation(format!("invalid cookie: {e}")))?,
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        let card_search_url = Url::parse(&config.card_search_url).map_err(|e| {
            CollectorError::validation(format!("invalid card_search_url: {e}"))
        })?;

        Ok(Self {
            client,
            card_search_url,
        })
    }

    /// Listing URL for `page` with every search filter left open
    pub fn listing_url(&self, page: u32) -> Url {
        let mut url = self.card_search_url.clone();
        url.query_pairs_mut()
            .extend_pairs(hololive::LISTING_FILTERS)
            .append_pair(hololive::PARAM_PAGE, &page.to_string());
        url
    }
}

#[async_trait]
impl CardListSource for HttpClient {
    async fn fetch_page(&self, page: u32) -> CollectorResult<String> {
        let url = self.listing_url(page);
        tracing::info!("Fetching listing page {}: {}", page, url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        tracing::debug!("Fetched page {} ({} chars)", page, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_cookie_is_rejected() {
        let config = SiteConfig {
            cookie: "bad\ncookie".to_string(),
            ..SiteConfig::default()
        };
        assert!(matches!(
            HttpClient::new(&config),
            Err(CollectorError::Validation { .. })
        ));
    }

    #[test]
    fn test_listing_url_carries_filters_and_page() {
        let client = HttpClient::new(&SiteConfig::default()).unwrap();
        let url = client.listing_url(3);

        assert_eq!(url.path(), "/cardlist/cardsearch_ex");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), hololive::LISTING_FILTERS.len() + 1);
        assert!(pairs.contains(&("keyword".to_string(), String::new())));
        assert!(pairs.contains(&("card_kind[0]".to_string(), "all".to_string())));
        assert_eq!(pairs.last(), Some(&("page".to_string(), "3".to_string())));
    }
}
