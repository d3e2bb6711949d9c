//! Page fetcher for Google list endpoints

use super::query::ListQuery;
use super::resources::ResourceKind;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageFetcher};
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::debug;

/// Response field carrying the continuation cursor
pub const NEXT_PAGE_TOKEN: &str = "nextPageToken";

/// Request parameter carrying the cursor
pub const PAGE_TOKEN: &str = "pageToken";

/// Fetches pages of one [`ListQuery`] over HTTP
///
/// The URL and query string are rendered once at construction, so a missing
/// path parameter fails before any request is made.
#[derive(Debug, Clone)]
pub struct ApiPageFetcher {
    client: HttpClient,
    resource: ResourceKind,
    url: String,
    params: Vec<(String, String)>,
    items_field: &'static str,
}

impl ApiPageFetcher {
    /// Bind a query to a client, a service root and a page size hint
    pub fn new(
        client: HttpClient,
        query: &ListQuery,
        base_url: &str,
        page_size: u32,
    ) -> Result<Self> {
        let url = query.url(base_url)?;
        let params = query.query_params(page_size)?;

        Ok(Self {
            client,
            resource: query.resource,
            url: url.into(),
            params,
            items_field: query.descriptor().items_field,
        })
    }

    /// Request URL without query string
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters sent with every page
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

#[async_trait]
impl PageFetcher<JsonValue> for ApiPageFetcher {
    type Error = Error;

    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<Page<JsonValue>> {
        let mut config = RequestConfig::new().queries(self.params.iter().cloned());
        if let Some(cursor) = &cursor {
            config = config.query(PAGE_TOKEN, cursor.as_str());
        }

        let response = self.client.get_with_config(&self.url, config).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;

        let page = decode_page(&body, self.items_field)?;
        debug!(
            resource = %self.resource,
            items = page.items.len(),
            has_more = page.has_more(),
            "Fetched page"
        );
        Ok(page)
    }
}

/// Decode one list response body
///
/// A missing or null item field is an empty page; a missing or empty
/// `nextPageToken` ends the listing.
pub fn decode_page(body: &str, items_field: &str) -> Result<Page<JsonValue>> {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

    let JsonValue::Object(mut object) = value else {
        return Err(Error::decode("Expected a JSON object response"));
    };

    let items = match object.remove(items_field) {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(Error::decode(format!(
                "Field '{items_field}' is not an array: {other}"
            )))
        }
    };

    let next_cursor = match object.remove(NEXT_PAGE_TOKEN) {
        Some(JsonValue::String(token)) if !token.is_empty() => Some(token),
        _ => None,
    };

    Ok(Page::new(items, next_cursor))
}
