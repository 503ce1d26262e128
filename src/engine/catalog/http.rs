//! CMS-backed catalog provider.
//!
//! Speaks the JSON catalog API over HTTP: list reads are sent with the
//! no-cache header pair so view counters and stock changes show up
//! immediately, writes wrap their payload in `{ "data": ... }`.

use async_trait::async_trait;
use url::Url;

use crate::config::EngineConfig;
use crate::engine::catalog::provider::{CatalogProvider, SearchPage};
use crate::engine::catalog::types::{
    CatalogItem, DataEnvelope, Inquiry, ItemId, ItemType, ListResponse, PropertyDefinition,
};
use crate::errors::StorefrontError;
use crate::net::{fetch, Response};

/// Relations the item list endpoint must expand for display.
const ITEM_POPULATE: &str = "images,itemType";

pub struct HttpCatalog {
    base: Url,
    client: reqwest::Client,
    bearer_token: Option<String>,
}

impl HttpCatalog {
    /// Creates a provider against `base`, e.g. `https://cms.example/api`.
    pub fn new(base: &str, config: &EngineConfig) -> Result<Self, StorefrontError> {
        let mut base = Url::parse(base)
            .map_err(|e| StorefrontError::InvalidConfig(format!("catalog base URL: {e}")))?;
        // Joining relative paths replaces the last segment unless the base
        // ends in a slash.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let client = fetch::build_client(&config.user_agent, config.request_timeout)?;
        Ok(Self {
            base,
            client,
            bearer_token: None,
        })
    }

    /// Attaches a bearer token sent with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorefrontError> {
        self.base
            .join(path)
            .map_err(|e| StorefrontError::InvalidConfig(format!("catalog endpoint {path}: {e}")))
    }

    fn search_url(&self, text: &str, sort: Option<&str>) -> Result<Url, StorefrontError> {
        let mut url = self.endpoint("items")?;
        {
            let mut query = url.query_pairs_mut();
            if !text.is_empty() {
                query.append_pair("text", text);
            }
            if let Some(sort) = sort {
                query.append_pair("sort", sort);
            }
            query.append_pair("populate", ITEM_POPULATE);
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorized(self.client.get(url))
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorized(self.client.post(url))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn require_success(resp: Response) -> Result<Response, StorefrontError> {
        if resp.is_success() {
            return Ok(resp);
        }
        log::warn!(
            "Catalog request to {} failed: {} {} ({})",
            resp.url,
            resp.status,
            resp.status_text,
            resp.text()
        );
        Err(StorefrontError::Status {
            url: resp.url.to_string(),
            status: resp.status,
        })
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    fn name(&self) -> &str {
        "HttpCatalog"
    }

    async fn search(&self, text: &str, sort: Option<&str>) -> Result<SearchPage, StorefrontError> {
        let url = self.search_url(text, sort)?;
        let resp = fetch::send(fetch::no_cache(self.get(url))).await?;
        let resp = Self::require_success(resp)?;
        let list: ListResponse<CatalogItem> = resp.json()?;
        Ok(SearchPage {
            items: list.data,
            total: list.meta.pagination.total,
        })
    }

    async fn item_types(&self) -> Result<Vec<ItemType>, StorefrontError> {
        let url = self.endpoint("item-types")?;
        let resp = fetch::send(fetch::no_cache(self.get(url))).await?;
        let resp = Self::require_success(resp)?;
        let list: ListResponse<ItemType> = resp.json()?;
        Ok(list.data)
    }

    async fn type_properties(
        &self,
        type_id: &str,
    ) -> Result<Vec<PropertyDefinition>, StorefrontError> {
        let url = self.endpoint(&format!("item-types/{type_id}/properties"))?;
        let resp = fetch::send(fetch::no_cache(self.get(url))).await?;
        let resp = Self::require_success(resp)?;
        let list: ListResponse<PropertyDefinition> = resp.json()?;
        Ok(list.data)
    }

    async fn submit_inquiry(&self, inquiry: &Inquiry) -> Result<(), StorefrontError> {
        let url = self.endpoint("inquiries")?;
        let request = self.post(url).json(&DataEnvelope { data: inquiry });
        let resp = fetch::send(request).await?;
        Self::require_success(resp)?;
        Ok(())
    }

    async fn increment_view(&self, id: &ItemId) -> Result<(), StorefrontError> {
        let url = self.endpoint(&format!("items/{id}/increment-view"))?;
        let resp = fetch::send(self.post(url)).await?;
        Self::require_success(resp)?;
        Ok(())
    }
}
