use std::time::Duration;

use directory_logging::{directory_debug, directory_warn};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{
    CategoryEntry, Collection, DetailPayload, FailureKind, FetchError, ListingPage,
    ListingRequest, WireItem,
};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The directory REST API as the controller needs it.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<ListingPage, FetchError>;

    async fn fetch_categories(
        &self,
        collection: Collection,
    ) -> Result<Vec<CategoryEntry>, FetchError>;

    async fn fetch_detail(
        &self,
        collection: Collection,
        id: i64,
    ) -> Result<DetailPayload, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: String,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(base_url: &str, settings: FetchSettings) -> Result<Self, FetchError> {
        Url::parse(base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
            client,
        })
    }

    fn api_url(&self, path: &str) -> Result<Url, FetchError> {
        api_url(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        directory_debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_limited(response, self.settings.max_bytes)
                .await
                .unwrap_or_default();
            let message = server_message(&body).unwrap_or_else(|| status.to_string());
            directory_warn!("GET {} failed with {}: {}", url, status, message);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let body = read_limited(response, self.settings.max_bytes).await?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<ListingPage, FetchError> {
        let url = listing_url(&self.base_url, request)?;
        self.get_json(url).await
    }

    async fn fetch_categories(
        &self,
        collection: Collection,
    ) -> Result<Vec<CategoryEntry>, FetchError> {
        let url = self.api_url(&format!("{}/basic", collection.category_segment()))?;
        self.get_json(url).await
    }

    async fn fetch_detail(
        &self,
        collection: Collection,
        id: i64,
    ) -> Result<DetailPayload, FetchError> {
        let url = self.api_url(&format!("{}/{}", collection.segment(), id))?;
        let item: WireItem = self.get_json(url).await?;
        let place = match collection {
            Collection::Events => {
                let url = self.api_url(&format!("events/{id}/place"))?;
                Some(self.get_json::<WireItem>(url).await?)
            }
            Collection::Places => None,
        };
        Ok(DetailPayload { item, place })
    }
}

/// `{base}/api/{places|events}?page=&per_page=[&search=][&categories=]`.
pub fn listing_url(base_url: &str, request: &ListingRequest) -> Result<Url, FetchError> {
    let mut url = api_url(base_url, request.collection.segment())?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &request.page.to_string());
        pairs.append_pair("per_page", &request.per_page.to_string());
        if let Some(search) = request.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.append_pair("search", search);
        }
        if !request.categories.is_empty() {
            pairs.append_pair("categories", &request.categories.join(","));
        }
    }
    Ok(url)
}

fn api_url(base_url: &str, path: &str) -> Result<Url, FetchError> {
    let raw = format!("{}/api/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

async fn read_limited(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

#[derive(Deserialize)]
struct ServerMessage {
    message: String,
}

/// The backend reports failures as `{ "message": "..." }`.
fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ServerMessage>(body)
        .ok()
        .map(|parsed| parsed.message)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
