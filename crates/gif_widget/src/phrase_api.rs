use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{WidgetError, WidgetResult};

pub const DEFAULT_PHRASE_API_URL: &str = "https://example.com/api/signlanguage";

/// Body returned by the phrase lookup API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseLookupResponse {
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

#[async_trait]
pub trait PhraseSource: Send + Sync {
    /// Resolves a phrase to the URL of the video that signs it.
    async fn lookup_video_url(&self, phrase: &str) -> WidgetResult<Url>;
    async fn fetch_video(&self, video_url: &Url) -> WidgetResult<Vec<u8>>;
}

#[derive(Clone)]
pub struct HttpPhraseSource {
    http: Client,
    api_url: Url,
}

impl HttpPhraseSource {
    pub fn new(api_url: &str) -> WidgetResult<Self> {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(http: Client, api_url: &str) -> WidgetResult<Self> {
        let api_url = Url::parse(api_url).map_err(|source| WidgetError::InvalidApiUrl {
            url: api_url.to_string(),
            source,
        })?;
        Ok(Self { http, api_url })
    }

    pub fn lookup_url(&self, phrase: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut().append_pair("phrase", phrase);
        url
    }
}

#[async_trait]
impl PhraseSource for HttpPhraseSource {
    async fn lookup_video_url(&self, phrase: &str) -> WidgetResult<Url> {
        let url = self.lookup_url(phrase);
        debug!(%url, "phrase lookup");
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(WidgetError::FetchFailed {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        let parsed: PhraseLookupResponse = serde_json::from_slice(&body)
            .map_err(|e| WidgetError::MalformedResponse(e.to_string()))?;
        if parsed.video_url.trim().is_empty() {
            return Err(WidgetError::MalformedResponse("videoUrl is empty".into()));
        }
        // Relative video URLs resolve against the API endpoint.
        url.join(&parsed.video_url).map_err(|e| {
            WidgetError::MalformedResponse(format!("videoUrl '{}': {e}", parsed.video_url))
        })
    }

    async fn fetch_video(&self, video_url: &Url) -> WidgetResult<Vec<u8>> {
        debug!(url = %video_url, "video download");
        let response = self.http.get(video_url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(WidgetError::FetchFailed {
                url: video_url.to_string(),
                status: response.status(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
