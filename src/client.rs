use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::ComicApi;
use crate::error::{KomikError, Result};
use crate::types::ComicDetail;

/// JSON-over-HTTP comic API (`{base}/comic/comic/{link}`).
#[derive(Debug)]
pub struct ComicClient {
    client: Client,
    base_url: String,
}

impl ComicClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("komik/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KomikError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn detail_url(&self, link: &str) -> String {
        format!("{}/comic/comic/{}", self.base_url, link)
    }
}

#[async_trait]
impl ComicApi for ComicClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn comic_detail(&self, link: &str) -> Result<ComicDetail> {
        let url = self.detail_url(link);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| KomikError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KomikError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(KomikError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        decode_detail(&body)
    }
}

/// `message` field of an error body, if the body is JSON and has one.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

fn decode_detail(body: &str) -> Result<ComicDetail> {
    if body.trim().is_empty() {
        return Err(KomikError::EmptyBody);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| KomikError::Decode(e.to_string()))?;
    match &value {
        Value::Null => return Err(KomikError::EmptyBody),
        Value::String(s) if s.is_empty() => return Err(KomikError::EmptyBody),
        _ => {}
    }

    serde_json::from_value(value).map_err(|e| KomikError::Decode(e.to_string()))
}
