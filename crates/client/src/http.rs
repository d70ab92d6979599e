use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::source::RecruitmentSource;
use async_trait::async_trait;
use recruit_model::{Operator, Tag, TagId};
use recruit_protocol::{
    filter_query, ApiError, MatchMode, RecruitmentBundle, BUNDLE_PATH, FILTER_PATH,
    OPERATORS_PATH, TAGS_PATH,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Data API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate().map_err(ClientError::InvalidConfig)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{path_and_query}", self.base_url);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiError>(&bytes)
                .map(|e| match e.details {
                    Some(details) => format!("{} ({details})", e.error),
                    None => e.error,
                })
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RecruitmentSource for HttpSource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        self.get_json(TAGS_PATH).await
    }

    async fn fetch_operators(&self, tag_ids: &[TagId], mode: MatchMode) -> Result<Vec<Operator>> {
        if tag_ids.is_empty() {
            return self.get_json(OPERATORS_PATH).await;
        }
        let path = format!("{FILTER_PATH}?{}", filter_query(tag_ids, mode));
        let operators: Vec<Operator> = self.get_json(&path).await?;
        log::debug!(
            "API returned {} operators for {tag_ids:?} ({mode})",
            operators.len()
        );
        Ok(operators)
    }

    async fn fetch_bundle(&self) -> Result<RecruitmentBundle> {
        self.get_json(BUNDLE_PATH).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
