use crate::domain::model::{Diagnostic, DiagnosticKind, Posting, SearchOutcome, SearchQuery};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const USAJOBS_API_KEY_ENV: &str = "USAJOBS_API_KEY";
pub const USAJOBS_USER_AGENT_ENV: &str = "USAJOBS_USER_AGENT";
pub const USAJOBS_BASE_URL: &str = "https://data.usajobs.gov/api/search";

const DEFAULT_KEYWORD: &str = "cybersecurity";
const DEFAULT_RADIUS_MILES: u32 = 50;
const DEFAULT_RESULTS_PER_PAGE: u32 = 25;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// USAJOBS 官方搜尋 API。
///
/// 需要 `USAJOBS_API_KEY` 與 `USAJOBS_USER_AGENT`（通常是聯絡用 email）兩個環境變數，
/// 任一未設定時回傳空結果並附上警告。
pub struct UsaJobsSource {
    api_key: String,
    user_agent: String,
    base_url: String,
    client: Client,
}

impl UsaJobsSource {
    pub const NAME: &'static str = "usajobs";

    /// 從環境變數讀取憑證
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(USAJOBS_API_KEY_ENV).unwrap_or_default();
        let user_agent = std::env::var(USAJOBS_USER_AGENT_ENV).unwrap_or_default();
        Self::with_credentials(api_key, user_agent)
    }

    pub fn with_credentials(api_key: impl Into<String>, user_agent: impl Into<String>) -> Result<Self> {
        let api_key: String = api_key.into();
        let user_agent: String = user_agent.into();
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            api_key: api_key.trim().to_string(),
            user_agent: user_agent.trim().to_string(),
            base_url: USAJOBS_BASE_URL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        validate_url("usajobs.base_url", &base_url)?;
        self.base_url = base_url;
        Ok(self)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.user_agent.is_empty()
    }

    fn query_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let keyword = query
            .keywords
            .iter()
            .find(|k| !k.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_KEYWORD.to_string());
        let radius = query
            .radius_miles
            .map(|r| r.round() as u32)
            .unwrap_or(DEFAULT_RADIUS_MILES);
        let per_page = match query.max_results_per_source {
            0 => DEFAULT_RESULTS_PER_PAGE,
            n => n,
        };

        let mut params = vec![("Keyword", keyword)];
        if !query.location_name.is_empty() {
            params.push(("LocationName", query.location_name.clone()));
        }
        params.push(("Radius", radius.to_string()));
        params.push(("ResultsPerPage", per_page.to_string()));
        params.push(("Page", "1".to_string()));
        params
    }
}

#[async_trait]
impl Source for UsaJobsSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        if !self.is_configured() {
            let message = format!(
                "USAJOBS env vars not set ({} / {}) - skipping",
                USAJOBS_API_KEY_ENV, USAJOBS_USER_AGENT_ENV
            );
            tracing::warn!("⚠️ {}", message);
            return Ok(SearchOutcome::skipped(Diagnostic::new(
                DiagnosticKind::MissingCredentials,
                Some(Self::NAME),
                message,
            )));
        }

        tracing::debug!("Making API request to: {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .header("User-Agent", &self.user_agent)
            .header("Authorization-Key", &self.api_key)
            .header("Accept", "application/json")
            .query(&Self::query_params(query))
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("API response status: {}", response.status());
        let body: SearchResponse = response.json().await?;
        let now = Utc::now();

        let postings = body
            .search_result
            .and_then(|r| r.items)
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let d = item.descriptor.unwrap_or_default();
                let location = d
                    .locations
                    .unwrap_or_default()
                    .into_iter()
                    .next()
                    .and_then(|l| l.name)
                    .unwrap_or_default();

                // USAJOBS 不提供距離
                Posting::new(
                    Self::NAME,
                    d.title.unwrap_or_default(),
                    d.organization.unwrap_or_default(),
                    location,
                    d.uri.unwrap_or_default(),
                    now,
                )
                .with_distance(0.0)
                .with_snippet("USAJOBS listing")
            })
            .collect::<Vec<_>>();

        tracing::debug!("USAJOBS returned {} postings", postings.len());
        Ok(SearchOutcome::postings(postings))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(rename = "SearchResult", default)]
    search_result: Option<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(rename = "SearchResultItems", default)]
    items: Option<Vec<SearchResultItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResultItem {
    #[serde(rename = "MatchedObjectDescriptor", default)]
    descriptor: Option<Descriptor>,
}

#[derive(Debug, Default, Deserialize)]
struct Descriptor {
    #[serde(rename = "PositionTitle", default)]
    title: Option<String>,
    #[serde(rename = "OrganizationName", default)]
    organization: Option<String>,
    #[serde(rename = "PositionURI", default)]
    uri: Option<String>,
    #[serde(rename = "PositionLocation", default)]
    locations: Option<Vec<PositionLocation>>,
}

#[derive(Debug, Default, Deserialize)]
struct PositionLocation {
    #[serde(rename = "LocationName", default)]
    name: Option<String>,
}
