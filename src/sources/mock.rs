use crate::domain::model::{Posting, SearchOutcome, SearchQuery};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;

/// 內建的示範來源，固定回傳兩筆資安相關職缺
#[derive(Debug, Default, Clone)]
pub struct MockSource;

impl MockSource {
    pub const NAME: &'static str = "mock";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn search(&self, _query: &SearchQuery) -> Result<SearchOutcome> {
        let now = Utc::now();

        let postings = vec![
            Posting::new(
                Self::NAME,
                "SOC Analyst (Tier 1)",
                "Acme Security",
                "Budd Lake, NJ",
                "https://example.com/jobs/soc-analyst-tier-1",
                now,
            )
            .with_distance(0.8)
            .with_snippet("Monitor SIEM alerts, triage incidents, escalate as needed."),
            Posting::new(
                Self::NAME,
                "GRC Analyst (Junior)",
                "North Ridge Compliance",
                "Randolph, NJ",
                "https://example.com/jobs/grc-analyst-jr",
                now,
            )
            .with_distance(0.9)
            .with_snippet("Assist with risk assessments, policies, and audit evidence collection."),
        ];

        Ok(SearchOutcome::postings(postings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_two_postings() {
        let outcome = MockSource::new().search(&SearchQuery::default()).await.unwrap();

        assert_eq!(outcome.postings.len(), 2);
        assert!(outcome.diagnostics.is_empty());
        assert!(outcome.postings.iter().all(|p| p.source == "mock"));
        assert_eq!(outcome.postings[0].distance_miles, Some(0.8));
        assert_eq!(outcome.postings[1].url, "https://example.com/jobs/grc-analyst-jr");
        assert_eq!(outcome.postings[0].date_found, outcome.postings[1].date_found);
    }
}
