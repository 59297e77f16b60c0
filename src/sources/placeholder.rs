use crate::domain::model::{SearchOutcome, SearchQuery};
use crate::domain::ports::Source;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 尚未串接的職缺網站，註冊名稱但不回傳任何結果
#[derive(Debug, Clone)]
pub struct PlaceholderSource {
    name: &'static str,
}

impl PlaceholderSource {
    pub fn indeed() -> Self {
        Self { name: "indeed" }
    }

    pub fn monster() -> Self {
        Self { name: "monster" }
    }
}

#[async_trait]
impl Source for PlaceholderSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, _query: &SearchQuery) -> Result<SearchOutcome> {
        // TODO: wire up the board's search endpoint once API access is approved
        tracing::debug!("Source '{}' has no integration yet, returning no postings", self.name);
        Ok(SearchOutcome::default())
    }
}
