use crate::domain::model::{Diagnostic, DiagnosticKind, Posting, SearchQuery};
use crate::domain::ports::Source;
use crate::utils::error::{AgentError, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// 單一來源失敗時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 第一個失敗的來源即中止整次執行
    #[default]
    Abort,
    /// 記錄為警告，繼續執行其餘來源
    Continue,
}

/// 合併、去重、過濾後的結果
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    pub postings: Vec<Posting>,
    pub counts_by_source: IndexMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
}

/// 依序合併後、去重與過濾前的資料
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    pub merged: Vec<Posting>,
    pub counts_by_source: IndexMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Aggregator {
    policy: FailurePolicy,
}

impl Aggregator {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    /// 依序呼叫每個來源。同名來源的計數會累加。
    pub async fn fan_out(&self, sources: &[Box<dyn Source>], query: &SearchQuery) -> Result<FanOut> {
        let mut fan_out = FanOut::default();

        for source in sources {
            let name = source.name().to_string();
            tracing::info!("🔎 Searching source: {}", name);

            match source.search(query).await {
                Ok(outcome) => {
                    tracing::info!("Source '{}' returned {} postings", name, outcome.postings.len());
                    *fan_out.counts_by_source.entry(name).or_insert(0) += outcome.postings.len();
                    fan_out.merged.extend(outcome.postings);
                    fan_out.diagnostics.extend(outcome.diagnostics);
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        tracing::error!("❌ Source '{}' failed: {}", name, e);
                        return Err(match e {
                            AgentError::SourceError { .. } => e,
                            other => AgentError::source_failed(name, other.to_string()),
                        });
                    }
                    FailurePolicy::Continue => {
                        tracing::warn!("⚠️ Source '{}' failed, continuing: {}", name, e);
                        fan_out.counts_by_source.entry(name.clone()).or_insert(0);
                        fan_out.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::SourceFailed,
                            Some(name.as_str()),
                            e.to_string(),
                        ));
                    }
                },
            }
        }

        Ok(fan_out)
    }

    pub async fn run(&self, sources: &[Box<dyn Source>], query: &SearchQuery) -> Result<AggregateOutcome> {
        let FanOut {
            merged,
            counts_by_source,
            diagnostics,
        } = self.fan_out(sources, query).await?;

        let merged_len = merged.len();
        let unique = dedupe_by_url(merged);
        let unique_len = unique.len();
        let postings = filter_postings(unique, query);

        tracing::info!(
            "Merged {} postings, {} after dedupe, {} after filtering",
            merged_len,
            unique_len,
            postings.len()
        );

        Ok(AggregateOutcome {
            postings,
            counts_by_source,
            diagnostics,
        })
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

/// 以 URL 去重，保留第一次出現者。沒有 URL 的職缺一律丟棄。
pub fn dedupe_by_url(postings: Vec<Posting>) -> Vec<Posting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|p| p.has_url() && seen.insert(p.url.clone()))
        .collect()
}

/// 距離未知或不是數字（NaN）時保留
pub fn passes_radius(posting: &Posting, radius_miles: Option<f64>) -> bool {
    match (posting.distance_miles, radius_miles) {
        (Some(distance), Some(radius)) if !distance.is_nan() => distance <= radius,
        _ => true,
    }
}

/// 關鍵字或職稱任一符合即保留；未設定的條件視為符合
pub fn matches_targets(posting: &Posting, keywords: &[String], titles: &[String]) -> bool {
    let keyword_pass = keywords.is_empty() || {
        let haystack = posting.search_text().to_lowercase();
        keywords
            .iter()
            .any(|k| haystack.contains(&k.to_lowercase()))
    };

    let title_pass = titles.is_empty() || {
        let title = posting.title.to_lowercase();
        titles.iter().any(|t| title.contains(&t.to_lowercase()))
    };

    keyword_pass || title_pass
}

pub fn filter_postings(postings: Vec<Posting>, query: &SearchQuery) -> Vec<Posting> {
    postings
        .into_iter()
        .filter(|p| passes_radius(p, query.radius_miles))
        .filter(|p| matches_targets(p, &query.keywords, &query.titles))
        .collect()
}
