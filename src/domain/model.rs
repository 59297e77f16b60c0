use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// 單筆職缺資料。由 Source 建立後即不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub source: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// 去重用的鍵；空字串代表沒有 URL
    pub url: String,
    #[serde(serialize_with = "serialize_utc")]
    pub date_found: DateTime<Utc>,
    pub distance_miles: Option<f64>,
    pub description_snippet: Option<String>,
}

impl Posting {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        url: impl Into<String>,
        date_found: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            company: company.into(),
            location: location.into(),
            url: url.into(),
            date_found,
            distance_miles: None,
            description_snippet: None,
        }
    }

    pub fn with_distance(mut self, miles: f64) -> Self {
        self.distance_miles = Some(miles);
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.description_snippet = Some(snippet.into());
        self
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// 關鍵字比對用的文字：title、company、location 與摘要
    pub fn search_text(&self) -> String {
        [
            self.title.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.description_snippet.as_deref().unwrap_or(""),
        ]
        .join(" ")
    }
}

fn serialize_utc<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationEcho {
    pub city: String,
    pub state: String,
    pub country: String,
    pub radius_miles: Option<f64>,
}

/// 輸出檔中回顯的搜尋設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEcho {
    pub location: LocationEcho,
    pub max_results_per_source: u32,
    pub keywords: Vec<String>,
    pub titles: Vec<String>,
    pub sources_enabled: Vec<String>,
}

/// 一次執行的完整輸出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunPayload {
    #[serde(serialize_with = "serialize_utc")]
    pub run_utc: DateTime<Utc>,
    pub config: ConfigEcho,
    pub results: Vec<Posting>,
    /// 依來源執行順序排列
    pub counts_by_source: IndexMap<String, usize>,
    pub total_results: usize,
}

impl RunPayload {
    pub fn new(
        run_utc: DateTime<Utc>,
        config: ConfigEcho,
        results: Vec<Posting>,
        counts_by_source: IndexMap<String, usize>,
    ) -> Self {
        let total_results = results.len();
        Self {
            run_utc,
            config,
            results,
            counts_by_source,
            total_results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownSource,
    MissingCredentials,
    SourceFailed,
    UnsupportedFormat,
}

/// 非致命的警告，隨執行結果一起回傳
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub source: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, source: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.map(str::to_string),
            message: message.into(),
        }
    }
}

/// 傳給每個 Source 的搜尋參數
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub location_name: String,
    pub radius_miles: Option<f64>,
    pub max_results_per_source: u32,
    pub keywords: Vec<String>,
    pub titles: Vec<String>,
}

/// Source 的搜尋結果，附帶該 Source 產生的非致命警告
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub postings: Vec<Posting>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SearchOutcome {
    pub fn postings(postings: Vec<Posting>) -> Self {
        Self {
            postings,
            diagnostics: Vec::new(),
        }
    }

    pub fn skipped(diagnostic: Diagnostic) -> Self {
        Self {
            postings: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}
