pub mod storage;

use crate::domain::model::RunPayload;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

pub use storage::LocalStorage;

pub const SNAPSHOT_DIR: &str = "snapshots";

/// 主要輸出檔與快照檔的路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPaths {
    pub primary: String,
    pub snapshot: String,
}

pub struct OutputWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> OutputWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 整份覆寫，不做附加
    pub async fn write(&self, path: &str, payload: &RunPayload) -> Result<()> {
        let json = serde_json::to_string_pretty(payload)?;
        tracing::debug!("Writing {} bytes to {}", json.len(), path);
        self.storage.write_file(path, json.as_bytes()).await
    }

    /// 先寫主要輸出檔，再寫以執行時間命名的快照
    pub async fn write_all(&self, primary: &str, payload: &RunPayload) -> Result<WrittenPaths> {
        self.write(primary, payload).await?;
        tracing::info!("📁 Output saved to: {}", primary);

        let snapshot = snapshot_path(primary, &payload.run_utc);
        self.write(&snapshot, payload).await?;
        tracing::info!("📸 Snapshot saved to: {}", snapshot);

        Ok(WrittenPaths {
            primary: primary.to_string(),
            snapshot,
        })
    }
}

/// `data/jobs.json` -> `data/snapshots/jobs_20261018T140501Z.json`
///
/// 同一秒內的兩次執行會寫到同一個快照檔。
pub fn snapshot_path(primary: &str, run_utc: &DateTime<Utc>) -> String {
    let primary = Path::new(primary);
    let stem = primary
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("jobs");
    let ext = primary
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("json");

    let file_name = format!("{}_{}.{}", stem, filename_stamp(run_utc), ext);
    let parent = primary.parent().unwrap_or_else(|| Path::new(""));

    parent
        .join(SNAPSHOT_DIR)
        .join(file_name)
        .to_string_lossy()
        .into_owned()
}

/// ISO-8601 時間去掉檔名中不安全的字元
fn filename_stamp(run_utc: &DateTime<Utc>) -> String {
    run_utc
        .to_rfc3339_opts(SecondsFormat::Secs, true)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ConfigEcho, Posting};
    use crate::utils::error::AgentError;
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn paths(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut paths: Vec<String> = files.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AgentError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn run_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 1).unwrap()
    }

    fn payload() -> RunPayload {
        let posting = Posting::new(
            "mock",
            "SOC Analyst (Tier 1)",
            "Acme Security",
            "Budd Lake, NJ",
            "https://example.com/jobs/soc-analyst-tier-1",
            run_time(),
        )
        .with_distance(0.8);

        let mut counts = IndexMap::new();
        counts.insert("mock".to_string(), 1);
        RunPayload::new(run_time(), ConfigEcho::default(), vec![posting], counts)
    }

    #[test]
    fn test_snapshot_path_from_run_timestamp() {
        assert_eq!(
            snapshot_path("data/jobs.json", &run_time()),
            "data/snapshots/jobs_20261018T140501Z.json"
        );
        assert_eq!(
            snapshot_path("results.json", &run_time()),
            "snapshots/results_20261018T140501Z.json"
        );
    }

    #[test]
    fn test_snapshot_stamp_has_no_unsafe_chars() {
        let path = snapshot_path("data/jobs.json", &Utc::now());
        let file_name = Path::new(&path).file_name().unwrap().to_str().unwrap();
        assert!(!file_name.contains(':'));
        assert!(file_name.starts_with("jobs_"));
    }

    #[tokio::test]
    async fn test_write_all_writes_primary_and_snapshot() {
        let storage = MockStorage::new();
        let writer = OutputWriter::new(storage.clone());

        let paths = writer.write_all("data/jobs.json", &payload()).await.unwrap();

        assert_eq!(paths.primary, "data/jobs.json");
        assert_eq!(paths.snapshot, "data/snapshots/jobs_20261018T140501Z.json");
        assert_eq!(
            storage.paths().await,
            vec!["data/jobs.json", "data/snapshots/jobs_20261018T140501Z.json"]
        );

        let primary = storage.read_file("data/jobs.json").await.unwrap();
        let snapshot = storage.read_file(&paths.snapshot).await.unwrap();
        assert_eq!(primary, snapshot);
    }

    #[tokio::test]
    async fn test_written_payload_fields() {
        let storage = MockStorage::new();
        let writer = OutputWriter::new(storage.clone());
        writer.write("out.json", &payload()).await.unwrap();

        let bytes = storage.read_file("out.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["run_utc"], "2026-10-18T14:05:01.000000Z");
        assert_eq!(value["total_results"], 1);
        assert_eq!(value["counts_by_source"]["mock"], 1);
        assert_eq!(value["results"][0]["distance_miles"], 0.8);
        assert!(value["config"]["sources_enabled"].is_array());
        assert!(value["results"][0]["description_snippet"].is_null());
    }
}
