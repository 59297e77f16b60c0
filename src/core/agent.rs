use crate::config::yaml_config::{AgentConfig, DEFAULT_OUTPUT_FORMAT};
use crate::core::aggregator::Aggregator;
use crate::domain::model::{Diagnostic, DiagnosticKind, RunPayload};
use crate::domain::ports::Storage;
use crate::output::{OutputWriter, WrittenPaths};
use crate::sources::SourceRegistry;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

/// 一次執行的結果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub payload: RunPayload,
    pub paths: WrittenPaths,
    pub diagnostics: Vec<Diagnostic>,
}

/// 收集但尚未寫檔的結果
#[derive(Debug, Clone)]
pub struct Collected {
    pub payload: RunPayload,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct JobAgent<S: Storage> {
    config: AgentConfig,
    registry: SourceRegistry,
    writer: OutputWriter<S>,
    monitor: SystemMonitor,
}

impl<S: Storage> JobAgent<S> {
    pub fn new(config: AgentConfig, registry: SourceRegistry, storage: S) -> Self {
        Self::new_with_monitoring(config, registry, storage, false)
    }

    pub fn new_with_monitoring(
        config: AgentConfig,
        registry: SourceRegistry,
        storage: S,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            config,
            registry,
            writer: OutputWriter::new(storage),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 解析來源、依序搜尋、去重、過濾，組成輸出內容
    pub async fn collect(&self) -> Result<Collected> {
        let run_utc = Utc::now();
        let mut diagnostics = Vec::new();

        if !self.config.output.format.eq_ignore_ascii_case(DEFAULT_OUTPUT_FORMAT) {
            let message = format!(
                "Output format '{}' is not supported, writing json",
                self.config.output.format
            );
            tracing::warn!("⚠️ {}", message);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnsupportedFormat,
                None,
                message,
            ));
        }

        let resolved = self.registry.resolve(&self.config.sources.enabled)?;
        diagnostics.extend(resolved.diagnostics);
        tracing::info!("Resolved {} sources", resolved.sources.len());

        let query = self.config.search_query();
        let aggregator = Aggregator::new(self.config.sources.on_failure);
        let outcome = aggregator.run(&resolved.sources, &query).await?;
        diagnostics.extend(outcome.diagnostics);
        self.monitor.log_stats("Fetch");

        let payload = RunPayload::new(
            run_utc,
            self.config.echo(),
            outcome.postings,
            outcome.counts_by_source,
        );

        Ok(Collected {
            payload,
            diagnostics,
        })
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting job search run");

        let Collected {
            payload,
            diagnostics,
        } = self.collect().await?;
        tracing::info!("Collected {} postings", payload.total_results);

        let paths = self.writer.write_all(&self.config.output.path, &payload).await?;
        self.monitor.log_stats("Write");
        self.monitor.log_final_stats();

        if !diagnostics.is_empty() {
            tracing::info!("Run finished with {} warning(s)", diagnostics.len());
        }

        Ok(RunReport {
            payload,
            paths,
            diagnostics,
        })
    }
}
