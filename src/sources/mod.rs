pub mod mock;
pub mod placeholder;
pub mod usajobs;

use crate::domain::model::{Diagnostic, DiagnosticKind};
use crate::domain::ports::Source;
use crate::utils::error::Result;

pub use mock::MockSource;
pub use placeholder::PlaceholderSource;
pub use usajobs::UsaJobsSource;

pub type SourceFactory = Box<dyn Fn() -> Result<Box<dyn Source>> + Send + Sync>;

/// 來源名稱到建構函式的對照表
pub struct SourceRegistry {
    factories: Vec<(String, SourceFactory)>,
}

/// `resolve` 的結果：依設定順序建立的來源，以及略過的名稱所產生的警告
pub struct ResolvedSources {
    pub sources: Vec<Box<dyn Source>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// 內建的所有來源
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(MockSource::NAME, || Ok(Box::new(MockSource::new())));
        registry.register(UsaJobsSource::NAME, || {
            Ok(Box::new(UsaJobsSource::from_env()?))
        });
        registry.register("indeed", || Ok(Box::new(PlaceholderSource::indeed())));
        registry.register("monster", || Ok(Box::new(PlaceholderSource::monster())));
        registry
    }

    /// 註冊來源；同名時覆蓋先前的建構函式
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn Source>> + Send + Sync + 'static,
    {
        let factory: SourceFactory = Box::new(factory);
        match self.factories.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = factory,
            None => self.factories.push((name.to_string(), factory)),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// 依 `enabled` 的順序建立來源。未知名稱只產生警告，不中止執行。
    pub fn resolve(&self, enabled: &[String]) -> Result<ResolvedSources> {
        let mut sources = Vec::with_capacity(enabled.len());
        let mut diagnostics = Vec::new();

        for name in enabled {
            match self.factories.iter().find(|(n, _)| n == name) {
                Some((_, factory)) => sources.push(factory()?),
                None => {
                    let message = format!("Unknown source '{}' - skipping", name);
                    tracing::warn!("⚠️ {}", message);
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnknownSource,
                        Some(name.as_str()),
                        message,
                    ));
                }
            }
        }

        Ok(ResolvedSources {
            sources,
            diagnostics,
        })
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_sources_registered() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.names(), vec!["mock", "usajobs", "indeed", "monster"]);
    }

    #[test]
    fn test_resolve_preserves_enabled_order() {
        let registry = SourceRegistry::builtin();
        let resolved = registry
            .resolve(&names(&["monster", "mock", "indeed"]))
            .unwrap();

        let order: Vec<&str> = resolved.sources.iter().map(|s| s.name()).collect();
        assert_eq!(order, vec!["monster", "mock", "indeed"]);
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_source_is_skipped_with_diagnostic() {
        let registry = SourceRegistry::builtin();
        let resolved = registry
            .resolve(&names(&["linkedin", "mock"]))
            .unwrap();

        assert_eq!(resolved.sources.len(), 1);
        assert_eq!(resolved.sources[0].name(), "mock");
        assert_eq!(resolved.diagnostics.len(), 1);
        assert_eq!(resolved.diagnostics[0].kind, DiagnosticKind::UnknownSource);
        assert_eq!(resolved.diagnostics[0].source.as_deref(), Some("linkedin"));
    }

    #[test]
    fn test_blank_names_are_unknown_sources() {
        let registry = SourceRegistry::builtin();
        let resolved = registry.resolve(&names(&["mock", "", "  ", "null"])).unwrap();

        assert_eq!(resolved.sources.len(), 1);
        assert_eq!(resolved.diagnostics.len(), 3);
        assert!(resolved
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::UnknownSource));
        assert_eq!(resolved.diagnostics[0].source.as_deref(), Some(""));
    }

    #[test]
    fn test_register_replaces_existing_factory() {
        let mut registry = SourceRegistry::new();
        registry.register("mock", || Ok(Box::new(PlaceholderSource::indeed())));
        registry.register("mock", || Ok(Box::new(MockSource::new())));

        assert_eq!(registry.names(), vec!["mock"]);
        let resolved = registry.resolve(&names(&["mock"])).unwrap();
        assert_eq!(resolved.sources[0].name(), "mock");
    }
}
