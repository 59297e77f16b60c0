use crate::core::aggregator::FailurePolicy;
use crate::domain::model::{ConfigEcho, LocationEcho, SearchQuery};
use crate::utils::error::{AgentError, Result};
use crate::utils::validation::{self, Validate};
use serde_yaml::Value;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const DEFAULT_OUTPUT_PATH: &str = "data/jobs.json";
pub const DEFAULT_OUTPUT_FORMAT: &str = "json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectInfo {
    pub name: String,
    pub agent: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSettings {
    pub city: String,
    pub state: String,
    pub country: String,
    /// 未設定或不是數字時為 None，此時不做距離過濾
    pub radius_miles: Option<f64>,
}

impl LocationSettings {
    /// 例如 "Budd Lake, NJ"
    pub fn display_name(&self) -> String {
        [self.city.as_str(), self.state.as_str()]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSettings {
    pub location: LocationSettings,
    pub max_results_per_source: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Targets {
    pub keywords: Vec<String>,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSettings {
    pub enabled: Vec<String>,
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub format: String,
    pub path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_OUTPUT_FORMAT.to_string(),
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

/// 從 YAML 設定檔讀入的完整設定。缺少的鍵一律使用預設值。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentConfig {
    pub project: ProjectInfo,
    pub search: SearchSettings,
    pub targets: Targets,
    pub sources: SourceSettings,
    pub output: OutputSettings,
}

impl AgentConfig {
    /// 從 YAML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AgentError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// 從 YAML 字串解析配置
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        let root: Value = serde_yaml::from_str(&processed)?;

        if !root.is_mapping() {
            return Err(AgentError::config(
                "Config file did not parse into a mapping.",
            ));
        }

        Ok(Self::from_value(&root))
    }

    fn from_value(root: &Value) -> Self {
        let on_failure = match string_at(root, &["sources", "on_failure"]).as_str() {
            "continue" => FailurePolicy::Continue,
            "" | "abort" => FailurePolicy::Abort,
            other => {
                tracing::warn!("Unknown sources.on_failure '{}', using 'abort'", other);
                FailurePolicy::Abort
            }
        };

        let output_path = string_at(root, &["output", "path"]);
        let output_format = string_at(root, &["output", "format"]);

        Self {
            project: ProjectInfo {
                name: string_at(root, &["project", "name"]),
                agent: string_at(root, &["project", "agent"]),
                version: string_at(root, &["project", "version"]),
            },
            search: SearchSettings {
                location: LocationSettings {
                    city: string_at(root, &["search", "location", "city"]),
                    state: string_at(root, &["search", "location", "state"]),
                    country: string_at(root, &["search", "location", "country"]),
                    radius_miles: lookup(root, &["search", "location", "radius_miles"])
                        .and_then(coerce_f64),
                },
                max_results_per_source: lookup(root, &["search", "max_results_per_source"])
                    .and_then(coerce_f64)
                    .filter(|n| *n >= 0.0)
                    .map(|n| n as u32)
                    .unwrap_or(0),
            },
            targets: Targets {
                keywords: list_at(root, &["targets", "keywords"]),
                titles: list_at(root, &["targets", "titles"]),
            },
            sources: SourceSettings {
                enabled: source_names_at(root, &["sources", "enabled"]),
                on_failure,
            },
            output: OutputSettings {
                format: if output_format.is_empty() {
                    DEFAULT_OUTPUT_FORMAT.to_string()
                } else {
                    output_format
                },
                path: if output_path.is_empty() {
                    DEFAULT_OUTPUT_PATH.to_string()
                } else {
                    output_path
                },
            },
        }
    }

    /// 命令列的 `--sources` 會完全取代設定檔中的來源清單
    pub fn apply_source_override(&mut self, sources: Option<Vec<String>>) {
        if let Some(sources) = sources {
            tracing::info!("🔧 Sources overridden to: {}", sources.join(", "));
            self.sources.enabled = sources;
        }
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            location_name: self.search.location.display_name(),
            radius_miles: self.search.location.radius_miles,
            max_results_per_source: self.search.max_results_per_source,
            keywords: self.targets.keywords.clone(),
            titles: self.targets.titles.clone(),
        }
    }

    pub fn echo(&self) -> ConfigEcho {
        let location = &self.search.location;
        ConfigEcho {
            location: LocationEcho {
                city: location.city.clone(),
                state: location.state.clone(),
                country: location.country.clone(),
                radius_miles: location.radius_miles,
            },
            max_results_per_source: self.search.max_results_per_source,
            keywords: self.targets.keywords.clone(),
            titles: self.targets.titles.clone(),
            sources_enabled: self.sources.enabled.clone(),
        }
    }

    /// 執行前印出的執行計畫
    pub fn render_run_plan(&self, dry_run: bool) -> String {
        let location = &self.search.location;
        let radius = location
            .radius_miles
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unlimited".to_string());
        let banner = if dry_run {
            "=== AI Career Agent: Local Job Search (dry run) ==="
        } else {
            "=== AI Career Agent: Local Job Search ==="
        };

        let mut plan = String::new();
        let _ = writeln!(plan, "{}", banner);
        let _ = writeln!(
            plan,
            "Project: {} | Agent: {} | Version: {}",
            self.project.name, self.project.agent, self.project.version
        );
        let _ = writeln!(plan);
        let _ = writeln!(plan, "Search:");
        let _ = writeln!(
            plan,
            "  Location: {}, {} {}",
            location.city, location.state, location.country
        );
        let _ = writeln!(plan, "  Radius (miles): {}", radius);
        let _ = writeln!(
            plan,
            "  Max results per source: {}",
            self.search.max_results_per_source
        );
        let _ = writeln!(plan);
        let _ = writeln!(plan, "Targets:");
        let _ = writeln!(plan, "  Keywords: {}", self.targets.keywords.join(", "));
        let _ = writeln!(plan, "  Titles: {}", self.targets.titles.join(", "));
        let _ = writeln!(plan);
        let _ = writeln!(plan, "Sources enabled:");
        for source in &self.sources.enabled {
            let _ = writeln!(plan, "  - {}", source);
        }
        let _ = writeln!(plan);
        let _ = writeln!(plan, "Output:");
        let _ = writeln!(plan, "  Format: {}", self.output.format);
        let _ = writeln!(plan, "  Path: {}", self.output.path);
        let _ = write!(plan, "{}", "=".repeat(banner.chars().count()));
        plan
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> Result<()> {
        // 來源名稱與半徑不在這裡檢查：未知名稱由 registry 回報警告
        validation::validate_path("output.path", &self.output.path)?;
        Ok(())
    }
}

/// 替換環境變數 (例如 ${USAJOBS_USER_AGENT})
fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| AgentError::config(format!("Invalid substitution pattern: {}", e)))?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

fn lookup<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(root, |node, key| node.get(*key))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_at(root: &Value, keys: &[&str]) -> String {
    lookup(root, keys)
        .and_then(scalar_to_string)
        .unwrap_or_default()
}

fn list_at(root: &Value, keys: &[&str]) -> Vec<String> {
    match lookup(root, keys) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    }
}

/// 來源清單中不是純量的項目 (null、巢狀結構) 以 YAML 文字保留，交給 registry 當作未知來源回報
fn source_names_at(root: &Value, keys: &[&str]) -> Vec<String> {
    match lookup(root, keys) {
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                scalar_to_string(item).unwrap_or_else(|| {
                    serde_yaml::to_string(item)
                        .map(|text| text.trim().to_string())
                        .unwrap_or_default()
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
