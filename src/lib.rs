pub mod config;
pub mod core;
pub mod domain;
pub mod output;
pub mod sources;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AgentConfig;
pub use core::agent::{JobAgent, RunReport};
pub use core::aggregator::{Aggregator, FailurePolicy};
pub use domain::model::{Diagnostic, DiagnosticKind, Posting, RunPayload};
pub use output::{LocalStorage, OutputWriter};
pub use sources::SourceRegistry;
pub use utils::error::{AgentError, Result};
