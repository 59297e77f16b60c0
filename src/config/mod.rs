#[cfg(feature = "cli")]
pub mod cli;
pub mod yaml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use yaml_config::AgentConfig;
