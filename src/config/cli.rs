use crate::config::yaml_config::DEFAULT_CONFIG_PATH;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "local-job-agent")]
#[command(about = "Aggregate local job postings from configured sources")]
pub struct CliConfig {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the enabled sources from the config file
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub sources: Option<Vec<String>>,

    /// Print the run plan without searching
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log CPU and memory usage for each phase
    #[arg(long)]
    pub monitor: bool,
}
