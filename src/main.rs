use anyhow::Context;
use clap::Parser;
use local_job_agent::utils::{logger, validation::Validate};
use local_job_agent::{AgentConfig, CliConfig, JobAgent, LocalStorage, SourceRegistry};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("❌ Run failed: {:#}", e);
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = AgentConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config '{}'", cli.config))?;
    config.apply_source_override(cli.sources.clone());
    config.validate()?;
    tracing::debug!("Resolved config: {:?}", config);

    println!("{}", config.render_run_plan(cli.dry_run));

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No searches will be performed");
        return Ok(());
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let agent = JobAgent::new_with_monitoring(
        config,
        SourceRegistry::builtin(),
        LocalStorage::current_dir(),
        cli.monitor,
    );
    let report = agent.run().await?;

    for diagnostic in &report.diagnostics {
        eprintln!("WARNING: {}", diagnostic.message);
    }

    println!();
    println!("Counts by source:");
    for (source, count) in &report.payload.counts_by_source {
        println!("  {}: {}", source, count);
    }
    println!("Total results: {}", report.payload.total_results);
    println!("✅ Wrote {}", report.paths.primary);
    println!("📸 Snapshot {}", report.paths.snapshot);

    Ok(())
}
