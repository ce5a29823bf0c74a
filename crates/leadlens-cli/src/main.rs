use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "leadlens-cli")]
#[command(about = "Leadlens command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a discovery pipeline for a query and export the ranked leads.
    Scrape {
        /// Search query fanned out to every source connector.
        #[arg(long)]
        query: String,
        /// Export format for the lead list.
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write the export here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Drop leads whose landing page produced no scoring signals.
        #[arg(long)]
        quality_filter: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape {
            query,
            format,
            output,
            quality_filter,
        }) => run_scrape(&query, format, output, quality_filter).await,
        None => {
            println!("leadlens-cli: try `scrape --query <QUERY>`");
            Ok(())
        }
    }
}

async fn run_scrape(
    query: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
    quality_filter: bool,
) -> anyhow::Result<()> {
    let app_config = leadlens_core::load_app_config()?;
    let mut config = app_config.run_config();
    if quality_filter {
        config.quality_filter = true;
    }

    let fetcher = leadlens_scraper::HttpFetcher::new(config.user_agents.clone())
        .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?;
    let profiles = leadlens_scraper::default_profiles();
    let run = leadlens_scraper::run_discovery(query, &config, &profiles, &fetcher).await?;

    for outcome in &run.source_outcomes {
        match &outcome.error {
            Some(reason) => {
                tracing::warn!(source = %outcome.source, reason = %reason, "source failed — skipped");
            }
            None => println!(
                "source {}: {} candidates",
                outcome.source, outcome.candidate_count
            ),
        }
    }
    println!("{} leads after dedup and enrichment", run.leads.len());

    let body = match format {
        ExportFormat::Csv => leadlens_scraper::to_csv(&run),
        ExportFormat::Json => leadlens_scraper::to_json(&run)
            .map_err(|e| anyhow::anyhow!("failed to serialize leads: {e}"))?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, body).await?;
            println!("wrote export to {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}
