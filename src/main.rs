use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use animal_etl::config::Config;
use animal_etl::logging;
use animal_etl::pipeline::EtlPipeline;

#[derive(Parser)]
#[command(name = "animal_etl")]
#[command(about = "Batch ETL job that republishes animal records between HTTP endpoints")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the complete ETL process
    Run {
        /// Path to the config file (defaults to ./config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging; the guard must outlive the run so file logs flush
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            info!("Starting ETL run against {}", config.api_url);

            let pipeline = EtlPipeline::new(config);
            let result = pipeline.run().await?;

            println!("\n📊 ETL Run Results:");
            println!("   Animals fetched: {}", result.total_fetched);
            println!("   Batches posted: {}", result.batches_posted);
            println!("   Batches rejected: {}", result.batches_rejected);
            println!("   Batches failed: {}", result.batches_failed);

            if !result.errors.is_empty() {
                println!("\n⚠️  Errors encountered:");
                for error in &result.errors {
                    println!("   - {error}");
                }
            }
        }
    }

    Ok(())
}
