use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hikejo::database::Database;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Redis holding the HikeJo documents.
    #[arg(long, env = "REDIS_URL")]
    redis_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load `<slug>.html` for every static page found in DIR.
    Pages { dir: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let database = Database::connect(Some(&args.redis_url)).await?;

    match args.command {
        Command::Pages { dir } => {
            let report = seed::load_pages(&database, &dir).await?;

            println!("Loaded Pages: {}", report.loaded.len());
            if !report.skipped.is_empty() {
                println!("Skipped Pages: {}", report.skipped.len());
            }
        }
    }

    Ok(())
}
