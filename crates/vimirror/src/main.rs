use clap::Parser;
use vimirror::{Cli, Commands, VideoAttributes, open_helper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let helper = match open_helper(cli.config.as_deref()).await {
        Ok(helper) => helper,
        Err(message) => {
            println!("{}", message);
            return Ok(());
        }
    };

    match cli.command {
        Commands::Render { video, tag } => {
            let attributes = VideoAttributes::from(tag);
            println!("{}", helper.render(&video, &attributes).await);
        }
        Commands::Evict => {
            let removed = helper.cache().evict_expired().await?;
            tracing::info!(removed, "Evicted expired cache entries");
            println!("Removed {} expired cache entries", removed);
        }
    }

    Ok(())
}
