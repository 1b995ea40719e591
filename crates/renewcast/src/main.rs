use anyhow::{Context, Result};
use clap::Parser;
use renewcast_models::RenewcastConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "renewcast", about = "Upcoming recurring sales and revenue dashboard")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/renewcast.toml")]
    config: String,

    /// Emit the dashboard as JSON instead of text tables
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config: {}", cli.config))?;
    let config: RenewcastConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?;

    let estimator = renewcast::build_estimator(&config)
        .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
    tracing::info!(store = %config.store.sqlite_path, "estimator ready");

    if cli.json {
        let dashboard = renewcast::report::dashboard_json(&estimator).await?;
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        let dashboard = renewcast::report::render_dashboard(&estimator).await?;
        print!("{dashboard}");
    }

    Ok(())
}
