use clap::Parser;
use std::path::PathBuf;

use gasguard_core::config::Config;
use gasguard_core::store::GuardDb;
use gasguard_server::notify::Notifier;
use gasguard_server::state::AppState;

#[derive(Parser)]
#[command(
    name = "gasguard",
    about = "Sensor monitoring and actuator control server",
    version
)]
struct Cli {
    /// Port to listen on (overrides the config file)
    #[arg(long, env = "GASGUARD_PORT")]
    port: Option<u16>,

    /// Path to the YAML config file
    #[arg(long, env = "GASGUARD_CONFIG", default_value = "gasguard.yaml")]
    config: PathBuf,

    /// Path to the database file
    #[arg(long, env = "GASGUARD_DB", default_value = "gasguard.db")]
    db: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)?;
    let port = cli.port.unwrap_or(config.port);

    let notifier = match &config.telegram {
        Some(tg) => {
            tracing::info!("telegram notifications enabled");
            Some(Notifier::new(tg))
        }
        None => {
            tracing::warn!("telegram not configured; notifications disabled");
            None
        }
    };

    let db = GuardDb::open(&cli.db)?;
    let app_state = AppState::new(db, config, notifier);

    gasguard_server::serve(app_state, port).await
}
