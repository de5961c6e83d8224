use std::sync::Arc;

use clap::{ArgAction, Parser, ValueEnum};
use eventplanner_cli::{Console, Planner, run};
use eventplanner_config::{Settings, StoreBackend};
use eventplanner_db::{DocumentStore, MemoryStore, MongoStore, connect, indexes::ensure_indexes};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Basic event planner backed by a document store
#[derive(Parser)]
#[command(name = "eventplanner")]
#[command(version)]
struct Cli {
    /// Store backend (overrides store.backend)
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// MongoDB connection string (overrides database.url)
    #[arg(long)]
    database_url: Option<String>,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Mongo,
    Memory,
}

impl From<Backend> for StoreBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mongo => StoreBackend::Mongo,
            Backend::Memory => StoreBackend::Memory,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("eventplanner={level},eventplanner_cli={level},eventplanner_services={level},eventplanner_db={level}").into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = Settings::load()?;
    if let Some(backend) = cli.backend {
        settings.store.backend = backend.into();
    }
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }

    let store: Arc<dyn DocumentStore> = match settings.store.backend {
        StoreBackend::Mongo => {
            let db = connect(&settings).await?;
            ensure_indexes(&db).await?;
            Arc::new(MongoStore::new(db))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; nothing is kept after exit");
            Arc::new(MemoryStore::new())
        }
    };
    info!(backend = ?settings.store.backend, "Store ready");

    let planner = Planner::new(store);
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    run(&planner, &mut console).await?;

    Ok(())
}
