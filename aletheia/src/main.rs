use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aletheia::api::{ApiServer, ApiServerConfig, AppState};
use aletheia::llm::GatewayClient;
use aletheia::pipeline::{QueryResolver, ResolveRequest};
use aletheia_store::{
    AgentLifecycleManager, CacheMaintainer, MemoryStore, ReloadScope, SystemReporter,
    DEFAULT_INACTIVE_MINUTES,
};

#[derive(Parser)]
#[command(name = "aletheia")]
#[command(about = "Verified query resolution with a content-addressed response cache", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Bind port
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Resolve a single query
    Resolve {
        /// The query text
        query: String,

        /// Domain hint for the model persona (e.g., "cardiology")
        #[arg(short, long)]
        domain: Option<String>,

        /// Skip the cache probe and force a fresh generation
        #[arg(long)]
        no_cache: bool,
    },

    /// Reload cache statistics and evict stale entries
    Reload {
        /// Cache scope: all, queries, or embeddings
        #[arg(long, default_value = "all")]
        cache_type: String,

        /// Minimum access count for the reload statistics
        #[arg(long, default_value_t = 1)]
        min_access_count: u64,
    },

    /// Transition stale agents and reclaim their resources
    Optimize {
        /// Minutes of inactivity before an agent is transitioned
        #[arg(long, default_value_t = DEFAULT_INACTIVE_MINUTES)]
        inactive_threshold_minutes: i64,
    },

    /// Print a system-wide status snapshot
    Stats,
}

fn build_state() -> Result<Arc<AppState>> {
    let store = Arc::new(MemoryStore::new());
    let client = Arc::new(GatewayClient::from_env()?);
    Ok(Arc::new(AppState {
        resolver: Arc::new(QueryResolver::new(client, store.clone())),
        maintainer: CacheMaintainer::new(store.clone()),
        lifecycle: AgentLifecycleManager::new(store.clone()),
        reporter: SystemReporter::new(store),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "aletheia=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let server = ApiServer::new(ApiServerConfig { host, port }, build_state()?);
            server.start().await?;
        }

        Commands::Resolve {
            ref query,
            ref domain,
            no_cache,
        } => {
            let state = build_state()?;
            let mut request = ResolveRequest::new(query.clone());
            request.domain_hint = domain.clone();
            request.use_cache = !no_cache;

            let resolution = state.resolver.resolve(&request).await?;
            println!("{}", resolution.answer_text);
            println!();
            println!(
                "confidence: {:.2}  cached: {}  reprompted: {}",
                resolution.confidence, resolution.cached, resolution.reprompted
            );
        }

        Commands::Reload {
            ref cache_type,
            min_access_count,
        } => {
            let scope: ReloadScope = cache_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let state = build_state()?;
            let report = state.maintainer.reload(scope, min_access_count).await?;
            println!(
                "Reloaded {} queries, {} embeddings. Cleaned {} stale entries.",
                report.reloaded_queries, report.reloaded_embeddings, report.cleaned_count
            );
        }

        Commands::Optimize {
            inactive_threshold_minutes,
        } => {
            let state = build_state()?;
            let report = state.lifecycle.optimize(inactive_threshold_minutes).await?;
            println!(
                "Terminated {} agents, idled {}, freed {}MB memory.",
                report.terminated_count, report.idled_count, report.memory_freed_mb
            );
            println!(
                "Agents: {} total ({} active, {} idle, {} terminated), {}MB in use, avg cpu {:.1}%",
                report.stats.total_agents,
                report.stats.active_agents,
                report.stats.idle_agents,
                report.stats.terminated_agents,
                report.stats.total_memory_mb,
                report.stats.avg_cpu_usage
            );
        }

        Commands::Stats => {
            let state = build_state()?;
            let report = state.reporter.report().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
