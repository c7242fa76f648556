/// Cadence Bot - multi-room music bot core
use anyhow::Context;
use cadence_bot::{api, config::BotConfig, dispatcher::Controller, state::AppState};
use cadence_core::ResolveResult;
use cadence_node_client::LavalinkClient;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-bot")]
#[command(about = "Cadence music bot core and gateway bridge API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge API server
    Serve,
    /// Resolve a query against the audio node and print the result
    Resolve {
        /// Search terms or a link
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_bot=info,cadence_playback=info,cadence_node_client=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = BotConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Resolve { query } => resolve(&config, &query.join(" ")).await?,
        Commands::Config => print_config(config)?,
    }

    Ok(())
}

async fn serve(config: BotConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cadence bot");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Node connections are lazy; the first resolve or player update reaches out
    let client = LavalinkClient::new(config.node_config())?;
    tracing::info!(node = %client.name(), url = %client.url(), "Audio node configured");

    let controller = Controller::new(Arc::new(client.clone()), &config)?
        .with_node_sessions(Arc::new(client));
    let controller = Arc::new(controller);

    spawn_page_sweeper(Arc::clone(&controller), config.pagination.timeout_secs);

    let app = api::router(AppState::new(Arc::clone(&controller)));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.shutdown().await;
    tracing::info!("Cadence bot stopped");

    Ok(())
}

/// Periodically drop page state for queue messages nobody is paging through
fn spawn_page_sweeper(controller: Arc<Controller>, timeout_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(timeout_secs.max(1)));
        loop {
            interval.tick().await;
            controller.pages().purge_expired().await;
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Could not listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = term => {},
    }

    tracing::warn!("Shutdown signal received");
}

async fn resolve(config: &BotConfig, query: &str) -> anyhow::Result<()> {
    let client = LavalinkClient::new(config.node_config())?;
    let result = client
        .load_tracks(query)
        .await
        .with_context(|| format!("resolving {query:?} on node {}", client.name()))?;

    match result {
        ResolveResult::NoMatch => println!("No matches"),
        ResolveResult::Track { track } => {
            println!(
                "Track: {} - {} [{}]",
                track.author,
                track.title,
                track.uri.as_deref().unwrap_or("-")
            );
        }
        ResolveResult::Search { tracks } => {
            println!("Search results:");
            for (i, track) in tracks.iter().enumerate() {
                println!(
                    "  {:>2}. {} - {} [{}]",
                    i + 1,
                    track.author,
                    track.title,
                    track.uri.as_deref().unwrap_or("-")
                );
            }
        }
        ResolveResult::Playlist { info, tracks } => {
            println!("Playlist: {} ({} tracks)", info.name, tracks.len());
            for (i, track) in tracks.iter().enumerate() {
                println!("  {:>3}. {} - {}", i + 1, track.author, track.title);
            }
        }
    }

    Ok(())
}

fn print_config(mut config: BotConfig) -> anyhow::Result<()> {
    if !config.node.password.is_empty() {
        config.node.password = "********".to_string();
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
