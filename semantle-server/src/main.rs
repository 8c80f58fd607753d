use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use semantle_core::{FALLBACK_WORD, WordPool};
use semantle_persistence::{StatsRepository, StatsStore};
use semantle_server::{
    config::Config,
    create_routes,
    embeddings::{EmbeddingService, OpenAiEmbeddingProvider},
    game_manager::GameManager,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("semantle-server {}", env!("CARGO_PKG_VERSION"));

    let config = Config::new();

    let Some(api_key) = config.openai_api_key.clone() else {
        error!("OPENAI_API_KEY environment variable is not set.");
        error!("Set it in the environment before starting the server.");
        std::process::exit(1);
    };

    let embedding_timeout = Duration::from_secs(config.embedding_timeout_seconds);
    let provider = match OpenAiEmbeddingProvider::new(
        api_key,
        &config.openai_base_url,
        &config.embedding_model,
        embedding_timeout,
    ) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create embedding client: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Using embedding model {} at {}",
        provider.model(),
        config.openai_base_url
    );
    let embeddings =
        Arc::new(EmbeddingService::new(Arc::new(provider)).with_timeout(embedding_timeout));

    info!("Loading words from {}", config.words_file);
    let word_pool = WordPool::load(&config.words_file);
    if word_pool.is_empty() {
        warn!(
            "Word pool is empty; every game will use '{}' as its target",
            FALLBACK_WORD
        );
    }

    let game_manager = Arc::new(GameManager::new(word_pool, embeddings));
    let stats_store: Arc<dyn StatsStore> = Arc::new(StatsRepository::new(&config.stats_file));
    info!("Recording stats in {}", config.stats_file);

    let routes = create_routes(
        game_manager.clone(),
        stats_store,
        config.allowed_origins.clone(),
    );

    // Idle sessions are swept every five minutes
    let cleanup_game_manager = game_manager.clone();
    let session_timeout = Duration::from_secs(config.session_timeout_minutes * 60);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            cleanup_game_manager.cleanup_expired_sessions(session_timeout);
        }
    });

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());
    info!("Listening on http://{}", addr);

    server.await;
    info!("Stopped accepting requests; {} sessions dropped", game_manager.session_count());
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Interrupted, shutting down"),
        _ = terminate => info!("Terminated, shutting down"),
    }
}
