//! StayLink realtime server.
//!
//! Entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use staylink_core::config::AppConfig;
use staylink_core::error::AppError;
use staylink_core::traits::TokenVerifier;

use staylink_auth::jwt::JwtVerifier;
use staylink_database::repositories::{
    ChatRepository, NotificationRepository, PresenceRepository,
};
use staylink_database::DatabasePool;
use staylink_provider::{BotRelaySender, HttpPushSender};
use staylink_realtime::connection::SocketAuthenticator;
use staylink_realtime::message::validator::TextRules;
use staylink_realtime::{
    ChatCoordinator, ConnectionRegistry, NotificationDispatcher, PresenceTracker, RealtimeEngine,
    RoomBroadcaster,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STAYLINK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StayLink realtime server v{}", env!("CARGO_PKG_VERSION"));

    // Database
    let db = DatabasePool::connect(&config.database).await?;
    let chat_repo = Arc::new(ChatRepository::new(db.pool().clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db.pool().clone()));
    let presence_repo = Arc::new(PresenceRepository::new(db.pool().clone()));

    // Auth
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(&config.auth));
    let authenticator = SocketAuthenticator::new(verifier);

    // Realtime core
    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone()));
    let presence = Arc::new(PresenceTracker::new(registry.clone(), presence_repo));
    let rules = TextRules {
        min_chars: 1,
        max_chars: config.realtime.max_text_length,
    };
    let coordinator = ChatCoordinator::new(
        chat_repo,
        registry.clone(),
        broadcaster.clone(),
        rules,
    );
    let engine = Arc::new(RealtimeEngine::new(
        config.realtime.clone(),
        registry.clone(),
        presence.clone(),
        coordinator,
        broadcaster.clone(),
        notification_repo.clone(),
    ));

    // Notification dispatch
    let push = Arc::new(HttpPushSender::new(config.providers.push.clone())?);
    let bot = Arc::new(BotRelaySender::new(config.providers.bot.clone())?);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        presence,
        broadcaster,
        notification_repo,
        push,
        bot,
    ));
    let (event_tx, event_rx) = NotificationDispatcher::channel(config.notifications.event_queue_size);
    let dispatcher_task = dispatcher.spawn(event_rx);
    tracing::info!("Notification dispatcher started");

    // HTTP server
    let app_state = staylink_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        authenticator,
        engine: engine.clone(),
        registry,
    };
    let app = staylink_api::build_router(app_state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("StayLink server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // Graceful teardown: close every live session so offline transitions
    // are persisted, then drain the notification queue.
    tracing::info!("Shutting down realtime sessions...");
    engine.shutdown().await;

    drop(event_tx);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), dispatcher_task).await;

    db.close().await;
    tracing::info!("StayLink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
