//! Barsuk Bot server entry point.

use std::sync::Arc;

use axum::Router;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use barsuk_bot::adapters::http::console::{console_routes, ConsoleHandlers};
use barsuk_bot::adapters::http::health_routes;
use barsuk_bot::adapters::notify::StaffNotifier;
use barsuk_bot::adapters::postgres::{
    PostgresContentReader, PostgresEventLog, PostgresRequestRepository, PostgresUserRepository,
};
use barsuk_bot::adapters::session::{InMemorySessionStore, RedisSessionStore};
use barsuk_bot::adapters::telegram::{webhook_routes, TelegramConfig, TelegramMessenger, WebhookState};
use barsuk_bot::application::handlers::console::{
    GetRequestHandler, ListRequestsHandler, ReplyToRequestHandler, UpdateRequestStatusHandler,
};
use barsuk_bot::application::Dispatcher;
use barsuk_bot::config::{
    AppConfig, RedisConfig, ServerConfig, SessionBackend, SessionConfig, ValidationError,
};
use barsuk_bot::ports::{Messenger, RequestRepository, SessionStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    tracing::info!(
        environment = ?config.server.environment,
        session_backend = ?config.session.backend,
        console_enabled = config.console.is_enabled(),
        "Starting barsuk-bot"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let sessions = session_store(&config.session, &config.redis).await?;

    let telegram = TelegramConfig::new(config.telegram.bot_token.expose_secret().as_str())
        .with_base_url(config.telegram.api_base_url.as_str())
        .with_timeout(config.telegram.send_timeout());
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(telegram)?);
    let staff_chats = config.telegram.staff_chats()?;
    if staff_chats.is_empty() {
        tracing::warn!("No staff chats configured; new requests are only logged");
    }
    let notifier = Arc::new(StaffNotifier::new(messenger.clone(), staff_chats));

    let requests: Arc<dyn RequestRepository> = Arc::new(PostgresRequestRepository::new(pool.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        requests.clone(),
        Arc::new(PostgresEventLog::new(pool.clone())),
        Arc::new(PostgresContentReader::new(pool.clone())),
        sessions,
        messenger.clone(),
        notifier,
    ));

    let mut app = Router::new()
        .merge(health_routes())
        .merge(webhook_routes(WebhookState::new(
            dispatcher,
            config.telegram.webhook_secret.clone(),
        )));

    if let Some(api_key) = config.console.api_key.clone() {
        let handlers = ConsoleHandlers::new(
            Arc::new(ListRequestsHandler::new(requests.clone())),
            Arc::new(GetRequestHandler::new(requests.clone())),
            Arc::new(UpdateRequestStatusHandler::new(requests.clone())),
            Arc::new(ReplyToRequestHandler::new(requests, messenger)),
        );
        app = app.merge(console_routes(handlers, api_key));
    }

    let app = app
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close(pool).await;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if server.use_json_logs() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn session_store(
    session: &SessionConfig,
    redis: &RedisConfig,
) -> Result<Arc<dyn SessionStore>, BoxError> {
    match session.backend {
        SessionBackend::Memory => {
            tracing::warn!("In-memory sessions: in-progress flows are lost on restart");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
        SessionBackend::Redis => {
            let url = redis
                .url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("BARSUK__REDIS__URL"))?;
            let client = redis::Client::open(url)?;
            let conn = tokio::time::timeout(
                redis.timeout(),
                client.get_multiplexed_tokio_connection(),
            )
            .await??;
            Ok(Arc::new(RedisSessionStore::new(conn, session.ttl_secs)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

async fn close(pool: PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}
