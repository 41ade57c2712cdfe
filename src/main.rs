use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use vyapaar_backend::auth::{RemoteTokenVerifier, StaticTokenVerifier, TokenVerifier};
use vyapaar_backend::{app, create_pool, AppConfig, AppState, MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // Storage backend, chosen once at startup
    let store: Arc<dyn Store> = match &config.database.url {
        Some(url) => {
            let pool = create_pool(url).await?;
            let pg = PgStore::new(pool);
            pg.ensure_schema().await?;
            info!("Database pool created, schema ensured");
            Arc::new(pg)
        }
        None => {
            let memory = MemoryStore::new();
            memory.seed_demo(&config.auth.dev_uid).await;
            info!(
                "No DATABASE_URL configured, running in demo mode (in-memory store, owner {})",
                config.auth.dev_uid
            );
            Arc::new(memory)
        }
    };

    // Token verification backend
    let verifier: Arc<dyn TokenVerifier> = match &config.auth.verify_url {
        Some(url) => {
            info!("Token verification via {}", url);
            Arc::new(RemoteTokenVerifier::new(url.clone()))
        }
        None => {
            info!("No AUTH_VERIFY_URL configured, accepting the dev token only");
            Arc::new(
                StaticTokenVerifier::new()
                    .with_token(config.auth.dev_token.clone(), config.auth.dev_uid.clone()),
            )
        }
    };

    let state = AppState::new(store, verifier);
    let router = app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET    /health                       - health check");
    info!("  GET    /api/payments                 - list payment reminders");
    info!("  POST   /api/payments                 - create payment reminder");
    info!("  PUT    /api/payments/:id             - update payment reminder");
    info!("  DELETE /api/payments/:id             - delete payment reminder");
    info!("  PUT    /api/payments/:id/mark-paid   - mark reminder paid");
    info!("  GET    /api/payments/stats           - reminder statistics");
    info!("  GET    /api/dashboard/stats          - dashboard snapshot");
    info!("  GET    /api/dashboard/insights       - business insights");
    info!("  GET    /api/inventory                - list inventory");
    info!("  POST   /api/inventory                - add product");
    info!("  PUT    /api/inventory/:id            - update product");
    info!("  DELETE /api/inventory/:id            - delete product");
    info!("  GET    /api/invoices                 - list invoices");
    info!("  POST   /api/invoices                 - create invoice");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
