pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    system::tracing::initialize()?;

    // Конфигурация читается один раз на старте (config.toml рядом с exe)
    shared::config::initialize()?;
    let data_dir = shared::config::get_data_dir(shared::config::get())?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // Каталог товаров (CSV-выгрузка платформы)
        .route(
            "/api/catalog",
            get(handlers::a001_catalog_product::list_all),
        )
        .route(
            "/api/catalog/upload",
            post(handlers::a001_catalog_product::upload),
        )
        // Коллекции (CSV-выгрузка платформы)
        .route("/api/collections", get(handlers::a002_collection::list_all))
        .route(
            "/api/collections/upload",
            post(handlers::a002_collection::upload),
        )
        // UseCase u101: обновление остатков по стоковой ведомости
        .route(
            "/api/u101/stock-update/start",
            post(handlers::usecases::start_stock_update),
        )
        .route(
            "/api/u101/stock-update/:session_id/progress",
            get(handlers::usecases::get_stock_update_progress),
        )
        .route(
            "/api/u101/stock-update/:session_id/cancel",
            post(handlers::usecases::cancel_stock_update),
        )
        // UseCase u102: перестроение порядка товаров в коллекциях
        .route(
            "/api/u102/collection-reorder/start",
            post(handlers::usecases::start_collection_reorder),
        )
        .route(
            "/api/u102/collection-reorder/:session_id/progress",
            get(handlers::usecases::get_collection_reorder_progress),
        )
        .route(
            "/api/u102/collection-reorder/:session_id/cancel",
            post(handlers::usecases::cancel_collection_reorder),
        )
        // Logs handlers
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], 3000).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port 3000 is already in use. Please ensure no other process is using this port."
                );
            } else {
                tracing::error!("Failed to bind to port 3000. Error: {}", e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
