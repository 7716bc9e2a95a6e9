use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware для логирования HTTP запросов
///
/// Пишет в tracing: длительность, статус, метод и путь.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed();
    if status < 400 {
        tracing::info!("{:>5}ms | {} {:>6} {}", duration.as_millis(), status, method, path);
    } else {
        tracing::warn!("{:>5}ms | {} {:>6} {}", duration.as_millis(), status, method, path);
    }

    response
}
