//! HTTP middleware: request logging.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;

/// Log method, path, status and latency for every request.
pub(crate) async fn log_requests(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} -> {} ({} ms)",
        addr.ip(),
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
