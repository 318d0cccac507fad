//! Connection loop
//!
//! Accepts TCP connections and serves each one on its own task until the
//! shutdown future resolves.

use crate::api::{handle, AppState};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Serve the API on `listener` until `shutdown` completes
///
/// Connections already in flight keep running on their own tasks.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    let http_server = ConnBuilder::new(TokioExecutor::new());
    tokio::pin!(shutdown);

    info!("HTTP server running at http://{}", local_addr);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((socket, peer)) => {
                        let state = state.clone();
                        let http_server = http_server.clone();
                        tokio::spawn(async move {
                            let service = service_fn(move |req: Request<Incoming>| {
                                let state = state.clone();
                                async move { Ok::<_, Infallible>(handle(req, &state).await) }
                            });
                            let conn = http_server.serve_connection(TokioIo::new(socket), service);
                            if let Err(e) = conn.await {
                                debug!(%peer, "Connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}
