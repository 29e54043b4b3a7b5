//! HTTP control plane: server lifecycle, routing, and the document envelope.

mod document;
mod handlers;
mod http;
mod router;


use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::engine::{Engine, Info};
use crate::error::{AppError, AppResult};
use crate::shutdown::ShutdownSignal;

pub use document::{
    CONTENT_TYPE, CollectionDocument, ErrorDocument, ErrorEntry, Resource, ResourceDocument,
    StatusPatch,
};

/// Upper bound on the graceful drain after the cancellation signal fires.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) struct ApiContext {
    pub(crate) engine: Arc<Engine>,
    pub(crate) info: Info,
    pub(crate) shutdown: Arc<ShutdownSignal>,
}

/// Control-plane server: one engine handle, one cancellation signal, one
/// Info value. Constructed once before `run` and shared by every request,
/// never rebuilt per request.
pub struct Server {
    context: Arc<ApiContext>,
}

impl Server {
    #[must_use]
    pub fn new(engine: Arc<Engine>, info: Info, shutdown: Arc<ShutdownSignal>) -> Self {
        Self {
            context: Arc::new(ApiContext {
                engine,
                info,
                shutdown,
            }),
        }
    }

    /// Binds `addr` and serves until the cancellation signal fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind.
    pub async fn run(&self, addr: &str) -> AppResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serves an already-bound listener until the cancellation signal fires,
    /// then drains in-flight requests within [`DRAIN_TIMEOUT`] before
    /// returning.
    ///
    /// # Errors
    ///
    /// Currently infallible after bind; kept fallible so callers treat the
    /// lifecycle uniformly with [`Server::run`].
    pub async fn serve(&self, listener: TcpListener) -> AppResult<()> {
        let mut shutdown_rx = self.context.shutdown.subscribe();
        let mut connections: JoinSet<()> = JoinSet::new();

        if let Ok(addr) = listener.local_addr() {
            info!("Control API listening on {}", addr);
        }

        if !self.context.shutdown.is_fired() {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((socket, _)) => {
                                let context = Arc::clone(&self.context);
                                connections.spawn(async move {
                                    handle_connection(socket, &context).await;
                                });
                            }
                            Err(err) => debug!("Failed to accept control connection: {}", err),
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                    // Reap finished connection tasks as we go.
                    Some(_) = connections.join_next(), if !connections.is_empty() => {}
                }
            }
        }

        // No new connections are accepted past this point.
        drop(listener);
        drain(connections).await;
        info!("Control API stopped.");
        Ok(())
    }
}

/// Bounded graceful drain: in-flight requests may complete; whatever is
/// still running at the deadline is abandoned.
async fn drain(mut connections: JoinSet<()>) {
    if connections.is_empty() {
        return;
    }
    info!("Draining {} in-flight connection(s)", connections.len());
    let wait = async {
        while connections.join_next().await.is_some() {}
    };
    if tokio::time::timeout(DRAIN_TIMEOUT, wait).await.is_err() {
        warn!(
            "Drain timed out after {}s; abandoning remaining connections",
            DRAIN_TIMEOUT.as_secs()
        );
        connections.abort_all();
    }
}

async fn handle_connection(mut socket: TcpStream, context: &ApiContext) {
    let response = match http::read_request(&mut socket).await {
        Ok(request) => router::handle(context, &request).await,
        // The request never reached the router; render the failure through
        // the same envelope so the client still gets a document.
        Err(error) => document::error_document(&error),
    };
    if let Err(err) = http::write_response(&mut socket, &response).await {
        debug!("Failed to write control response: {}", err);
    }
}
