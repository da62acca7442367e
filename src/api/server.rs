use crate::api::routes;
use crate::config::SharedConfig;
use crate::solver::Solver;
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: SharedConfig,
    pub solver: Arc<Solver>,
}

/// Serve the webhook API on an already bound `listener`.
///
/// # Errors
///
/// Returns an error if the listener can't be handed over to the HTTP server.
pub fn new(
    listener: TcpListener,
    config: SharedConfig,
    solver: Arc<Solver>,
) -> anyhow::Result<impl Future<Output = hyper::Result<()>>> {
    Ok(axum::Server::from_tcp(listener)?
        .serve(routes::new(AppState { config, solver }).into_make_service()))
}
