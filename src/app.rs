use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::{prelude::*, service::TokenStore};

/// The global state of the application.
/// This will contain the database connection, the configuration and the store
/// of issued tokens.
#[derive(Debug, Clone)]
pub struct AppState {
	/// The database connection pool.
	pub database: sqlx::Pool<DatabaseType>,
	/// The application configuration.
	pub config: AppConfig,
	/// Every authorization code, access token and refresh token that has been
	/// issued and not yet redeemed, revoked or expired.
	pub tokens: TokenStore,
}

/// Binds the listener on the configured address and serves the API until a
/// shutdown signal is received.
#[instrument(skip(state))]
pub async fn start_server(state: AppState) {
	let tcp_listener = TcpListener::bind(state.config.bind_address)
		.await
		.expect("unable to bind to the configured address");

	info!(
		"Listening for connections on {}",
		tcp_listener
			.local_addr()
			.expect("unable to read the listener address")
	);

	axum::serve(
		tcp_listener,
		crate::routes::setup_routes(&state).into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(exit_signal())
	.await
	.expect("server exited with an error");

	info!("Server stopped");
}

/// Resolves once the process receives SIGINT (or SIGTERM on unix).
async fn exit_signal() {
	let ctrl_c = async {
		tokio::signal::ctrl_c()
			.await
			.expect("Failed to listen for SIGINT")
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => (),
		_ = terminate => (),
	}
	info!("Shutdown signal received, shutting down server gracefully");
}
