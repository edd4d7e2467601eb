mod authorize;
mod users;

use std::{net::SocketAddr, str::FromStr};

use axum::{
	body::{Body, Bytes},
	http::{
		header::{AUTHORIZATION, CONTENT_TYPE},
		Request,
		StatusCode,
	},
	response::Response,
	Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sqlx::{pool::PoolOptions, sqlite::SqliteConnectOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{models::auth::TokenResponse, prelude::*, service::TokenStore};

/// A running API backed by a fresh in-memory database
struct TestApp {
	state: AppState,
	router: Router,
	/// Removed once the test is done with the app
	_auth_client: TempDir,
}

/// Creates a fresh API. The sign in client is a temporary directory holding
/// only an `index.html`.
async fn init_tests() -> TestApp {
	let auth_client = tempfile::Builder::new()
		.prefix("auth-client-")
		.tempdir()
		.unwrap();
	std::fs::write(auth_client.path().join("index.html"), "<h1>Sign in</h1>").unwrap();

	let config = AppConfig {
		bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
		jwt_secret: "test-secret".to_string(),
		password_pepper: "test-pepper".to_string(),
		environment: RunningEnvironment::Development,
		database: DatabaseConfig {
			file: ":memory:".to_string(),
			connection_limit: 1,
			log_statements: false,
		},
		static_files: StaticFilesConfig {
			auth_client: auth_client.path().to_string_lossy().into_owned(),
			shopping_list: std::env::temp_dir().to_string_lossy().into_owned(),
			serve_shopping_list: false,
		},
	};

	// A single connection, so every query sees the same in-memory database
	let database = PoolOptions::<DatabaseType>::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(
			SqliteConnectOptions::from_str("sqlite::memory:")
				.unwrap()
				.foreign_keys(true),
		)
		.await
		.unwrap();

	let state = AppState {
		database,
		config,
		tokens: TokenStore::new(),
	};
	db::initialize(&state).await.unwrap();

	TestApp {
		router: crate::routes::setup_routes(&state),
		state,
		_auth_client: auth_client,
	}
}

impl TestApp {
	/// Sends a request through the router
	async fn send(&self, request: Request<Body>) -> Response {
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Sends a request and reads the whole response body
	async fn send_and_read(&self, request: Request<Body>) -> (StatusCode, Bytes) {
		let response = self.send(request).await;
		let status = response.status();
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		(status, body)
	}

	/// Sends a request and reads the response body as JSON
	async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
		let (status, body) = self.send_and_read(request).await;
		let body = if body.is_empty() {
			serde_json::Value::Null
		} else {
			serde_json::from_slice(&body).unwrap()
		};
		(status, body)
	}

	/// Registers a user whose display name is their capitalised username
	async fn register(&self, username: &str, password: &str) {
		let (status, _) = self
			.send_and_read(json_request(
				"POST",
				"/api/users/register",
				None,
				serde_json::json!({
					"displayname": username.to_uppercase(),
					"username": username,
					"password": password,
				}),
			))
			.await;
		assert_eq!(status, StatusCode::OK);
	}

	/// Signs in and returns the authorization code
	async fn authorization_code(&self, username: &str, password: &str, form: &[(&str, &str)]) -> String {
		let (status, body) = self
			.send_and_read(authorize_request(username, password, form))
			.await;
		assert_eq!(status, StatusCode::OK);
		String::from_utf8(body.to_vec()).unwrap()
	}

	/// Registers a user and goes through the whole code flow for them
	async fn sign_up_and_in(&self, username: &str) -> TokenResponse {
		self.register(username, "password").await;
		let code = self
			.authorization_code(username, "password", &[("response_type", "code"), ("scope", "[]")])
			.await;

		let (status, body) = self
			.send_and_read(form_request(
				"/authorize/token",
				&[("grant_type", "authorization_code"), ("code", code.as_str())],
			))
			.await;
		assert_eq!(status, StatusCode::OK);
		serde_json::from_slice(&body).unwrap()
	}
}

/// A form-encoded POST to the authorization server
fn form_request(uri: &str, form: &[(&str, &str)]) -> Request<Body> {
	Request::post(uri)
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body(Body::from(serde_urlencoded::to_string(form).unwrap()))
		.unwrap()
}

/// A `POST /authorize` carrying basic credentials
fn authorize_request(username: &str, password: &str, form: &[(&str, &str)]) -> Request<Body> {
	let mut request = form_request("/authorize", form);
	request.headers_mut().insert(
		AUTHORIZATION,
		format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
			.parse()
			.unwrap(),
	);
	request
}

/// A request with an optional bearer token and a JSON body
fn json_request(
	method: &str,
	uri: &str,
	access_token: Option<&str>,
	body: serde_json::Value,
) -> Request<Body> {
	let mut builder = Request::builder()
		.method(method)
		.uri(uri)
		.header(CONTENT_TYPE, "application/json");
	if let Some(token) = access_token {
		builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
	}
	builder.body(Body::from(body.to_string())).unwrap()
}

/// A request with a bearer token and no body
fn bearer_request(method: &str, uri: &str, access_token: &str) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header(AUTHORIZATION, format!("Bearer {}", access_token))
		.body(Body::empty())
		.unwrap()
}
