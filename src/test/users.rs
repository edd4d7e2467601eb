use axum::{
	body::Body,
	http::{Request, StatusCode},
};
use serde_json::json;

use super::{init_tests, json_request};
use crate::{models::user::User, prelude::*};

async fn count(app: &super::TestApp, query: &str) -> String {
	let (status, body) = app
		.send_and_read(
			Request::get(format!("/api/users/count{}", query))
				.body(Body::empty())
				.unwrap(),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn registration_stores_a_hashed_password() -> Result<(), ErrorType> {
	let app = init_tests().await;

	let (status, body) = app
		.send_json(json_request(
			"POST",
			"/api/users/register",
			None,
			json!({
				"displayname": "Alice Smith",
				"username": "alice.smith",
				"password": "correct horse",
			}),
		))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["username"], "alice.smith");
	assert_eq!(body["displayname"], "Alice Smith");
	assert!(body.get("password").is_none());
	assert!(body.get("password_hash").is_none());

	let mut connection = app.state.database.acquire().await?;
	let users: Vec<User> = db::get_users_by_username(&mut connection, "alice.smith").await?;
	assert_eq!(users.len(), 1);
	assert_ne!(users[0].password_hash, "correct horse");
	assert!(service::validate_hash(
		"correct horse",
		&users[0].password_hash,
		&app.state.config.password_pepper
	)?);

	Ok(())
}

#[tokio::test]
async fn usernames_are_unique() {
	let app = init_tests().await;
	app.register("alice", "password").await;

	let (status, body) = app
		.send_json(json_request(
			"POST",
			"/api/users/register",
			None,
			json!({
				"displayname": "Another Alice",
				"username": "alice",
				"password": "password",
			}),
		))
		.await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error"], "usernameUnavailable");
}

#[tokio::test]
async fn registration_validates_every_field() {
	let app = init_tests().await;

	let cases = [
		(json!({ "displayname": " Alice", "username": "alice", "password": "x" }), "invalidDisplayName"),
		(json!({ "displayname": "Alice", "username": "alice!", "password": "x" }), "invalidUsername"),
		(json!({ "displayname": "Alice", "username": "alice", "password": "   " }), "invalidPassword"),
		(json!({ "displayname": "Alice", "username": "alice" }), "wrongParameters"),
	];
	for (request, error) in cases {
		let (status, body) = app
			.send_json(json_request("POST", "/api/users/register", None, request))
			.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], error);
	}

	assert_eq!(count(&app, "").await, "0");
}

#[tokio::test]
async fn count_filters_by_username_and_id() {
	let app = init_tests().await;
	app.register("alice", "password").await;
	app.register("bob", "password").await;

	assert_eq!(count(&app, "").await, "2");
	assert_eq!(count(&app, "?username=alice").await, "1");
	assert_eq!(count(&app, "?username=carol").await, "0");
	// Unknown filters are ignored
	assert_eq!(count(&app, "?email=alice@example.com").await, "2");
	assert_eq!(count(&app, "?id=not-a-uuid").await, "0");

	let (_, body) = app
		.send_json(json_request(
			"POST",
			"/api/users/register",
			None,
			json!({
				"displayname": "Carol",
				"username": "carol",
				"password": "password",
			}),
		))
		.await;
	let id = body["id"].as_str().unwrap().to_string();
	assert_eq!(count(&app, &format!("?id={}", id)).await, "1");
	assert_eq!(count(&app, &format!("?id={}&username=alice", id)).await, "0");
}
