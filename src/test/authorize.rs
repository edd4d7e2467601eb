use axum::{
	body::Body,
	http::{header::CACHE_CONTROL, Request, StatusCode},
};
use serde_json::json;

use super::{authorize_request, bearer_request, form_request, init_tests};
use crate::models::{auth::TokenResponse, token_data::TokenType};

#[tokio::test]
async fn code_flow_grants_access_to_protected_routes() {
	let app = init_tests().await;
	app.register("alice", "password").await;

	let code = app
		.authorization_code("alice", "password", &[("response_type", "code"), ("scope", "[]")])
		.await;
	assert!(!code.is_empty());

	let response = app
		.send(form_request(
			"/authorize/token",
			&[("grant_type", "authorization_code"), ("code", code.as_str())],
		))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let tokens: TokenResponse = serde_json::from_slice(&body).unwrap();
	assert_eq!(tokens.token_type, "Bearer");
	assert_eq!(tokens.expires_in, 300);

	let (status, lists) = app
		.send_json(bearer_request("GET", "/api/shopping-list", tokens.access_token.as_str()))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(lists, json!([]));
}

#[tokio::test]
async fn codes_can_only_be_redeemed_once() {
	let app = init_tests().await;
	app.register("alice", "password").await;
	let code = app
		.authorization_code("alice", "password", &[("response_type", "code")])
		.await;

	let exchange = [("grant_type", "authorization_code"), ("code", code.as_str())];
	let (status, _) = app.send_json(form_request("/authorize/token", &exchange)).await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = app.send_json(form_request("/authorize/token", &exchange)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body,
		json!({
			"success": false,
			"error": "invalidCode",
			"message": "Invalid code",
		})
	);
}

#[tokio::test]
async fn authorize_checks_header_then_response_type_then_credentials() {
	let app = init_tests().await;
	app.register("alice", "password").await;

	// No header at all
	let (status, body) = app
		.send_json(form_request("/authorize", &[("response_type", "code")]))
		.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalidAuthorizationHeader");

	// Wrong scheme
	let mut request = form_request("/authorize", &[("response_type", "code")]);
	request
		.headers_mut()
		.insert("authorization", "Bearer abc".parse().unwrap());
	let (status, body) = app.send_json(request).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalidAuthorizationHeader");

	// Bad response_type wins over bad credentials
	let (status, body) = app
		.send_json(authorize_request("alice", "", &[("response_type", "nope")]))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Invalid response_type");

	// Blank password
	let (status, body) = app
		.send_json(authorize_request("alice", "", &[("response_type", "code")]))
		.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalidAuthorizationHeader");

	// Wrong password, and unknown user
	for (username, password) in [("alice", "wrong"), ("mallory", "password")] {
		let (status, body) = app
			.send_json(authorize_request(username, password, &[("response_type", "code")]))
			.await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body["message"], "Incorrect credentials");
	}
}

#[tokio::test]
async fn token_response_type_skips_the_code() {
	let app = init_tests().await;
	app.register("alice", "password").await;

	let (status, body) = app
		.send_json(authorize_request(
			"alice",
			"password",
			&[("response_type", "token"), ("scope", "lists items")],
		))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["token_type"], "Bearer");
	assert_eq!(body["scope"], json!(["lists", "items"]));
	assert_eq!(app.state.tokens.len(TokenType::AuthorizationCode).await, 0);
	assert_eq!(app.state.tokens.len(TokenType::AccessToken).await, 1);
}

#[tokio::test]
async fn refresh_tokens_rotate_and_narrow_scope() {
	let app = init_tests().await;
	app.register("alice", "password").await;
	let code = app
		.authorization_code(
			"alice",
			"password",
			&[("response_type", "code"), ("scope", r#"["lists","items"]"#)],
		)
		.await;
	let (_, first) = app
		.send_json(form_request(
			"/authorize/token",
			&[("grant_type", "authorization_code"), ("code", code.as_str())],
		))
		.await;
	let refresh_token = first["refresh_token"].as_str().unwrap().to_string();

	// Scope can't grow
	let (status, body) = app
		.send_json(form_request(
			"/authorize/token",
			&[
				("grant_type", "refresh_token"),
				("refresh_token", refresh_token.as_str()),
				("scope", "lists admin"),
			],
		))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "invalidScope");

	// The failed attempt used up the refresh token
	let (status, body) = app
		.send_json(form_request(
			"/authorize/token",
			&[
				("grant_type", "refresh_token"),
				("refresh_token", refresh_token.as_str()),
			],
		))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Invalid refresh_token");

	let tokens = app.sign_up_and_in("bob").await;
	let (status, body) = app
		.send_json(form_request(
			"/authorize/token",
			&[
				("grant_type", "refresh_token"),
				("refresh_token", tokens.refresh_token.as_str()),
			],
		))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_ne!(body["access_token"], tokens.access_token.as_str());
}

#[tokio::test]
async fn unknown_grant_type_is_rejected() {
	let app = init_tests().await;

	for form in [vec![], vec![("grant_type", "password")]] {
		let (status, body) = app.send_json(form_request("/authorize/token", &form)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["message"], "Invalid grant_type");
	}
}

#[tokio::test]
async fn pkce_binds_the_code_to_its_verifier() {
	let app = init_tests().await;
	app.register("alice", "password").await;
	let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

	let code = app
		.authorization_code(
			"alice",
			"password",
			&[
				("response_type", "code"),
				("code_challenge", "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"),
				("code_challenge_method", "S256"),
			],
		)
		.await;

	let (status, _) = app
		.send_json(form_request(
			"/authorize/token",
			&[
				("grant_type", "authorization_code"),
				("code", code.as_str()),
				("code_verifier", verifier),
			],
		))
		.await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_challenge_method_is_reported_by_name() {
	let app = init_tests().await;
	app.register("alice", "password").await;

	let (status, body) = app
		.send_json(authorize_request(
			"alice",
			"password",
			&[
				("response_type", "code"),
				("code_challenge", "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"),
				("code_challenge_method", "S512"),
			],
		))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "invalidCodeChallengeMethod");
	assert_eq!(body["message"], "Invalid code_challenge_method");

	// response_type is still checked first
	let (_, body) = app
		.send_json(authorize_request(
			"alice",
			"password",
			&[("response_type", "nope"), ("code_challenge_method", "S512")],
		))
		.await;
	assert_eq!(body["error"], "invalidResponseType");
}

#[tokio::test]
async fn revoked_tokens_introspect_as_inactive() {
	let app = init_tests().await;
	let tokens = app.sign_up_and_in("alice").await;

	let (status, body) = app
		.send_json(form_request(
			"/authorize/introspect",
			&[("token", tokens.access_token.as_str())],
		))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["active"], true);
	assert_eq!(body["sub"], "alice");
	assert_eq!(body["token_type"], "access_token");

	let (status, _) = app
		.send_and_read(form_request(
			"/authorize/revoke",
			&[
				("token", tokens.access_token.as_str()),
				("token_type_hint", "access_token"),
			],
		))
		.await;
	assert_eq!(status, StatusCode::OK);

	// Revoking again is fine
	let (status, _) = app
		.send_and_read(form_request(
			"/authorize/revoke",
			&[("token", tokens.access_token.as_str())],
		))
		.await;
	assert_eq!(status, StatusCode::OK);

	let (_, body) = app
		.send_json(form_request(
			"/authorize/introspect",
			&[("token", tokens.access_token.as_str())],
		))
		.await;
	assert_eq!(body, json!({ "active": false }));

	let (status, body) = app
		.send_json(bearer_request("GET", "/api/shopping-list", tokens.access_token.as_str()))
		.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["message"], "Invalid access_token");
}

#[tokio::test]
async fn sign_in_page_needs_a_valid_response_type() {
	let app = init_tests().await;

	let (status, body) = app
		.send_json(
			Request::get("/authorize?client_id=web")
				.body(Body::empty())
				.unwrap(),
		)
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "invalidResponseType");

	let (status, body) = app
		.send_and_read(
			Request::get("/authorize?response_type=code&client_id=web&state=xyz")
				.body(Body::empty())
				.unwrap(),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(&body[..], b"<h1>Sign in</h1>");

	let (status, _) = app
		.send_and_read(
			Request::get("/authorize/index.html")
				.body(Body::empty())
				.unwrap(),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
}
