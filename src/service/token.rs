use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

use super::TokenStore;
use crate::{
	models::{
		auth::{IntrospectResponse, TokenResponse},
		token_data::{CodeChallengeMethod, TokenData, TokenDecodeError, TokenType},
	},
	prelude::*,
};

/// Who a credential was issued to, and what they are allowed to do with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
	/// The username of the user that signed in
	pub username: String,
	/// The scopes granted
	pub scope: Vec<String>,
}

impl From<TokenData> for Grant {
	fn from(data: TokenData) -> Self {
		Self {
			username: data.sub,
			scope: data.scope,
		}
	}
}

/// A PKCE challenge that an authorization code is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
	/// The challenge sent by the client
	pub challenge: String,
	/// How the challenge was derived from the verifier
	pub method: CodeChallengeMethod,
}

/// Signs a new authorization code for the grant and records it as redeemable.
#[instrument(skip(tokens, secret))]
pub async fn issue_authorization_code(
	tokens: &TokenStore,
	secret: &str,
	grant: &Grant,
	challenge: Option<CodeChallenge>,
) -> Result<String, ErrorType> {
	let mut data = TokenData::new(
		TokenType::AuthorizationCode,
		&grant.username,
		grant.scope.clone(),
		constants::AUTHORIZATION_CODE_VALIDITY,
	);
	if let Some(CodeChallenge { challenge, method }) = challenge {
		data.code_challenge = Some(challenge);
		data.code_challenge_method = Some(method);
	}

	let code = data.encode(secret)?;
	tokens
		.insert(TokenType::AuthorizationCode, code.clone(), data.exp)
		.await;

	trace!("Issued authorization code to `{}`", grant.username);
	Ok(code)
}

/// Signs a new access token and refresh token for the grant and records both.
#[instrument(skip(tokens, secret))]
pub async fn issue_tokens(
	tokens: &TokenStore,
	secret: &str,
	grant: &Grant,
) -> Result<TokenResponse, ErrorType> {
	let access = TokenData::new(
		TokenType::AccessToken,
		&grant.username,
		grant.scope.clone(),
		constants::ACCESS_TOKEN_VALIDITY,
	);
	let refresh = TokenData::new(
		TokenType::RefreshToken,
		&grant.username,
		grant.scope.clone(),
		constants::REFRESH_TOKEN_VALIDITY,
	);

	let access_token = access.encode(secret)?;
	let refresh_token = refresh.encode(secret)?;

	tokens
		.insert(TokenType::AccessToken, access_token.clone(), access.exp)
		.await;
	tokens
		.insert(TokenType::RefreshToken, refresh_token.clone(), refresh.exp)
		.await;

	trace!("Issued token pair to `{}`", grant.username);
	Ok(TokenResponse {
		access_token,
		refresh_token,
		token_type: constants::BEARER_TOKEN_TYPE.to_string(),
		expires_in: constants::ACCESS_TOKEN_VALIDITY.whole_seconds(),
		scope: grant.scope.clone(),
	})
}

/// Redeems an authorization code. The code is removed from the store before
/// anything else is checked, so it can never be used twice, even when the
/// redemption fails.
#[instrument(skip_all)]
pub async fn redeem_authorization_code(
	tokens: &TokenStore,
	secret: &str,
	code: &str,
	code_verifier: Option<&str>,
) -> Result<Grant, ErrorType> {
	if !tokens.take(TokenType::AuthorizationCode, code).await {
		debug!("Authorization code is unknown or already redeemed");
		return Err(ErrorType::InvalidCode);
	}

	let data = TokenData::decode(code, secret).map_err(|err| match err {
		TokenDecodeError::Invalid => ErrorType::InvalidCode,
		TokenDecodeError::Malformed => ErrorType::MalformedCode,
	})?;

	if data.typ != TokenType::AuthorizationCode {
		return Err(ErrorType::MalformedCode);
	}
	if data.is_expired() {
		debug!("Authorization code has expired");
		return Err(ErrorType::InvalidCode);
	}

	if let Some(challenge) = &data.code_challenge {
		let method = data
			.code_challenge_method
			.unwrap_or(CodeChallengeMethod::Plain);
		let verifier = code_verifier.ok_or(ErrorType::InvalidCodeVerifier)?;
		if !verify_code_challenge(challenge, method, verifier) {
			debug!("Code verifier does not match the challenge");
			return Err(ErrorType::InvalidCodeVerifier);
		}
	}

	info!("Authorization code redeemed by `{}`", data.sub);
	Ok(data.into())
}

/// Redeems a refresh token. Like codes, refresh tokens are single-use.
#[instrument(skip_all)]
pub async fn redeem_refresh_token(
	tokens: &TokenStore,
	secret: &str,
	refresh_token: &str,
) -> Result<Grant, ErrorType> {
	if !tokens.take(TokenType::RefreshToken, refresh_token).await {
		debug!("Refresh token is unknown or already redeemed");
		return Err(ErrorType::InvalidRefreshToken);
	}

	let data = TokenData::decode(refresh_token, secret).map_err(|err| match err {
		TokenDecodeError::Invalid => ErrorType::InvalidRefreshToken,
		TokenDecodeError::Malformed => ErrorType::MalformedRefreshToken,
	})?;

	if data.typ != TokenType::RefreshToken {
		return Err(ErrorType::MalformedRefreshToken);
	}
	if data.is_expired() {
		debug!("Refresh token has expired");
		return Err(ErrorType::InvalidRefreshToken);
	}

	info!("Refresh token redeemed by `{}`", data.sub);
	Ok(data.into())
}

/// Checks a bearer token. Access tokens stay in the store until they expire
/// or are revoked.
#[instrument(skip_all)]
pub async fn verify_access_token(
	tokens: &TokenStore,
	secret: &str,
	access_token: &str,
) -> Result<Grant, ErrorType> {
	if !tokens.contains(TokenType::AccessToken, access_token).await {
		return Err(ErrorType::AuthorizationTokenInvalid);
	}

	let data = TokenData::decode(access_token, secret)
		.map_err(|_| ErrorType::AuthorizationTokenInvalid)?;

	if data.typ != TokenType::AccessToken || data.is_expired() {
		return Err(ErrorType::AuthorizationTokenInvalid);
	}

	Ok(data.into())
}

/// Reads a `scope` parameter. Clients send either a JSON array of strings or
/// a space-delimited list. Duplicates are dropped, order is kept.
pub fn parse_scope(raw: Option<&str>) -> Result<Vec<String>, ErrorType> {
	let raw = raw.map(str::trim).unwrap_or_default();

	let entries = if raw.starts_with('[') {
		serde_json::from_str::<Vec<String>>(raw).map_err(|_| ErrorType::InvalidScope)?
	} else {
		raw.split_whitespace().map(str::to_string).collect()
	};

	let mut scope = Vec::with_capacity(entries.len());
	for entry in entries {
		if entry.is_empty() || entry.contains(char::is_whitespace) {
			return Err(ErrorType::InvalidScope);
		}
		if !scope.contains(&entry) {
			scope.push(entry);
		}
	}
	Ok(scope)
}

/// Works out the scope of a token exchange. Leaving out the `scope` parameter
/// keeps everything that was granted. Otherwise every requested entry must
/// already have been granted.
pub fn narrow_scope(granted: &[String], requested: Option<&str>) -> Result<Vec<String>, ErrorType> {
	let Some(requested) = requested.filter(|scope| !scope.trim().is_empty()) else {
		return Ok(granted.to_vec());
	};

	let requested = parse_scope(Some(requested))?;
	if let Some(extra) = requested.iter().find(|entry| !granted.contains(entry)) {
		debug!("Scope `{}` was never granted", extra);
		return Err(ErrorType::InvalidScope);
	}
	Ok(requested)
}

/// Revokes any token. Unknown tokens are ignored.
#[instrument(skip_all)]
pub async fn revoke_token(tokens: &TokenStore, token: &str) -> Option<TokenType> {
	let revoked = tokens.revoke(token).await;
	if let Some(kind) = revoked {
		info!("Revoked {}", token_type_name(kind));
	}
	revoked
}

/// Reports whether a token is currently accepted, and what it grants
#[instrument(skip_all)]
pub async fn introspect(tokens: &TokenStore, secret: &str, token: &str) -> IntrospectResponse {
	let inactive = IntrospectResponse::Inactive { active: false };

	let mut kind = None;
	for candidate in [
		TokenType::AccessToken,
		TokenType::RefreshToken,
		TokenType::AuthorizationCode,
	] {
		if tokens.contains(candidate, token).await {
			kind = Some(candidate);
			break;
		}
	}
	let Some(kind) = kind else {
		return inactive;
	};

	let Ok(data) = TokenData::decode(token, secret) else {
		return inactive;
	};
	if data.typ != kind || data.is_expired() {
		return inactive;
	}

	IntrospectResponse::Active {
		active: true,
		sub: data.sub,
		scope: data.scope.join(" "),
		exp: data.exp.unix_timestamp(),
		token_type: token_type_name(kind).to_string(),
	}
}

/// The name a token kind goes by in `token_type_hint` and introspection
pub fn token_type_name(kind: TokenType) -> &'static str {
	match kind {
		TokenType::AuthorizationCode => "authorization_code",
		TokenType::AccessToken => "access_token",
		TokenType::RefreshToken => "refresh_token",
	}
}

/// Checks a PKCE verifier against the challenge a code was issued with.
/// Verifiers must be 43 to 128 characters long.
fn verify_code_challenge(challenge: &str, method: CodeChallengeMethod, verifier: &str) -> bool {
	if !(43..=128).contains(&verifier.len()) {
		return false;
	}

	match method {
		CodeChallengeMethod::Plain => verifier == challenge,
		CodeChallengeMethod::S256 => {
			URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes())) == challenge
		}
	}
}
