use serde::{Deserialize, Serialize};

/// What the client wants back from a successful authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
	/// An authorization code, to be exchanged at `/authorize/token`
	Code,
	/// An access / refresh token pair, directly
	Token,
}

impl ResponseType {
	/// Reads the `response_type` parameter of a request. Anything other than
	/// `code` or `token` is rejected.
	pub fn parse(value: Option<&str>) -> Option<Self> {
		match value {
			Some("code") => Some(Self::Code),
			Some("token") => Some(Self::Token),
			_ => None,
		}
	}
}

/// How the client wants to redeem a credential at `/authorize/token`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
	/// Redeem an authorization code
	AuthorizationCode,
	/// Redeem a refresh token
	RefreshToken,
}

impl GrantType {
	/// Reads the `grant_type` parameter of a request.
	pub fn parse(value: Option<&str>) -> Option<Self> {
		match value {
			Some("authorization_code") => Some(Self::AuthorizationCode),
			Some("refresh_token") => Some(Self::RefreshToken),
			_ => None,
		}
	}
}

/// The query of `GET /authorize`. Everything is optional here so that a
/// missing `response_type` is reported as an invalid one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizePageQuery {
	/// Either `code` or `token`
	pub response_type: Option<String>,
	/// The client asking for authorization
	pub client_id: Option<String>,
	/// Where the client wants to be sent back to
	pub redirect_uri: Option<String>,
	/// Opaque value round-tripped to the client
	pub state: Option<String>,
}

/// The form body of `POST /authorize`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeRequest {
	/// Either `code` or `token`
	pub response_type: Option<String>,
	/// The scopes requested, as a JSON array or space-delimited
	pub scope: Option<String>,
	/// The PKCE challenge to bind the authorization code to
	pub code_challenge: Option<String>,
	/// How the PKCE challenge was derived, `plain` or `S256`. Defaults to
	/// `plain`
	pub code_challenge_method: Option<String>,
}

/// The form body of `POST /authorize/token`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
	/// Either `authorization_code` or `refresh_token`
	pub grant_type: Option<String>,
	/// The authorization code, for the `authorization_code` grant
	pub code: Option<String>,
	/// The refresh token, for the `refresh_token` grant
	pub refresh_token: Option<String>,
	/// The scopes requested. Can only narrow the scopes already granted
	pub scope: Option<String>,
	/// The PKCE verifier, if the code was issued with a challenge
	pub code_verifier: Option<String>,
}

/// A freshly issued access / refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
	/// The bearer credential for protected routes
	pub access_token: String,
	/// The credential to get a new pair once the access token expires
	pub refresh_token: String,
	/// Always `Bearer`
	pub token_type: String,
	/// The number of seconds the access token is valid for
	pub expires_in: i64,
	/// The scopes granted to the access token
	pub scope: Vec<String>,
}

/// The form body of `POST /authorize/revoke` and `POST /authorize/introspect`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenHintRequest {
	/// The token to revoke or inspect
	pub token: Option<String>,
	/// What kind of token the client thinks it is. Only informational
	pub token_type_hint: Option<String>,
}

/// The response of `POST /authorize/introspect`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntrospectResponse {
	/// The token is currently accepted
	Active {
		/// Always `true`
		active: bool,
		/// The username of the user the token was issued to
		sub: String,
		/// The scopes granted to the token, space-delimited
		scope: String,
		/// When the token expires, in unix seconds
		exp: i64,
		/// What kind of token this is
		token_type: String,
	},
	/// The token is unknown, redeemed, revoked or expired
	Inactive {
		/// Always `false`
		active: bool,
	},
}
