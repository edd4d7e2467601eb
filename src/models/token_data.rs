use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData as JwtData, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::prelude::*;

/// The kind of credential a JWT represents. Each kind lives in its own set in
/// the token store, and a JWT of one kind is never accepted as another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
	/// A short-lived, single-use code exchanged for a token pair
	AuthorizationCode,
	/// A bearer credential for protected routes
	AccessToken,
	/// A longer-lived, single-use credential exchanged for a new token pair
	RefreshToken,
}

/// The method used to derive a PKCE code challenge from its verifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CodeChallengeMethod {
	/// The challenge is the verifier itself
	#[serde(rename = "plain")]
	Plain,
	/// The challenge is the unpadded base64url SHA-256 of the verifier
	#[serde(rename = "S256")]
	S256,
}

impl CodeChallengeMethod {
	/// Reads the `code_challenge_method` parameter of a request. A missing
	/// method means `plain`.
	pub fn parse(value: Option<&str>) -> Option<Self> {
		match value {
			None | Some("plain") => Some(Self::Plain),
			Some("S256") => Some(Self::S256),
			_ => None,
		}
	}
}

/// The claims stored inside every authorization code, access token and refresh
/// token. JWTs can be decoded on the client side, so no sensitive data should
/// be stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
	/// The issuer of the token, always [`constants::JWT_ISSUER`]
	pub iss: String,
	/// The username of the user the token was issued to
	pub sub: String,
	/// When the token was issued
	#[serde(with = "datetime_as_seconds")]
	pub iat: OffsetDateTime,
	/// When the token stops being accepted
	#[serde(with = "datetime_as_seconds")]
	pub exp: OffsetDateTime,
	/// A random ID, so that two tokens issued in the same second for the same
	/// user never encode to the same string
	pub jti: Uuid,
	/// What kind of credential this is
	pub typ: TokenType,
	/// The scopes granted to the holder of this token
	pub scope: Vec<String>,
	/// The PKCE challenge an authorization code was issued with
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_challenge: Option<String>,
	/// How [`TokenData::code_challenge`] was derived
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code_challenge_method: Option<CodeChallengeMethod>,
}

/// Why a JWT could not be turned back into [`TokenData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDecodeError {
	/// Not a JWT, or not signed by us
	Invalid,
	/// Signed by us, but the claims are not the ones we expect
	Malformed,
}

impl TokenData {
	/// Creates the claims for a new token of the given type, valid for the
	/// given duration starting now.
	pub fn new(
		typ: TokenType,
		sub: impl Into<String>,
		scope: Vec<String>,
		validity: time::Duration,
	) -> Self {
		let iat = OffsetDateTime::now_utc();
		Self {
			iss: constants::JWT_ISSUER.to_string(),
			sub: sub.into(),
			iat,
			exp: iat + validity,
			jti: Uuid::new_v4(),
			typ,
			scope,
			code_challenge: None,
			code_challenge_method: None,
		}
	}

	/// Signs the claims with the given secret
	pub fn encode(&self, secret: &str) -> Result<String, ErrorType> {
		jsonwebtoken::encode(
			&Header::default(),
			self,
			&EncodingKey::from_secret(secret.as_bytes()),
		)
		.map_err(|err| {
			error!("Unable to sign JWT: {}", err);
			ErrorType::server_error(err)
		})
	}

	/// Verifies the signature of the token and reads its claims. Expiry is not
	/// checked here, use [`TokenData::is_expired`] for that.
	pub fn decode(token: &str, secret: &str) -> Result<Self, TokenDecodeError> {
		// Signature first, claims second
		let JwtData { header: _, claims } = jsonwebtoken::decode::<serde_json::Value>(
			token,
			&DecodingKey::from_secret(secret.as_bytes()),
			&{
				let mut validation = Validation::default();

				// We'll manually do this
				validation.validate_exp = false;
				validation.validate_nbf = false;
				validation.required_spec_claims.clear();

				validation
			},
		)
		.map_err(|err| {
			warn!("Invalid JWT provided: {}", err);
			TokenDecodeError::Invalid
		})?;

		let claims = serde_json::from_value::<Self>(claims).map_err(|err| {
			warn!("JWT carries unexpected claims: {}", err);
			TokenDecodeError::Malformed
		})?;

		if claims.iss != constants::JWT_ISSUER {
			warn!("Invalid JWT issuer: {}", claims.iss);
			return Err(TokenDecodeError::Malformed);
		}

		Ok(claims)
	}

	/// Whether the token was issued in the future or has run past its expiry
	pub fn is_expired(&self) -> bool {
		let now = OffsetDateTime::now_utc();
		now < self.iat - time::Duration::minutes(1) || now >= self.exp
	}
}

/// A module to help serialize and deserialize `OffsetDateTime` as seconds
mod datetime_as_seconds {
	use serde::{de::Error, Deserialize, Deserializer, Serializer};
	use time::OffsetDateTime;

	/// Serialize an `OffsetDateTime` as seconds
	pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.unix_timestamp())
	}

	/// Deserialize an `OffsetDateTime` from seconds
	pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		OffsetDateTime::from_unix_timestamp(i64::deserialize(deserializer)?).map_err(Error::custom)
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;
	use time::Duration;

	use super::*;

	const SECRET: &str = "unit-test-secret";

	#[test]
	fn challenge_method_defaults_to_plain() {
		assert_eq!(CodeChallengeMethod::parse(None), Some(CodeChallengeMethod::Plain));
		assert_eq!(CodeChallengeMethod::parse(Some("plain")), Some(CodeChallengeMethod::Plain));
		assert_eq!(CodeChallengeMethod::parse(Some("S256")), Some(CodeChallengeMethod::S256));
		assert_eq!(CodeChallengeMethod::parse(Some("S512")), None);
		assert_eq!(CodeChallengeMethod::parse(Some("s256")), None);
	}

	#[test]
	fn claims_survive_signing() {
		let claims = TokenData::new(
			TokenType::AccessToken,
			"alice",
			vec!["lists".to_string()],
			Duration::minutes(5),
		);
		let token = claims.encode(SECRET).unwrap();

		let decoded = TokenData::decode(&token, SECRET).unwrap();
		assert_eq!(decoded.sub, "alice");
		assert_eq!(decoded.typ, TokenType::AccessToken);
		assert_eq!(decoded.jti, claims.jti);
		assert_eq!(decoded.exp.unix_timestamp(), claims.exp.unix_timestamp());
		assert!(!decoded.is_expired());
	}

	#[test]
	fn same_payload_never_encodes_to_the_same_token() {
		let first = TokenData::new(TokenType::RefreshToken, "bob", vec![], Duration::minutes(30))
			.encode(SECRET)
			.unwrap();
		let second = TokenData::new(TokenType::RefreshToken, "bob", vec![], Duration::minutes(30))
			.encode(SECRET)
			.unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn wrong_secret_is_invalid() {
		let token = TokenData::new(TokenType::AuthorizationCode, "carol", vec![], Duration::minutes(5))
			.encode(SECRET)
			.unwrap();
		assert_eq!(
			TokenData::decode(&token, "another-secret"),
			Err(TokenDecodeError::Invalid)
		);
		assert_eq!(
			TokenData::decode("definitely.not.a-jwt", SECRET),
			Err(TokenDecodeError::Invalid)
		);
	}

	#[test]
	fn missing_claims_are_malformed() {
		let token = jsonwebtoken::encode(
			&Header::default(),
			&json!({ "email": "dave@example.com", "exp": 4_000_000_000_i64 }),
			&EncodingKey::from_secret(SECRET.as_bytes()),
		)
		.unwrap();
		assert_eq!(
			TokenData::decode(&token, SECRET),
			Err(TokenDecodeError::Malformed)
		);
	}

	#[test]
	fn expiry_is_checked_manually() {
		let mut claims = TokenData::new(TokenType::AccessToken, "erin", vec![], Duration::minutes(5));
		claims.exp = claims.iat - Duration::seconds(1);
		let token = claims.encode(SECRET).unwrap();

		let decoded = TokenData::decode(&token, SECRET).unwrap();
		assert!(decoded.is_expired());
	}

	#[test]
	fn code_challenge_is_only_serialized_when_present() {
		let claims = TokenData::new(TokenType::AccessToken, "frank", vec![], Duration::minutes(5));
		let value = serde_json::to_value(&claims).unwrap();
		assert!(value.get("codeChallenge").is_none());
		assert_eq!(value["typ"], "accessToken");
	}
}
