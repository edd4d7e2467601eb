use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
	mem,
};

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Serialize, Serializer};

/// A list of all the possible errors that can be returned by the API
#[derive(Debug)]
pub enum ErrorType {
	/// The `response_type` of an authorization request is neither `code` nor
	/// `token`
	InvalidResponseType,
	/// The `grant_type` of a token request is neither `authorization_code` nor
	/// `refresh_token`
	InvalidGrantType,
	/// The `Authorization` header is present but does not use the expected
	/// scheme, or the credentials inside it cannot be read
	InvalidAuthorizationHeader,
	/// No user matches the username and password provided
	IncorrectCredentials,
	/// The authorization code is unknown, already redeemed, or expired
	InvalidCode,
	/// The authorization code is signed by us but does not carry the claims of
	/// an authorization code
	MalformedCode,
	/// The refresh token is unknown, already redeemed, or expired
	InvalidRefreshToken,
	/// The refresh token is signed by us but does not carry the claims of a
	/// refresh token
	MalformedRefreshToken,
	/// The PKCE code verifier is missing or does not match the challenge the
	/// code was issued with
	InvalidCodeVerifier,
	/// The `code_challenge_method` of an authorization request is neither
	/// `plain` nor `S256`
	InvalidCodeChallengeMethod,
	/// The requested scope is not a subset of the scope that was granted
	InvalidScope,
	/// The request has no `Authorization` header at all
	Unauthenticated,
	/// The access token provided is not valid (anymore)
	AuthorizationTokenInvalid,
	/// The authenticated user is not allowed to perform the requested action
	Unauthorized,
	/// The parameters sent with the request is invalid. This would ideally not
	/// happen unless there is a bug in the client
	WrongParameters,
	/// The username does not match the allowed format
	InvalidUsername,
	/// The display name does not match the allowed format
	InvalidDisplayName,
	/// The password is blank
	InvalidPassword,
	/// The username provided is not available. It is being used by another
	/// account
	UsernameUnavailable,
	/// The resource that the user is trying to access does not exist.
	ResourceDoesNotExist,
	/// An internal server error occurred. This should not happen unless there
	/// is a bug in the server
	InternalServerError(anyhow::Error),
}

impl ErrorType {
	/// Returns the status code that should be used for this error.
	pub fn default_status_code(&self) -> StatusCode {
		match self {
			Self::InvalidResponseType => StatusCode::BAD_REQUEST,
			Self::InvalidGrantType => StatusCode::BAD_REQUEST,
			Self::InvalidAuthorizationHeader => StatusCode::UNAUTHORIZED,
			Self::IncorrectCredentials => StatusCode::UNAUTHORIZED,
			Self::InvalidCode => StatusCode::BAD_REQUEST,
			Self::MalformedCode => StatusCode::BAD_REQUEST,
			Self::InvalidRefreshToken => StatusCode::BAD_REQUEST,
			Self::MalformedRefreshToken => StatusCode::BAD_REQUEST,
			Self::InvalidCodeVerifier => StatusCode::BAD_REQUEST,
			Self::InvalidCodeChallengeMethod => StatusCode::BAD_REQUEST,
			Self::InvalidScope => StatusCode::BAD_REQUEST,
			Self::Unauthenticated => StatusCode::UNAUTHORIZED,
			Self::AuthorizationTokenInvalid => StatusCode::UNAUTHORIZED,
			Self::Unauthorized => StatusCode::FORBIDDEN,
			Self::WrongParameters => StatusCode::BAD_REQUEST,
			Self::InvalidUsername => StatusCode::BAD_REQUEST,
			Self::InvalidDisplayName => StatusCode::BAD_REQUEST,
			Self::InvalidPassword => StatusCode::BAD_REQUEST,
			Self::UsernameUnavailable => StatusCode::CONFLICT,
			Self::ResourceDoesNotExist => StatusCode::NOT_FOUND,
			Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Returns the message that should be used for this error. This is the
	/// message that is user-friendly and can be shown to the user
	pub fn message(&self) -> &'static str {
		match self {
			Self::InvalidResponseType => "Invalid response_type",
			Self::InvalidGrantType => "Invalid grant_type",
			Self::InvalidAuthorizationHeader => "Invalid authorization header",
			Self::IncorrectCredentials => "Incorrect credentials",
			Self::InvalidCode => "Invalid code",
			Self::MalformedCode => "Malformed code",
			Self::InvalidRefreshToken => "Invalid refresh_token",
			Self::MalformedRefreshToken => "Malformed refresh_token",
			Self::InvalidCodeVerifier => "Invalid code_verifier",
			Self::InvalidCodeChallengeMethod => "Invalid code_challenge_method",
			Self::InvalidScope => "Invalid scope",
			Self::Unauthenticated => "Unauthorized",
			Self::AuthorizationTokenInvalid => "Invalid access_token",
			Self::Unauthorized => "You are not authorized to perform that action",
			Self::WrongParameters => "The parameters sent with that request is invalid",
			Self::InvalidUsername => "Invalid username",
			Self::InvalidDisplayName => "Invalid display name",
			Self::InvalidPassword => "Password cannot be blank",
			Self::UsernameUnavailable => "This username is already taken by another user",
			Self::ResourceDoesNotExist => "The resource you are trying to access does not exist",
			Self::InternalServerError(_) => "An internal server error has occured",
		}
	}

	/// The name of the error as it is sent over the wire
	pub fn name(&self) -> &'static str {
		match self {
			Self::InvalidResponseType => "invalidResponseType",
			Self::InvalidGrantType => "invalidGrantType",
			Self::InvalidAuthorizationHeader => "invalidAuthorizationHeader",
			Self::IncorrectCredentials => "incorrectCredentials",
			Self::InvalidCode => "invalidCode",
			Self::MalformedCode => "malformedCode",
			Self::InvalidRefreshToken => "invalidRefreshToken",
			Self::MalformedRefreshToken => "malformedRefreshToken",
			Self::InvalidCodeVerifier => "invalidCodeVerifier",
			Self::InvalidCodeChallengeMethod => "invalidCodeChallengeMethod",
			Self::InvalidScope => "invalidScope",
			Self::Unauthenticated => "unauthenticated",
			Self::AuthorizationTokenInvalid => "authorizationTokenInvalid",
			Self::Unauthorized => "unauthorized",
			Self::WrongParameters => "wrongParameters",
			Self::InvalidUsername => "invalidUsername",
			Self::InvalidDisplayName => "invalidDisplayName",
			Self::InvalidPassword => "invalidPassword",
			Self::UsernameUnavailable => "usernameUnavailable",
			Self::ResourceDoesNotExist => "resourceDoesNotExist",
			Self::InternalServerError(_) => "internalServerError",
		}
	}

	/// Creates an [`ErrorType::InternalServerError`] with the given message
	pub fn server_error(message: impl Display) -> Self {
		Self::InternalServerError(anyhow::anyhow!(message.to_string()))
	}
}

impl PartialEq for ErrorType {
	fn eq(&self, other: &Self) -> bool {
		mem::discriminant(self) == mem::discriminant(other)
	}
}

impl Eq for ErrorType {}

impl<Error> From<Error> for ErrorType
where
	Error: StdError + Send + Sync + 'static,
{
	fn from(error: Error) -> Self {
		Self::InternalServerError(error.into())
	}
}

impl Display for ErrorType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message())
	}
}

impl Serialize for ErrorType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.name())
	}
}

/// The JSON body of every error response sent by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponseBody<'a> {
	/// Whether the request was successful or not. This is always false.
	pub success: bool,
	/// The error type of the response.
	pub error: &'a ErrorType,
	/// A user-friendly message describing the error.
	pub message: &'static str,
}

impl IntoResponse for ErrorType {
	fn into_response(self) -> Response {
		if let Self::InternalServerError(err) = &self {
			tracing::error!("Error occured while processing request: {:?}", err);
		}

		(
			self.default_status_code(),
			Json(ApiErrorResponseBody {
				success: false,
				error: &self,
				message: self.message(),
			}),
		)
			.into_response()
	}
}
