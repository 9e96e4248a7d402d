//! Bearer-token extraction.

// self
use crate::{
	_prelude::*,
	catalog::{ErrorDescriptor, ErrorKind},
	request::InboundRequest,
};

/// Authentication scheme accepted by [`BearerTokenExtractor`].
pub const BEARER: &str = "Bearer";

/// Reasons a request carries no usable token. Every variant answers with `401`.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenRejection {
	/// The configured authorization header is absent.
	#[error("Request header must contain an authorization key word : {key}")]
	HeaderMissing {
		/// Header name that was expected.
		key: String,
	},
	/// The scheme is not `Bearer`.
	#[error("Token type must be 'Bearer'")]
	TypeMismatch,
	/// The header does not split into exactly a scheme and a value.
	#[error(
		"Token must have the format 'Bearer tokenValue' (Note : there is a space between the token type and the value)"
	)]
	FormatMismatch,
	/// The scheme is present but the value is empty.
	#[error("Authorization header carries the 'Bearer' type but no token value")]
	ValueMissing,
}
impl TokenRejection {
	/// HTTP status written for any rejection.
	pub const STATUS: StatusCode = StatusCode::UNAUTHORIZED;

	/// Catalog kind describing this rejection.
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::HeaderMissing { .. } | Self::TypeMismatch | Self::FormatMismatch =>
				ErrorKind::AuthenticationTypeNotAccord,
			Self::ValueMissing => ErrorKind::AuthenticationValueNotSet,
		}
	}

	/// Stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::HeaderMissing { .. } => "header_missing",
			Self::TypeMismatch => "type_mismatch",
			Self::FormatMismatch => "format_mismatch",
			Self::ValueMissing => "value_missing",
		}
	}

	/// Fresh descriptor with the rejection reason as its detail.
	pub fn descriptor(&self) -> ErrorDescriptor {
		self.kind().descriptor().with_detail(self.to_string())
	}
}

/// Derives the bearer token from a request.
///
/// Implementations return either the token or the single reason it is unusable; the guard
/// writes exactly one `401` for a rejection.
pub trait TokenExtractor
where
	Self: Send + Sync,
{
	/// Extracts the token, reading the header named `authorization_key`.
	fn extract(
		&self,
		request: &dyn InboundRequest,
		authorization_key: &str,
	) -> Result<String, TokenRejection>;
}
impl<F> TokenExtractor for F
where
	F: Fn(&dyn InboundRequest, &str) -> Result<String, TokenRejection> + Send + Sync,
{
	fn extract(
		&self,
		request: &dyn InboundRequest,
		authorization_key: &str,
	) -> Result<String, TokenRejection> {
		self(request, authorization_key)
	}
}

/// Default policy: `<authorization_key>: Bearer <value>`, first failing rule wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerTokenExtractor;
impl TokenExtractor for BearerTokenExtractor {
	fn extract(
		&self,
		request: &dyn InboundRequest,
		authorization_key: &str,
	) -> Result<String, TokenRejection> {
		let raw = request
			.header(authorization_key)
			.ok_or_else(|| TokenRejection::HeaderMissing { key: authorization_key.into() })?;

		parse_bearer(raw).map(str::to_owned)
	}
}

/// Validates a raw `Bearer <value>` header and returns the value.
pub fn parse_bearer(raw: &str) -> Result<&str, TokenRejection> {
	let mut parts = raw.split(' ');
	let scheme = parts.next().unwrap_or_default();

	if scheme != BEARER {
		return Err(TokenRejection::TypeMismatch);
	}

	let (Some(value), None) = (parts.next(), parts.next()) else {
		return Err(TokenRejection::FormatMismatch);
	};

	if value.is_empty() {
		return Err(TokenRejection::ValueMissing);
	}

	Ok(value)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::request::RequestContext;

	fn extract_with(key: &str, value: Option<&str>) -> Result<String, TokenRejection> {
		let mut builder = RequestContext::builder();

		if let Some(value) = value {
			builder = builder.header(key, value);
		}

		BearerTokenExtractor.extract(&builder.build(), key)
	}

	#[test]
	fn well_formed_header_yields_the_value() {
		assert_eq!(extract_with("Authorization", Some("Bearer abc123")), Ok("abc123".into()));
	}

	#[test]
	fn missing_header_names_the_required_key() {
		let err = extract_with("X-Auth", None).expect_err("Missing header should be rejected.");

		assert_eq!(err, TokenRejection::HeaderMissing { key: "X-Auth".into() });
		assert_eq!(
			err.descriptor().detail.as_deref(),
			Some("Request header must contain an authorization key word : X-Auth")
		);
		assert_eq!(err.kind().code(), "AUT_002");
	}

	#[test]
	fn rules_apply_in_order_and_stop_at_the_first_failure() {
		let cases = [
			("Basic abc123", TokenRejection::TypeMismatch),
			("bearer abc123", TokenRejection::TypeMismatch),
			("Bearerabc123", TokenRejection::TypeMismatch),
			// Wrong scheme and wrong shape: the scheme rule reports first.
			("Basic a b", TokenRejection::TypeMismatch),
			("Bearer", TokenRejection::FormatMismatch),
			("Bearer a b", TokenRejection::FormatMismatch),
			("Bearer  abc123", TokenRejection::FormatMismatch),
			("Bearer ", TokenRejection::ValueMissing),
		];

		for (raw, expected) in cases {
			assert_eq!(parse_bearer(raw), Err(expected), "unexpected verdict for {raw:?}");
		}
	}

	#[test]
	fn rejections_map_to_catalog_entries() {
		assert_eq!(
			TokenRejection::TypeMismatch.descriptor().detail.as_deref(),
			Some("Token type must be 'Bearer'")
		);
		assert_eq!(TokenRejection::ValueMissing.kind(), ErrorKind::AuthenticationValueNotSet);
		assert_eq!(TokenRejection::STATUS.as_u16(), 401);
	}
}
