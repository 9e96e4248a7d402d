//! Crate-level error types shared by configuration, transport, and guard layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for opaque sources (transport failures, strategy failures).
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Per-request verdicts (rejections, denials, unreachable authorization service) are never
/// surfaced through this type; the guard turns them into responses. Only construction-time
/// failures and direct client calls return it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, body decoding).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised while building a guard.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Host, port, and endpoint (or the combined URL) do not form a valid URL.
	#[error("Authorization endpoint `{endpoint}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint string that failed to parse.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// JSON overrides could not be deserialized.
	#[error("Configuration override is invalid at `{path}`.")]
	InvalidOverride {
		/// Path of the offending field.
		path: String,
		/// Underlying deserialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The access-object strategy failed against the sample request.
	#[error("The access-object strategy must resolve a value for a well-formed request.")]
	AccessObjectProbe {
		/// Failure reported by the strategy.
		#[source]
		source: BoxError,
	},
	/// The token strategy rejected the sample request.
	#[error("The token strategy must yield a token for a well-formed request.")]
	TokenProbe {
		/// Rejection reported by the strategy.
		#[source]
		source: crate::extract::TokenRejection,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::InvalidOverride { path, source: e.into_inner() }
	}
}

/// Transport-level failures while talking to the authorization service.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the authorization service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request payload could not be encoded as JSON.
	#[error("Authorization request could not be encoded as JSON.")]
	Encode(#[from] serde_json::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn override_errors_keep_the_field_path() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Probe {
			port: u16,
		}

		let de = &mut serde_json::Deserializer::from_str(r#"{"port":"not-a-port"}"#);
		let err: ConfigError = serde_path_to_error::deserialize::<_, Probe>(de)
			.expect_err("A string port should fail to deserialize.")
			.into();

		assert!(matches!(err, ConfigError::InvalidOverride { ref path, .. } if path == "port"));
	}
}
