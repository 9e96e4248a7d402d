//! Transport primitives for calls to the remote authorization service.
//!
//! [`AuthorizationTransport`] is the crate's only dependency on an HTTP stack. The default
//! [`ReqwestTransport`] lives behind the `reqwest` feature; hosts with their own client
//! implement the trait and hand it to [`AuthorizationGuard::with_transport`].
//!
//! [`AuthorizationGuard::with_transport`]: crate::guard::AuthorizationGuard::with_transport

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`AuthorizationTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RemoteResponse, TransportError>> + 'a + Send>>;

/// Executes one HTTP exchange with the authorization service.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// every request task, and the returned future must be `Send` so hosts can drive it on a
/// multi-threaded runtime. No retries or timeouts are expected beyond what the underlying
/// client applies; any failure to obtain a status code is a [`TransportError`].
pub trait AuthorizationTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `method endpoint` with `body` attached as JSON when present.
	fn execute<'a>(
		&'a self,
		method: Method,
		endpoint: &'a Url,
		body: Option<Value>,
	) -> TransportFuture<'a>;
}

/// Status and decoded body returned by the authorization service.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteResponse {
	/// HTTP status code.
	pub status: u16,
	/// JSON body; `None` when empty, a JSON string when the payload is not JSON.
	pub body: Option<Value>,
}
impl RemoteResponse {
	/// Decodes a raw response payload.
	pub fn decode_body(raw: &[u8]) -> Option<Value> {
		if raw.iter().all(u8::is_ascii_whitespace) {
			return None;
		}

		Some(
			serde_json::from_slice(raw)
				.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned())),
		)
	}

	/// Whether the service authorized the request.
	pub fn is_authorized(&self) -> bool {
		self.status == StatusCode::OK.as_u16()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Authorization verdicts must come from the configured endpoint itself, so the client built
/// by [`ReqwestTransport::new`] does not follow redirects; a redirect status is treated as a
/// denial. Configure any custom [`ReqwestClient`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client with redirects disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AuthorizationTransport for ReqwestTransport {
	fn execute<'a>(
		&'a self,
		method: Method,
		endpoint: &'a Url,
		body: Option<Value>,
	) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut request = self.0.request(method, endpoint.clone());

			if let Some(body) = body.as_ref() {
				request = request.json(body);
			}

			let response = request.send().await?;
			let status = response.status().as_u16();
			let raw = response.bytes().await?;

			Ok(RemoteResponse { status, body: RemoteResponse::decode_body(&raw) })
		})
	}
}
