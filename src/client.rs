//! Authorization request body and the client that posts it.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{AuthorizationTransport, RemoteResponse},
	request::{InboundRequest, Params},
};

/// Body posted to the authorization service for one incoming request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
	/// Configured service name.
	pub service: Option<String>,
	/// Caller address.
	pub ip: Option<String>,
	/// Route parameters.
	pub params: Params,
	/// Request path.
	pub path: String,
	/// Query parameters.
	pub query: Params,
	/// Whether the request arrived over TLS.
	pub secure: bool,
	/// Whether the request was issued by `XMLHttpRequest`.
	pub xhr: bool,
	/// Original request target.
	pub route: String,
	/// HTTP method of the incoming request.
	pub method: String,
	/// JSON body of the incoming request, `null` when absent.
	pub body: Option<Value>,
	/// Resource identifier derived by the access-object strategy.
	pub object_id: Option<String>,
	/// Bearer token derived by the token strategy.
	pub token: String,
}
impl AuthorizationRequest {
	/// Snapshots `request` together with the derived identifier and token.
	pub fn from_request(
		request: &dyn InboundRequest,
		service: Option<&str>,
		object_id: Option<String>,
		token: String,
	) -> Self {
		Self {
			service: service.map(str::to_owned),
			ip: request.ip().map(str::to_owned),
			params: request.params().clone(),
			path: request.path().to_owned(),
			query: request.query().clone(),
			secure: request.secure(),
			xhr: request.xhr(),
			route: request.url().to_owned(),
			method: request.method().as_str().to_owned(),
			body: request.body().cloned(),
			object_id,
			token,
		}
	}
}

/// Sends authorization requests over an [`AuthorizationTransport`].
#[derive(Debug)]
pub struct AuthorizationClient<T>
where
	T: ?Sized + AuthorizationTransport,
{
	transport: Arc<T>,
}
impl<T> AuthorizationClient<T>
where
	T: ?Sized + AuthorizationTransport,
{
	/// Wraps a shared transport.
	pub fn new(transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into() }
	}

	/// Underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Sends `method endpoint`, attaching `body` as JSON only when it is present.
	///
	/// Exactly one network call is made; there are no retries.
	pub async fn send_request<B>(
		&self,
		body: Option<&B>,
		method: Method,
		endpoint: &Url,
	) -> Result<RemoteResponse, TransportError>
	where
		B: ?Sized + Serialize,
	{
		let payload = body.map(serde_json::to_value).transpose()?;

		self.transport.execute(method, endpoint, payload).await
	}

	/// Posts an authorization request to `endpoint`.
	pub async fn check(
		&self,
		request: &AuthorizationRequest,
		endpoint: &Url,
	) -> Result<RemoteResponse, TransportError> {
		self.send_request(Some(request), Method::POST, endpoint).await
	}
}
impl<T> Clone for AuthorizationClient<T>
where
	T: ?Sized + AuthorizationTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::ScriptedTransport, request::RequestContext};

	fn endpoint() -> Url {
		Url::parse("http://authz.test/check").expect("Test endpoint should parse.")
	}

	#[test]
	fn body_mirrors_the_incoming_request() {
		let request = RequestContext::builder()
			.method(Method::PUT)
			.url("/documents/7?draft=true")
			.query("draft", "true")
			.param("_id", "7")
			.ip("198.51.100.4")
			.secure(true)
			.body(serde_json::json!({ "title": "t" }))
			.build();
		let body = AuthorizationRequest::from_request(
			&request,
			Some("docs"),
			Some("7".into()),
			"abc".into(),
		);
		let json = serde_json::to_value(&body).expect("Body should serialize.");

		assert_eq!(
			json,
			serde_json::json!({
				"service": "docs",
				"ip": "198.51.100.4",
				"params": { "_id": "7" },
				"path": "/documents/7",
				"query": { "draft": "true" },
				"secure": true,
				"xhr": false,
				"route": "/documents/7?draft=true",
				"method": "PUT",
				"body": { "title": "t" },
				"objectId": "7",
				"token": "abc",
			})
		);
	}

	#[test]
	fn absent_values_serialize_as_null() {
		let request = RequestContext::builder().build();
		let body = AuthorizationRequest::from_request(&request, None, None, "t".into());
		let json = serde_json::to_value(&body).expect("Body should serialize.");

		assert_eq!(json["service"], Value::Null);
		assert_eq!(json["body"], Value::Null);
		assert_eq!(json["objectId"], Value::Null);
		assert_eq!(json["ip"], Value::Null);
	}

	#[tokio::test]
	async fn json_is_attached_only_when_a_body_is_present() {
		let transport = ScriptedTransport::replying(200, None);
		let client = AuthorizationClient::<ScriptedTransport>::new(transport.clone());

		client
			.send_request(None::<&Value>, Method::GET, &endpoint())
			.await
			.expect("Scripted call should succeed.");
		client
			.send_request(Some(&serde_json::json!({ "k": "v" })), Method::POST, &endpoint())
			.await
			.expect("Scripted call should succeed.");

		let calls = transport.calls();

		assert_eq!(calls.len(), 2);
		assert_eq!(calls[0].method, Method::GET);
		assert_eq!(calls[0].body, None);
		assert_eq!(calls[1].method, Method::POST);
		assert_eq!(calls[1].body, Some(serde_json::json!({ "k": "v" })));
		assert_eq!(calls[1].endpoint, endpoint());
	}

	#[tokio::test]
	async fn transport_failures_surface_as_errors() {
		let transport = ScriptedTransport::failing("connection refused");
		let client = AuthorizationClient::<ScriptedTransport>::new(transport);
		let err = client
			.send_request(None::<&Value>, Method::POST, &endpoint())
			.await
			.expect_err("Scripted failure should surface.");

		assert!(matches!(err, TransportError::Network { .. }));
	}
}
