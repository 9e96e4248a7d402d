//! Inbound request contract consumed from the hosting HTTP framework.
//!
//! The guard only ever reads from a request. Frameworks either implement
//! [`InboundRequest`] for their own request type or snapshot the relevant parts into a
//! [`RequestContext`] (see [`RequestContext::from_http_parts`]).

// crates.io
use ::http::{header, request::Parts};
// self
use crate::_prelude::*;

/// Query-string or route parameters keyed by name.
pub type Params = BTreeMap<String, String>;

/// Read-only view of an incoming request.
pub trait InboundRequest
where
	Self: Send + Sync,
{
	/// Looks up a header by name (case-insensitive). Values that are not valid UTF-8 are
	/// reported as absent.
	fn header(&self, name: &str) -> Option<&str>;

	/// Parsed query-string parameters.
	fn query(&self) -> &Params;

	/// Route parameters resolved by the host router.
	fn params(&self) -> &Params;

	/// HTTP method of the request.
	fn method(&self) -> &Method;

	/// Request path without the query string.
	fn path(&self) -> &str;

	/// Original request target (path plus query string).
	fn url(&self) -> &str;

	/// Remote address of the caller, when known.
	fn ip(&self) -> Option<&str>;

	/// Whether the request arrived over TLS.
	fn secure(&self) -> bool;

	/// Whether the request was issued by `XMLHttpRequest`.
	fn xhr(&self) -> bool;

	/// Parsed JSON body, when the host has one.
	fn body(&self) -> Option<&Value>;
}

/// Owned snapshot of an incoming request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestContext {
	headers: BTreeMap<String, String>,
	query: Params,
	params: Params,
	method: Method,
	path: String,
	url: String,
	ip: Option<String>,
	secure: bool,
	xhr: bool,
	body: Option<Value>,
}
impl RequestContext {
	/// Starts a builder for a `GET /` request with no headers.
	pub fn builder() -> RequestContextBuilder {
		RequestContextBuilder::default()
	}

	/// Snapshots request parts produced by any `http`-based framework.
	///
	/// The query string is decoded from the URI; route parameters are left empty because only
	/// the router knows them (add them with [`RequestContext::with_params`]). `secure` follows
	/// the URI scheme or an `X-Forwarded-Proto: https` header and `xhr` follows
	/// `X-Requested-With: XMLHttpRequest`.
	pub fn from_http_parts(parts: &Parts) -> Self {
		let mut builder = Self::builder().method(parts.method.clone());

		for (name, value) in &parts.headers {
			if let Ok(value) = value.to_str() {
				builder = builder.header(name.as_str(), value);
			}
		}

		let uri = &parts.uri;
		let url = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or_else(|| uri.path());

		builder = builder.url(url);

		if let Some(raw) = uri.query() {
			for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
				builder = builder.query(key, value);
			}
		}

		let forwarded_https = parts
			.headers
			.get("x-forwarded-proto")
			.and_then(|v| v.to_str().ok())
			.is_some_and(|v| v.eq_ignore_ascii_case("https"));
		let xhr = parts
			.headers
			.get("x-requested-with")
			.and_then(|v| v.to_str().ok())
			.is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
		let ip = parts
			.headers
			.get(header::FORWARDED)
			.or_else(|| parts.headers.get("x-forwarded-for"))
			.and_then(|v| v.to_str().ok())
			.and_then(first_forwarded_ip);

		builder = builder
			.secure(uri.scheme_str() == Some("https") || forwarded_https)
			.xhr(xhr);

		if let Some(ip) = ip {
			builder = builder.ip(ip);
		}

		builder.build()
	}

	/// Replaces the route parameters.
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;

		self
	}

	/// Replaces the JSON body.
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}
}
impl InboundRequest for RequestContext {
	fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	fn query(&self) -> &Params {
		&self.query
	}

	fn params(&self) -> &Params {
		&self.params
	}

	fn method(&self) -> &Method {
		&self.method
	}

	fn path(&self) -> &str {
		&self.path
	}

	fn url(&self) -> &str {
		&self.url
	}

	fn ip(&self) -> Option<&str> {
		self.ip.as_deref()
	}

	fn secure(&self) -> bool {
		self.secure
	}

	fn xhr(&self) -> bool {
		self.xhr
	}

	fn body(&self) -> Option<&Value> {
		self.body.as_ref()
	}
}

/// Builder for [`RequestContext`] values.
#[derive(Clone, Debug, Default)]
pub struct RequestContextBuilder {
	headers: BTreeMap<String, String>,
	query: Params,
	params: Params,
	method: Method,
	url: Option<String>,
	ip: Option<String>,
	secure: bool,
	xhr: bool,
	body: Option<Value>,
}
impl RequestContextBuilder {
	/// Sets the HTTP method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Sets the request target; the path is everything before `?`.
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());

		self
	}

	/// Adds a header; names are stored lowercased.
	pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Adds a query parameter. Repeated keys keep the last value.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Adds a route parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Sets the caller address.
	pub fn ip(mut self, ip: impl Into<String>) -> Self {
		self.ip = Some(ip.into());

		self
	}

	/// Marks the request as received over TLS.
	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;

		self
	}

	/// Marks the request as an `XMLHttpRequest`.
	pub fn xhr(mut self, xhr: bool) -> Self {
		self.xhr = xhr;

		self
	}

	/// Sets the JSON body.
	pub fn body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Finalizes the snapshot.
	pub fn build(self) -> RequestContext {
		let url = self.url.unwrap_or_else(|| "/".into());
		let path = url.split_once('?').map_or(url.as_str(), |(path, _)| path).to_owned();

		RequestContext {
			headers: self.headers,
			query: self.query,
			params: self.params,
			method: self.method,
			path,
			url,
			ip: self.ip,
			secure: self.secure,
			xhr: self.xhr,
			body: self.body,
		}
	}
}

fn first_forwarded_ip(raw: &str) -> Option<String> {
	let first = raw.split(',').next()?.trim();
	// RFC 7239 `for=` element, or a bare address from X-Forwarded-For.
	let value = first
		.split(';')
		.find_map(|pair| {
			let (key, value) = pair.trim().split_once('=')?;

			key.eq_ignore_ascii_case("for").then_some(value)
		})
		.unwrap_or(first)
		.trim_matches('"');

	(!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
	// crates.io
	use ::http::Request;
	// self
	use super::*;

	#[test]
	fn header_lookup_is_case_insensitive() {
		let request = RequestContext::builder().header("Authorization", "Bearer abc").build();

		assert_eq!(request.header("authorization"), Some("Bearer abc"));
		assert_eq!(request.header("AUTHORIZATION"), Some("Bearer abc"));
		assert_eq!(request.header("x-missing"), None);
	}

	#[test]
	fn builder_splits_path_from_url() {
		let request = RequestContext::builder().url("/documents/7?_id=r1").build();

		assert_eq!(request.path(), "/documents/7");
		assert_eq!(request.url(), "/documents/7?_id=r1");
		assert_eq!(request.method(), Method::GET);
	}

	#[test]
	fn http_parts_are_snapshotted() {
		let (parts, ()) = Request::builder()
			.method(Method::DELETE)
			.uri("https://api.example.com/documents?_id=r%201&page=2")
			.header("Authorization", "Bearer abc123")
			.header("X-Requested-With", "XMLHttpRequest")
			.header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
			.body(())
			.expect("Request should build.")
			.into_parts();
		let request = RequestContext::from_http_parts(&parts);

		assert_eq!(request.method(), Method::DELETE);
		assert_eq!(request.path(), "/documents");
		assert_eq!(request.url(), "/documents?_id=r%201&page=2");
		assert_eq!(request.query().get("_id").map(String::as_str), Some("r 1"));
		assert_eq!(request.query().get("page").map(String::as_str), Some("2"));
		assert_eq!(request.header("authorization"), Some("Bearer abc123"));
		assert_eq!(request.ip(), Some("203.0.113.7"));
		assert!(request.secure());
		assert!(request.xhr());
		assert!(request.params().is_empty());
	}

	#[test]
	fn forwarded_header_for_element_is_preferred() {
		assert_eq!(
			first_forwarded_ip(r#"for="192.0.2.60";proto=http;by=203.0.113.43"#),
			Some("192.0.2.60".into())
		);
		assert_eq!(first_forwarded_ip(""), None);
	}
}
