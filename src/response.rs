//! Outbound response contract written by the guard when a request is terminated.

// crates.io
use ::http::{HeaderValue, Response, header};
// self
use crate::_prelude::*;

/// Minimal response surface the guard writes to.
pub trait OutboundResponse {
	/// Sets the HTTP status code.
	fn set_status(&mut self, status: u16);

	/// Writes `body` as the JSON response payload.
	fn write_json(&mut self, body: &Value);
}

/// Buffered response that records what the guard wrote.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonResponse {
	status: Option<u16>,
	body: Option<Value>,
	writes: usize,
}
impl JsonResponse {
	/// Status code written so far, if any.
	pub fn status(&self) -> Option<u16> {
		self.status
	}

	/// JSON body written so far, if any.
	pub fn body(&self) -> Option<&Value> {
		self.body.as_ref()
	}

	/// Number of JSON writes performed.
	pub fn writes(&self) -> usize {
		self.writes
	}

	/// Whether nothing has been written yet.
	pub fn is_untouched(&self) -> bool {
		self.status.is_none() && self.writes == 0
	}

	/// Converts the buffered writes into an `http` response with a JSON body.
	///
	/// An untouched buffer becomes an empty `200 OK`; an out-of-range status becomes `500`.
	pub fn into_http(self) -> Response<String> {
		let status = self
			.status
			.and_then(|code| StatusCode::from_u16(code).ok())
			.unwrap_or(if self.status.is_some() {
				StatusCode::INTERNAL_SERVER_ERROR
			} else {
				StatusCode::OK
			});
		let body = self.body.map(|body| body.to_string()).unwrap_or_default();
		let mut response = Response::new(body);

		*response.status_mut() = status;

		if self.writes > 0 {
			response
				.headers_mut()
				.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		response
	}
}
impl OutboundResponse for JsonResponse {
	fn set_status(&mut self, status: u16) {
		self.status = Some(status);
	}

	fn write_json(&mut self, body: &Value) {
		self.body = Some(body.clone());
		self.writes += 1;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn buffered_writes_convert_into_http_response() {
		let mut response = JsonResponse::default();

		assert!(response.is_untouched());

		response.set_status(403);
		response.write_json(&serde_json::json!({ "detail": "Access Denied" }));

		assert_eq!(response.writes(), 1);

		let http = response.into_http();

		assert_eq!(http.status(), StatusCode::FORBIDDEN);
		assert_eq!(
			http.headers().get(header::CONTENT_TYPE).map(HeaderValue::as_bytes),
			Some(&b"application/json"[..])
		);
		assert_eq!(http.body(), r#"{"detail":"Access Denied"}"#);
	}

	#[test]
	fn untouched_buffer_becomes_empty_ok() {
		let http = JsonResponse::default().into_http();

		assert_eq!(http.status(), StatusCode::OK);
		assert!(http.body().is_empty());
	}
}
