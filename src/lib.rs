//! Request-interception layer that extracts a bearer token and a resource identifier from an
//! incoming request, asks a remote authorization service for a verdict, and either lets the
//! request through or writes the denial back to the caller.
//!
//! The entry point is [`guard::AuthorizationGuard`]. Host frameworks plug in through the
//! [`request::InboundRequest`] and [`response::OutboundResponse`] contracts, and callers can
//! replace how the token and the resource id are derived via the strategies in [`extract`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod health;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;
	pub use parking_lot::Mutex;

	// self
	use crate::{
		config::{ConfigOverride, GuardConfig},
		error::TransportError,
		guard::AuthorizationGuard,
		http::{AuthorizationTransport, RemoteResponse, TransportFuture},
		request::RequestContext,
	};

	/// Outbound call captured by [`ScriptedTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedCall {
		/// HTTP method used for the call.
		pub method: Method,
		/// Fully qualified endpoint that was targeted.
		pub endpoint: Url,
		/// JSON payload, if one was attached.
		pub body: Option<Value>,
	}

	/// In-memory transport that replays a fixed reply and records every call.
	#[derive(Clone, Debug)]
	pub struct ScriptedTransport {
		reply: Result<RemoteResponse, String>,
		calls: Arc<Mutex<Vec<RecordedCall>>>,
	}
	impl ScriptedTransport {
		/// Replies to every call with the provided status and body.
		pub fn replying(status: u16, body: Option<Value>) -> Self {
			Self { reply: Ok(RemoteResponse { status, body }), calls: Default::default() }
		}

		/// Fails every call with a network error carrying `message`.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { reply: Err(message.into()), calls: Default::default() }
		}

		/// Returns a snapshot of the recorded calls.
		pub fn calls(&self) -> Vec<RecordedCall> {
			self.calls.lock().clone()
		}
	}
	impl AuthorizationTransport for ScriptedTransport {
		fn execute<'a>(
			&'a self,
			method: Method,
			endpoint: &'a Url,
			body: Option<Value>,
		) -> TransportFuture<'a> {
			self.calls.lock().push(RecordedCall { method, endpoint: endpoint.clone(), body });

			let reply = self.reply.clone();

			Box::pin(async move {
				reply.map_err(|message| {
					TransportError::network(std::io::Error::new(
						std::io::ErrorKind::ConnectionRefused,
						message,
					))
				})
			})
		}
	}

	/// Builds a guard over [`ScriptedTransport`] using the provided overrides.
	pub fn build_scripted_guard(
		overrides: ConfigOverride,
		transport: ScriptedTransport,
	) -> AuthorizationGuard<ScriptedTransport> {
		let config = GuardConfig::new(overrides).expect("Test configuration should merge.");

		AuthorizationGuard::with_transport(config, transport)
	}

	/// Well-formed request carrying `Authorization: Bearer abc123` and query `_id=r1`.
	pub fn bearer_request() -> RequestContext {
		RequestContext::builder()
			.method(Method::GET)
			.url("/documents?_id=r1")
			.header("Authorization", "Bearer abc123")
			.query("_id", "r1")
			.build()
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use ::http::{Method, StatusCode};
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::Result;
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
