//! Demonstrates plugging a non-reqwest transport and a custom resource strategy into the guard.
//!
//! 1. Implement [`AuthorizationTransport`] so authorization requests go wherever the host wants;
//!    here an in-process allow list answers instead of a remote service.
//! 2. Replace the access-object strategy with a closure reading a route parameter.
//! 3. Build the guard with [`AuthorizationGuard::with_transport`] and run a few requests.

// std
use std::collections::BTreeSet;
// crates.io
use color_eyre::Result;
use serde_json::{Value, json};
// self
use remote_authz::{
	config::{ConfigOverride, GuardConfig},
	error::{BoxError, TransportError},
	guard::AuthorizationGuard,
	http::{AuthorizationTransport, RemoteResponse, TransportFuture},
	http_types::Method,
	request::{InboundRequest, RequestContext},
	response::JsonResponse,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = GuardConfig::new(
		ConfigOverride::default()
			.service("invoices")
			.not_authorized_message("Invoice access denied")
			.get_access_object(|request: &dyn InboundRequest| -> Result<Option<String>, BoxError> {
				Ok(request.params().get("invoiceId").cloned())
			}),
	)?;
	let transport = AllowList::new([("letmein", "inv-1"), ("letmein", "inv-2")]);
	let guard = AuthorizationGuard::<AllowList>::with_transport(config, transport);
	let requests = [
		("Bearer letmein", "inv-1"),
		("Bearer letmein", "inv-3"),
		("Basic letmein", "inv-1"),
		("Bearer offline", "inv-1"),
	];

	for (authorization, invoice) in requests {
		let request = RequestContext::builder()
			.method(Method::GET)
			.url(format!("/invoices/{invoice}"))
			.header("Authorization", authorization)
			.param("invoiceId", invoice)
			.build();
		let mut response = JsonResponse::default();
		let served = guard
			.authorize(&request, &mut response, || async move { format!("invoice {invoice}") })
			.await;

		match served {
			Some(body) => println!("{authorization} -> {invoice}: served {body}."),
			None => println!(
				"{authorization} -> {invoice}: {} {}.",
				response.status().unwrap_or_default(),
				response.body().cloned().unwrap_or(Value::Null)
			),
		}
	}

	let metrics = guard.metrics();

	println!(
		"Passes: {}, authorized: {}, rejected: {}, denied: {}, unavailable: {}.",
		metrics.attempts(),
		metrics.authorized(),
		metrics.rejected(),
		metrics.denied(),
		metrics.unavailable()
	);

	Ok(())
}

#[derive(Debug, thiserror::Error)]
#[error("Token `{0}` belongs to an offline identity provider.")]
struct OfflineProvider(String);

/// Grants `(token, invoice)` pairs from a fixed set.
struct AllowList {
	grants: BTreeSet<(String, String)>,
}
impl AllowList {
	fn new<const N: usize>(grants: [(&str, &str); N]) -> Self {
		Self {
			grants: grants
				.into_iter()
				.map(|(token, invoice)| (token.to_owned(), invoice.to_owned()))
				.collect(),
		}
	}
}
impl AuthorizationTransport for AllowList {
	fn execute<'a>(
		&'a self,
		_method: Method,
		_endpoint: &'a Url,
		body: Option<Value>,
	) -> TransportFuture<'a> {
		Box::pin(async move {
			let body = body.unwrap_or(Value::Null);
			let token = body["token"].as_str().unwrap_or_default().to_owned();
			let invoice = body["objectId"].as_str().unwrap_or_default().to_owned();

			if token == "offline" {
				return Err(TransportError::network(OfflineProvider(token)));
			}
			if self.grants.contains(&(token, invoice)) {
				Ok(RemoteResponse { status: 200, body: None })
			} else {
				let denial = json!({ "service": body["service"] });

				Ok(RemoteResponse { status: 403, body: Some(denial) })
			}
		})
	}
}
