//! Optional reachability probe for the authorization host.
//!
//! The guard never calls this itself. Hosts run [`HealthCheck::probe`] at startup or on a
//! schedule and read [`HealthCheck::last`] from readiness endpoints.

// self
use crate::{
	_prelude::*,
	client::AuthorizationClient,
	guard::AuthorizationGuard,
	http::AuthorizationTransport,
	obs::{trace_debug, trace_warn},
};

/// Result of one probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reachability {
	/// The host answered with some HTTP status.
	Reachable {
		/// Status returned by the host.
		status: u16,
	},
	/// No HTTP answer could be obtained.
	Unreachable {
		/// Transport failure description.
		reason: String,
	},
}
impl Reachability {
	/// Whether the host answered at all.
	pub fn is_reachable(&self) -> bool {
		matches!(self, Self::Reachable { .. })
	}
}

/// Probes the authorization host with `HEAD /` and remembers the latest result.
pub struct HealthCheck<T>
where
	T: ?Sized + AuthorizationTransport,
{
	client: AuthorizationClient<T>,
	target: Url,
	last: RwLock<Option<Reachability>>,
}
impl<T> HealthCheck<T>
where
	T: ?Sized + AuthorizationTransport,
{
	/// Creates a probe for the root of `endpoint`'s host.
	pub fn new(client: AuthorizationClient<T>, endpoint: &Url) -> Self {
		let mut target = endpoint.clone();

		target.set_path("/");
		target.set_query(None);
		target.set_fragment(None);

		Self { client, target, last: RwLock::new(None) }
	}

	/// Creates a probe that shares `guard`'s transport and targets its authorization host.
	pub fn for_guard(guard: &AuthorizationGuard<T>) -> Self {
		Self::new(guard.client().clone(), guard.config().authorization_url())
	}

	/// URL being probed.
	pub fn target(&self) -> &Url {
		&self.target
	}

	/// Sends one probe and records its result.
	pub async fn probe(&self) -> Reachability {
		let reachability =
			match self.client.send_request(None::<&Value>, Method::HEAD, &self.target).await {
				Ok(response) => {
					trace_debug!(
						host = %self.target,
						status = response.status,
						"authorization host answered"
					);

					Reachability::Reachable { status: response.status }
				},
				Err(e) => {
					trace_warn!(
						host = %self.target,
						error = %e,
						"your authorization server may not be up"
					);

					Reachability::Unreachable { reason: e.to_string() }
				},
			};

		*self.last.write() = Some(reachability.clone());

		reachability
	}

	/// Latest recorded result, if a probe has run.
	pub fn last(&self) -> Option<Reachability> {
		self.last.read().clone()
	}
}
impl<T> Debug for HealthCheck<T>
where
	T: ?Sized + AuthorizationTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HealthCheck")
			.field("target", &self.target.as_str())
			.field("last", &*self.last.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, config::ConfigOverride};

	#[tokio::test]
	async fn probe_targets_the_host_root_and_records_the_result() {
		let transport = ScriptedTransport::replying(404, None);
		let guard = build_scripted_guard(
			ConfigOverride::default().host("authz.internal").port(7000),
			transport.clone(),
		);
		let health = HealthCheck::for_guard(&guard);

		assert_eq!(health.last(), None);
		assert_eq!(health.probe().await, Reachability::Reachable { status: 404 });
		assert_eq!(health.last(), Some(Reachability::Reachable { status: 404 }));

		let calls = transport.calls();

		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].method, Method::HEAD);
		assert_eq!(calls[0].endpoint.as_str(), "http://authz.internal:7000/");
		assert_eq!(calls[0].body, None);
	}

	#[tokio::test]
	async fn transport_failures_mark_the_host_unreachable() {
		let guard =
			build_scripted_guard(ConfigOverride::default(), ScriptedTransport::failing("refused"));
		let health = HealthCheck::for_guard(&guard);
		let result = health.probe().await;

		assert!(!result.is_reachable());
		assert_eq!(health.last(), Some(result));
		// A probe never counts as an authorization pass.
		assert_eq!(guard.metrics().attempts(), 0);
	}
}
