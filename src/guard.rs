//! Per-request authorization orchestration.
//!
//! [`AuthorizationGuard::decide`] runs one authorization pass and returns a typed
//! [`Decision`]; [`AuthorizationGuard::authorize`] applies that decision to the host's
//! response and continuation. A pass moves through
//! `extracting -> rejected | awaiting service -> authorized | denied | unavailable`, and every
//! state except `authorized` terminates the request. Anything short of a confirmed `200`
//! from the authorization service fails closed.

mod metrics;

pub use metrics::*;

// self
use crate::{
	_prelude::*,
	catalog::{ErrorDescriptor, ErrorKind},
	client::{AuthorizationClient, AuthorizationRequest},
	config::GuardConfig,
	extract::TokenRejection,
	http::{AuthorizationTransport, RemoteResponse},
	obs::{self, DecisionOutcome, GuardSpan, trace_debug, trace_warn},
	request::InboundRequest,
	response::OutboundResponse,
};
#[cfg(feature = "reqwest")]
use crate::{config::ConfigOverride, error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Guard specialized for the crate's default reqwest transport.
pub type ReqwestGuard = AuthorizationGuard<ReqwestTransport>;

/// Terminal result of one authorization pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
	/// The authorization service answered `200`; the request proceeds.
	Authorized,
	/// The token strategy found no usable token; no outbound call was made.
	Rejected(TokenRejection),
	/// The authorization service answered with another status; it is mirrored back together
	/// with the service's body carrying the configured denial detail.
	Denied {
		/// Status returned by the authorization service.
		status: u16,
		/// Body returned by the authorization service, with `detail` set.
		body: Value,
	},
	/// Authorization could not be confirmed.
	Unavailable {
		/// `502` for transport failures, `500` when the resource id cannot be derived.
		status: u16,
		/// Descriptor explaining the failure.
		descriptor: ErrorDescriptor,
	},
}
impl Decision {
	/// Whether the request may proceed.
	pub fn is_authorized(&self) -> bool {
		matches!(self, Self::Authorized)
	}

	/// Status written to the caller; `200` for [`Decision::Authorized`], which writes nothing.
	pub fn status(&self) -> u16 {
		match self {
			Self::Authorized => StatusCode::OK.as_u16(),
			Self::Rejected(_) => TokenRejection::STATUS.as_u16(),
			Self::Denied { status, .. } | Self::Unavailable { status, .. } => *status,
		}
	}

	/// JSON body written to the caller, if any.
	pub fn body(&self) -> Option<Value> {
		match self {
			Self::Authorized => None,
			Self::Rejected(rejection) => Some(rejection.descriptor().to_json()),
			Self::Denied { body, .. } => Some(body.clone()),
			Self::Unavailable { descriptor, .. } => Some(descriptor.to_json()),
		}
	}

	/// Outcome label for observability.
	pub fn outcome(&self) -> DecisionOutcome {
		match self {
			Self::Authorized => DecisionOutcome::Authorized,
			Self::Rejected(_) => DecisionOutcome::Rejected,
			Self::Denied { .. } => DecisionOutcome::Denied,
			Self::Unavailable { .. } => DecisionOutcome::Unavailable,
		}
	}

	/// Writes a terminated request to `response`. Returns `true` when the request may proceed,
	/// in which case nothing is written.
	pub fn apply<R>(&self, response: &mut R) -> bool
	where
		R: ?Sized + OutboundResponse,
	{
		let Some(body) = self.body() else {
			return true;
		};

		response.set_status(self.status());
		response.write_json(&body);

		false
	}
}

/// Authorization entry point shared by every request task.
///
/// The guard is cheap to clone; the effective configuration, transport, and counters are
/// shared behind [`Arc`]s and never mutated by a pass.
pub struct AuthorizationGuard<T>
where
	T: ?Sized + AuthorizationTransport,
{
	config: Arc<GuardConfig>,
	client: AuthorizationClient<T>,
	metrics: Arc<GuardMetrics>,
}
impl<T> AuthorizationGuard<T>
where
	T: ?Sized + AuthorizationTransport,
{
	/// Creates a guard over a caller-provided transport.
	pub fn with_transport(config: GuardConfig, transport: impl Into<Arc<T>>) -> Self {
		Self {
			config: Arc::new(config),
			client: AuthorizationClient::new(transport),
			metrics: Default::default(),
		}
	}

	/// Effective configuration.
	pub fn config(&self) -> &GuardConfig {
		&self.config
	}

	/// Client used for outbound calls.
	pub fn client(&self) -> &AuthorizationClient<T> {
		&self.client
	}

	/// Per-guard decision counters.
	pub fn metrics(&self) -> &GuardMetrics {
		&self.metrics
	}

	/// Runs one authorization pass for `request`.
	pub async fn decide(&self, request: &dyn InboundRequest) -> Decision {
		let span = GuardSpan::new("decide");

		obs::record_decision(DecisionOutcome::Attempt);
		self.metrics.record(DecisionOutcome::Attempt);

		let decision = span.instrument(self.evaluate(request)).await;
		let outcome = decision.outcome();

		obs::record_decision(outcome);
		self.metrics.record(outcome);

		decision
	}

	/// Runs one authorization pass and applies it.
	///
	/// When authorized, `next` runs exactly once, nothing is written to `response`, and its
	/// output is returned. Otherwise the status and JSON body are written to `response`, `next`
	/// never runs, and `None` is returned.
	pub async fn authorize<R, N, Fut>(
		&self,
		request: &dyn InboundRequest,
		response: &mut R,
		next: N,
	) -> Option<Fut::Output>
	where
		R: ?Sized + OutboundResponse,
		N: FnOnce() -> Fut,
		Fut: Future,
	{
		let decision = self.decide(request).await;

		if decision.apply(response) { Some(next().await) } else { None }
	}

	async fn evaluate(&self, request: &dyn InboundRequest) -> Decision {
		let config = &self.config;
		let token = match config.get_token().extract(request, config.authorization_key()) {
			Ok(token) => token,
			Err(rejection) => {
				trace_debug!(reason = rejection.as_str(), "request carries no usable token");

				return Decision::Rejected(rejection);
			},
		};
		let object_id = match config.get_access_object().extract(request) {
			Ok(object_id) => object_id,
			Err(e) => {
				trace_warn!(error = %e, "access object could not be resolved");

				return Decision::Unavailable {
					status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
					descriptor: ErrorKind::AccessObjectUnresolved
						.descriptor()
						.with_detail(e.to_string()),
				};
			},
		};
		let body = AuthorizationRequest::from_request(request, config.service(), object_id, token);

		match self.client.check(&body, config.authorization_url()).await {
			Ok(response) if response.is_authorized() => {
				trace_debug!(detail = %config.message().authorized, "request authorized");

				Decision::Authorized
			},
			Ok(RemoteResponse { status, body }) => {
				trace_debug!(status, "request denied by the authorization service");

				let body = denial_body(body, &config.message().not_authorized);

				Decision::Denied { status, body }
			},
			Err(e) => {
				trace_warn!(
					error = %e,
					endpoint = %config.authorization_url(),
					"authorization service could not be reached"
				);

				Decision::Unavailable {
					status: StatusCode::BAD_GATEWAY.as_u16(),
					descriptor: ErrorKind::AuthorizationServiceUnavailable
						.descriptor()
						.with_detail(e.to_string()),
				}
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl AuthorizationGuard<ReqwestTransport> {
	/// Merges `overrides` over the defaults and provisions a reqwest transport.
	pub fn new(overrides: ConfigOverride) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(GuardConfig::new(overrides)?, ReqwestTransport::new()?))
	}
}
impl<T> Clone for AuthorizationGuard<T>
where
	T: ?Sized + AuthorizationTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			client: self.client.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<T> Debug for AuthorizationGuard<T>
where
	T: ?Sized + AuthorizationTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationGuard")
			.field("config", &self.config)
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Attaches `detail` to the service's denial body.
///
/// JSON objects keep their fields; any other payload (including an empty body) is replaced by
/// an object holding only the detail.
fn denial_body(body: Option<Value>, detail: &str) -> Value {
	let mut object = match body {
		Some(Value::Object(object)) => object,
		_ => Map::new(),
	};

	object.insert("detail".into(), Value::String(detail.into()));

	Value::Object(object)
}
