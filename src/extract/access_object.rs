//! Resource-identifier extraction.

// self
use crate::{_prelude::*, error::BoxError, request::InboundRequest};

/// Derives the opaque resource identifier forwarded to the authorization service.
///
/// `Ok(None)` means the request targets no particular resource. `Err` means the identifier
/// could not be derived at all; the guard fails closed on it and configuration rejects a
/// strategy that errors on the sample request.
///
/// The guard runs the token strategy first and only consults this strategy once a token was
/// found, so requests rejected for their token never reach it. Besides real requests, it
/// runs once against the sample request while the configuration is merged.
pub trait AccessObjectExtractor
where
	Self: Send + Sync,
{
	/// Extracts the resource identifier from `request`.
	fn extract(&self, request: &dyn InboundRequest) -> Result<Option<String>, BoxError>;
}
impl<F> AccessObjectExtractor for F
where
	F: Fn(&dyn InboundRequest) -> Result<Option<String>, BoxError> + Send + Sync,
{
	fn extract(&self, request: &dyn InboundRequest) -> Result<Option<String>, BoxError> {
		self(request)
	}
}

/// Default policy: the `_id` query parameter, then the `_id` route parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdParamExtractor;
impl IdParamExtractor {
	/// Parameter name consulted in both the query string and the route.
	pub const KEY: &'static str = "_id";
}
impl AccessObjectExtractor for IdParamExtractor {
	fn extract(&self, request: &dyn InboundRequest) -> Result<Option<String>, BoxError> {
		Ok(request.query().get(Self::KEY).or_else(|| request.params().get(Self::KEY)).cloned())
	}
}
