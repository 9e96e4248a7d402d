//! Startup probe that exercises both strategies against a synthetic well-formed request.

// self
use crate::{
	_prelude::*,
	config::GuardConfig,
	error::ConfigError,
	request::{InboundRequest, Params},
};

const SAMPLE_ID: &str = "someId";
const SAMPLE_TOKEN: &str = "Bearer someTokenValues";
const SAMPLE_OTHER_HEADER: &str = "something else";

/// Request with `_id` in both the query and the route, the configured authorization header
/// set to a valid bearer value, and every other header set to a filler value.
struct SampleRequest<'a> {
	authorization_key: &'a str,
	query: Params,
	params: Params,
	method: Method,
}
impl<'a> SampleRequest<'a> {
	fn new(authorization_key: &'a str) -> Self {
		let ids = Params::from([("_id".to_owned(), SAMPLE_ID.to_owned())]);

		Self { authorization_key, query: ids.clone(), params: ids, method: Method::GET }
	}
}
impl InboundRequest for SampleRequest<'_> {
	fn header(&self, name: &str) -> Option<&str> {
		if name.eq_ignore_ascii_case(self.authorization_key) {
			Some(SAMPLE_TOKEN)
		} else {
			Some(SAMPLE_OTHER_HEADER)
		}
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
		"/"
	}

	fn url(&self) -> &str {
		"/?_id=someId"
	}

	fn ip(&self) -> Option<&str> {
		None
	}

	fn secure(&self) -> bool {
		false
	}

	fn xhr(&self) -> bool {
		false
	}

	fn body(&self) -> Option<&Value> {
		None
	}
}

pub(super) fn validate_strategies(config: &GuardConfig) -> Result<(), ConfigError> {
	let sample = SampleRequest::new(config.authorization_key());

	config
		.get_access_object()
		.extract(&sample)
		.map_err(|source| ConfigError::AccessObjectProbe { source })?;
	config
		.get_token()
		.extract(&sample, config.authorization_key())
		.map_err(|source| ConfigError::TokenProbe { source })?;

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use crate::{
		config::{ConfigOverride, GuardConfig},
		error::{BoxError, ConfigError},
		extract::TokenRejection,
		request::InboundRequest,
	};

	#[test]
	fn failing_access_object_strategy_aborts_construction() {
		let err = GuardConfig::new(ConfigOverride::default().get_access_object(
			|_: &dyn InboundRequest| -> Result<Option<String>, BoxError> {
				Err("no resource mapping".into())
			},
		))
		.expect_err("A failing strategy should abort construction.");

		assert!(matches!(err, ConfigError::AccessObjectProbe { .. }));
	}

	#[test]
	fn null_access_objects_are_acceptable() {
		GuardConfig::new(ConfigOverride::default().get_access_object(
			|_: &dyn InboundRequest| -> Result<Option<String>, BoxError> { Ok(None) },
		))
		.expect("A strategy resolving no resource is still well-formed.");
	}

	#[test]
	fn token_strategy_must_accept_the_sample_request() {
		let err = GuardConfig::new(ConfigOverride::default().get_token(
			|_: &dyn InboundRequest, _: &str| -> Result<String, TokenRejection> {
				Err(TokenRejection::ValueMissing)
			},
		))
		.expect_err("A token strategy rejecting the sample should abort construction.");

		assert!(matches!(err, ConfigError::TokenProbe { source: TokenRejection::ValueMissing }));
	}

	#[test]
	fn default_token_strategy_follows_a_custom_header() {
		GuardConfig::new(ConfigOverride::default().authorization_key("X-Api-Token"))
			.expect("The sample request follows the configured header name.");
	}

	#[test]
	fn strategy_reading_a_fixed_header_sees_the_filler_value() {
		let err = GuardConfig::new(ConfigOverride::default().get_token(
			|request: &dyn InboundRequest, _: &str| -> Result<String, TokenRejection> {
				crate::extract::parse_bearer(request.header("X-Other").unwrap_or_default())
					.map(str::to_owned)
			},
		))
		.expect_err("Filler headers are not bearer tokens.");

		assert!(matches!(err, ConfigError::TokenProbe { source: TokenRejection::TypeMismatch }));
	}
}
