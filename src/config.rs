//! Guard configuration: override layers, the merge into an effective configuration, and
//! startup validation of the extraction strategies.
//!
//! A [`ConfigOverride`] is a sparse layer. [`merge`] lays the caller's layer over a defaults
//! layer, merges the `message` sub-object field by field, resolves the authorization URL, and
//! probes both strategies against a synthetic request so a broken strategy fails at startup
//! instead of on the first real request.

mod probe;

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	extract::{AccessObjectExtractor, BearerTokenExtractor, IdParamExtractor, TokenExtractor},
};

/// Default authorization host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default authorization port.
pub const DEFAULT_PORT: u16 = 3400;
/// Default authorization endpoint path.
pub const DEFAULT_ENDPOINT: &str = "/auth/token/validate";
/// Default header carrying the bearer token.
pub const DEFAULT_AUTHORIZATION_KEY: &str = "Authorization";
/// Default detail attached to denials.
pub const DEFAULT_NOT_AUTHORIZED: &str = "Access Denied";
/// Default approval message.
pub const DEFAULT_AUTHORIZED: &str = "Access Granted";

/// Sparse message layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MessageOverride {
	/// Detail attached to denial bodies.
	pub not_authorized: Option<String>,
	/// Approval message.
	pub authorized: Option<String>,
}
impl MessageOverride {
	fn layered_over(self, base: Self) -> Self {
		Self {
			not_authorized: self.not_authorized.or(base.not_authorized),
			authorized: self.authorized.or(base.authorized),
		}
	}
}

/// Sparse configuration layer; every unset field falls through to the layer below.
///
/// Data fields deserialize from JSON using the camelCase keys `host`, `port`, `endpoint`,
/// `authEndPoint`, `service`, `authorizationKey`, and `message`. Strategies can only be set
/// in code.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverride {
	/// Authorization host, optionally with an `http://` or `https://` prefix.
	pub host: Option<String>,
	/// Authorization port; `0` leaves the port out of the URL. In JSON an explicit
	/// `"port": null` also leaves it out, while a missing key keeps the default.
	#[serde(default, deserialize_with = "deserialize_port")]
	pub port: Option<u16>,
	/// Authorization endpoint path.
	pub endpoint: Option<String>,
	/// Fully combined authorization URL; takes precedence over host, port, and endpoint.
	pub auth_end_point: Option<String>,
	/// Service name forwarded in every authorization request.
	pub service: Option<String>,
	/// Header carrying the bearer token.
	pub authorization_key: Option<String>,
	/// Message overrides, merged field by field.
	pub message: Option<MessageOverride>,
	/// Resource-identifier strategy.
	#[serde(skip)]
	pub get_access_object: Option<Arc<dyn AccessObjectExtractor>>,
	/// Token strategy.
	#[serde(skip)]
	pub get_token: Option<Arc<dyn TokenExtractor>>,
}
impl ConfigOverride {
	/// Fully populated built-in defaults layer.
	pub fn defaults() -> Self {
		Self {
			host: Some(DEFAULT_HOST.into()),
			port: Some(DEFAULT_PORT),
			endpoint: Some(DEFAULT_ENDPOINT.into()),
			auth_end_point: None,
			service: None,
			authorization_key: Some(DEFAULT_AUTHORIZATION_KEY.into()),
			message: Some(MessageOverride {
				not_authorized: Some(DEFAULT_NOT_AUTHORIZED.into()),
				authorized: Some(DEFAULT_AUTHORIZED.into()),
			}),
			get_access_object: Some(Arc::new(IdParamExtractor)),
			get_token: Some(Arc::new(BearerTokenExtractor)),
		}
	}

	/// Parses a JSON layer, reporting the path of the first offending field.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		Ok(serde_path_to_error::deserialize(de)?)
	}

	/// Sets the authorization host.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());

		self
	}

	/// Sets the authorization port (`0` omits it).
	pub fn port(mut self, port: u16) -> Self {
		self.port = Some(port);

		self
	}

	/// Sets the authorization endpoint path.
	pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());

		self
	}

	/// Sets a fully combined authorization URL.
	pub fn auth_end_point(mut self, url: impl Into<String>) -> Self {
		self.auth_end_point = Some(url.into());

		self
	}

	/// Sets the service name forwarded to the authorization service.
	pub fn service(mut self, service: impl Into<String>) -> Self {
		self.service = Some(service.into());

		self
	}

	/// Sets the header carrying the bearer token.
	pub fn authorization_key(mut self, key: impl Into<String>) -> Self {
		self.authorization_key = Some(key.into());

		self
	}

	/// Sets the denial detail.
	pub fn not_authorized_message(mut self, message: impl Into<String>) -> Self {
		self.message.get_or_insert_with(Default::default).not_authorized = Some(message.into());

		self
	}

	/// Sets the approval message.
	pub fn authorized_message(mut self, message: impl Into<String>) -> Self {
		self.message.get_or_insert_with(Default::default).authorized = Some(message.into());

		self
	}

	/// Replaces the resource-identifier strategy.
	pub fn get_access_object(mut self, strategy: impl AccessObjectExtractor + 'static) -> Self {
		self.get_access_object = Some(Arc::new(strategy));

		self
	}

	/// Replaces the token strategy.
	pub fn get_token(mut self, strategy: impl TokenExtractor + 'static) -> Self {
		self.get_token = Some(Arc::new(strategy));

		self
	}

	fn layered_over(self, base: Self) -> Self {
		let message = match (self.message, base.message) {
			(Some(top), Some(bottom)) => Some(top.layered_over(bottom)),
			(top, bottom) => top.or(bottom),
		};

		Self {
			host: self.host.or(base.host),
			port: self.port.or(base.port),
			endpoint: self.endpoint.or(base.endpoint),
			auth_end_point: self.auth_end_point.or(base.auth_end_point),
			service: self.service.or(base.service),
			authorization_key: self.authorization_key.or(base.authorization_key),
			message,
			get_access_object: self.get_access_object.or(base.get_access_object),
			get_token: self.get_token.or(base.get_token),
		}
	}
}
impl Debug for ConfigOverride {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConfigOverride")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("endpoint", &self.endpoint)
			.field("auth_end_point", &self.auth_end_point)
			.field("service", &self.service)
			.field("authorization_key", &self.authorization_key)
			.field("message", &self.message)
			.field("get_access_object_set", &self.get_access_object.is_some())
			.field("get_token_set", &self.get_token.is_some())
			.finish()
	}
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Some(Option::<u16>::deserialize(deserializer)?.unwrap_or(0)))
}

/// Effective messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
	/// Detail attached to denial bodies.
	pub not_authorized: String,
	/// Approval message.
	pub authorized: String,
}

/// Effective, validated configuration. Immutable once built.
///
/// Fields are only readable; the strategies and the authorization URL stay exactly as
/// [`merge`] validated and resolved them.
///
/// ```compile_fail
/// use remote_authz::config::{ConfigOverride, GuardConfig};
///
/// let mut config = GuardConfig::new(ConfigOverride::default()).expect("Defaults should merge.");
///
/// config.host = "elsewhere.example".into();
/// ```
#[derive(Clone)]
pub struct GuardConfig {
	host: String,
	port: u16,
	endpoint: String,
	auth_end_point: Option<String>,
	service: Option<String>,
	authorization_key: String,
	message: Messages,
	get_access_object: Arc<dyn AccessObjectExtractor>,
	get_token: Arc<dyn TokenExtractor>,
	authorization_url: Url,
}
impl GuardConfig {
	/// Merges `overrides` over the built-in defaults.
	pub fn new(overrides: ConfigOverride) -> Result<Self, ConfigError> {
		merge(ConfigOverride::defaults(), overrides)
	}

	/// Authorization host.
	pub fn host(&self) -> &str {
		&self.host
	}

	/// Authorization port; `0` when omitted from the URL.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Authorization endpoint path.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Combined authorization URL, when configured.
	pub fn auth_end_point(&self) -> Option<&str> {
		self.auth_end_point.as_deref()
	}

	/// Service name forwarded in every authorization request.
	pub fn service(&self) -> Option<&str> {
		self.service.as_deref()
	}

	/// Header carrying the bearer token.
	pub fn authorization_key(&self) -> &str {
		&self.authorization_key
	}

	/// Effective messages.
	pub fn message(&self) -> &Messages {
		&self.message
	}

	/// Validated resource-identifier strategy.
	pub fn get_access_object(&self) -> &dyn AccessObjectExtractor {
		&*self.get_access_object
	}

	/// Validated token strategy.
	pub fn get_token(&self) -> &dyn TokenExtractor {
		&*self.get_token
	}

	/// URL every authorization request is posted to.
	pub fn authorization_url(&self) -> &Url {
		&self.authorization_url
	}
}
impl Debug for GuardConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GuardConfig")
			.field("authorization_url", &self.authorization_url.as_str())
			.field("service", &self.service)
			.field("authorization_key", &self.authorization_key)
			.field("message", &self.message)
			.finish_non_exhaustive()
	}
}

/// Lays `overrides` over `defaults`, resolves the authorization URL, and validates both
/// strategies against the sample request.
pub fn merge(
	defaults: ConfigOverride,
	overrides: ConfigOverride,
) -> Result<GuardConfig, ConfigError> {
	let layer = overrides.layered_over(defaults);
	let message = layer.message.unwrap_or_default();
	let host = layer.host.unwrap_or_else(|| DEFAULT_HOST.into());
	let port = layer.port.unwrap_or(DEFAULT_PORT);
	let endpoint = layer.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into());
	let authorization_url =
		resolve_url(layer.auth_end_point.as_deref(), &host, port, &endpoint)?;
	let config = GuardConfig {
		host,
		port,
		endpoint,
		auth_end_point: layer.auth_end_point,
		service: layer.service,
		authorization_key: layer
			.authorization_key
			.unwrap_or_else(|| DEFAULT_AUTHORIZATION_KEY.into()),
		message: Messages {
			not_authorized: message
				.not_authorized
				.unwrap_or_else(|| DEFAULT_NOT_AUTHORIZED.into()),
			authorized: message.authorized.unwrap_or_else(|| DEFAULT_AUTHORIZED.into()),
		},
		get_access_object: layer
			.get_access_object
			.unwrap_or_else(|| Arc::new(IdParamExtractor)),
		get_token: layer.get_token.unwrap_or_else(|| Arc::new(BearerTokenExtractor)),
		authorization_url,
	};

	probe::validate_strategies(&config)?;

	Ok(config)
}

fn resolve_url(
	combined: Option<&str>,
	host: &str,
	port: u16,
	endpoint: &str,
) -> Result<Url, ConfigError> {
	let raw = match combined {
		Some(url) => url.to_owned(),
		None => {
			let base = if host.starts_with("http://") || host.starts_with("https://") {
				host.trim_end_matches('/').to_owned()
			} else {
				format!("http://{host}")
			};
			let port = if port == 0 { String::new() } else { format!(":{port}") };

			format!("{base}{port}{endpoint}")
		},
	};

	Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint: raw, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::BoxError, request::InboundRequest};

	#[test]
	fn defaults_resolve_to_the_local_validation_endpoint() {
		let config = GuardConfig::new(ConfigOverride::default()).expect("Defaults should merge.");

		assert_eq!(
			config.authorization_url().as_str(),
			"http://localhost:3400/auth/token/validate"
		);
		assert_eq!(config.host(), "localhost");
		assert_eq!(config.port(), 3400);
		assert_eq!(config.endpoint(), "/auth/token/validate");
		assert_eq!(config.auth_end_point(), None);
		assert_eq!(config.authorization_key(), "Authorization");
		assert_eq!(config.message().not_authorized, "Access Denied");
		assert_eq!(config.message().authorized, "Access Granted");
		assert_eq!(config.service(), None);
	}

	#[test]
	fn overriding_one_message_keeps_the_other() {
		let config = GuardConfig::new(ConfigOverride::default().not_authorized_message("Nope"))
			.expect("Message override should merge.");

		assert_eq!(config.message().not_authorized, "Nope");
		assert_eq!(config.message().authorized, "Access Granted");

		let config = GuardConfig::new(ConfigOverride::default().authorized_message("Welcome"))
			.expect("Message override should merge.");

		assert_eq!(config.message().not_authorized, "Access Denied");
		assert_eq!(config.message().authorized, "Welcome");
	}

	#[test]
	fn top_level_overrides_replace_defaults() {
		let config = GuardConfig::new(
			ConfigOverride::default()
				.host("authz.internal")
				.port(8080)
				.endpoint("/check")
				.service("documents")
				.authorization_key("X-Api-Token"),
		)
		.expect("Overrides should merge.");

		assert_eq!(config.authorization_url().as_str(), "http://authz.internal:8080/check");
		assert_eq!(config.host(), "authz.internal");
		assert_eq!(config.port(), 8080);
		assert_eq!(config.endpoint(), "/check");
		assert_eq!(config.service(), Some("documents"));
		assert_eq!(config.authorization_key(), "X-Api-Token");
	}

	#[test]
	fn port_zero_and_scheme_prefixed_hosts_are_honored() {
		let config = GuardConfig::new(
			ConfigOverride::default().host("https://authz.example.com/").port(0),
		)
		.expect("Scheme-prefixed host should merge.");

		assert_eq!(
			config.authorization_url().as_str(),
			"https://authz.example.com/auth/token/validate"
		);
	}

	#[test]
	fn json_null_port_is_omitted_and_missing_port_keeps_the_default() {
		let omitted = ConfigOverride::from_json_str(r#"{"host":"authz","port":null}"#)
			.expect("A null port should parse.");

		assert_eq!(omitted.port, Some(0));

		let config = GuardConfig::new(omitted).expect("A null port should merge.");

		assert_eq!(config.authorization_url().as_str(), "http://authz/auth/token/validate");

		let defaulted = ConfigOverride::from_json_str(r#"{"host":"authz"}"#)
			.expect("A missing port should parse.");

		assert_eq!(defaulted.port, None);

		let config = GuardConfig::new(defaulted).expect("A missing port should merge.");

		assert_eq!(config.authorization_url().as_str(), "http://authz:3400/auth/token/validate");
	}

	#[test]
	fn combined_url_takes_precedence() {
		let config = GuardConfig::new(
			ConfigOverride::default()
				.host("ignored")
				.auth_end_point("https://authz.example.com/v2/check"),
		)
		.expect("Combined URL should merge.");

		assert_eq!(config.authorization_url().as_str(), "https://authz.example.com/v2/check");
		assert_eq!(config.auth_end_point(), Some("https://authz.example.com/v2/check"));
	}

	#[test]
	fn unparsable_endpoints_are_rejected() {
		let err = GuardConfig::new(ConfigOverride::default().auth_end_point("not a url"))
			.expect_err("Garbage URL should be rejected.");

		assert!(matches!(
			err,
			ConfigError::InvalidEndpoint { ref endpoint, .. } if endpoint == "not a url"
		));
	}

	#[test]
	fn json_layers_merge_like_code_layers() {
		let overrides = ConfigOverride::from_json_str(
			r#"{"host":"authz","port":9000,"message":{"authorized":"ok"}}"#,
		)
		.expect("JSON layer should parse.");
		let config = GuardConfig::new(overrides).expect("JSON layer should merge.");

		assert_eq!(config.authorization_url().as_str(), "http://authz:9000/auth/token/validate");
		assert_eq!(config.message().authorized, "ok");
		assert_eq!(config.message().not_authorized, "Access Denied");
	}

	#[test]
	fn json_layers_report_the_offending_path() {
		let err = ConfigOverride::from_json_str(r#"{"message":{"notAuthorized":7}}"#)
			.expect_err("A numeric message should be rejected.");

		assert!(matches!(
			err,
			ConfigError::InvalidOverride { ref path, .. } if path == "message.notAuthorized"
		));

		let err = ConfigOverride::from_json_str(r#"{"hots":"typo"}"#)
			.expect_err("Unknown keys should be rejected.");

		assert!(matches!(err, ConfigError::InvalidOverride { .. }));
	}

	#[test]
	fn custom_strategies_are_kept() {
		let config = GuardConfig::new(ConfigOverride::default().get_access_object(
			|request: &dyn InboundRequest| -> Result<Option<String>, BoxError> {
				Ok(request.params().get("_id").cloned())
			},
		))
		.expect("Custom strategy should merge.");
		let request =
			crate::request::RequestContext::builder().query("_id", "q").param("_id", "p").build();
		let object_id =
			config.get_access_object().extract(&request).expect("Strategy should succeed.");

		assert_eq!(object_id.as_deref(), Some("p"));
	}

	#[test]
	fn clones_share_the_validated_strategies() {
		let config = GuardConfig::new(ConfigOverride::default()).expect("Defaults should merge.");
		let copy = config.clone();
		let request = crate::request::RequestContext::builder()
			.header("Authorization", "Bearer abc123")
			.build();

		assert!(Arc::ptr_eq(&config.get_token, &copy.get_token));
		assert_eq!(
			copy.get_token().extract(&request, copy.authorization_key()),
			Ok("abc123".to_owned())
		);
	}
}
