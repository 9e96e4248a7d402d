//! Fixed catalog of structured error descriptors returned to callers.
//!
//! Entries are `'static`; every occurrence works on its own owned [`ErrorDescriptor`], so the
//! per-occurrence `detail` never leaks between concurrent requests.

// self
use crate::_prelude::*;

/// Symbolic error kinds with a fixed catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// No authentication values were provided.
	AuthenticationNotSet,
	/// Authentication data does not have the expected length.
	AuthenticationDataNotProperLength,
	/// Authentication header or type does not follow the bearer contract.
	AuthenticationTypeNotAccord,
	/// The authentication key exists but carries no value.
	AuthenticationValueNotSet,
	/// The remote authorization service could not be reached.
	AuthorizationServiceUnavailable,
	/// The resource identifier could not be derived from the request.
	AccessObjectUnresolved,
}
impl ErrorKind {
	/// Every catalog entry, in code order.
	pub const ALL: [ErrorKind; 6] = [
		ErrorKind::AuthenticationNotSet,
		ErrorKind::AuthenticationDataNotProperLength,
		ErrorKind::AuthenticationTypeNotAccord,
		ErrorKind::AuthenticationValueNotSet,
		ErrorKind::AuthorizationServiceUnavailable,
		ErrorKind::AccessObjectUnresolved,
	];

	/// Returns the static catalog entry for this kind.
	pub const fn entry(self) -> &'static CatalogEntry {
		match self {
			ErrorKind::AuthenticationNotSet => &AUTHENTICATION_NOT_SET,
			ErrorKind::AuthenticationDataNotProperLength => &AUTHENTICATION_DATA_NOT_PROPER_LENGTH,
			ErrorKind::AuthenticationTypeNotAccord => &AUTHENTICATION_TYPE_NOT_ACCORD,
			ErrorKind::AuthenticationValueNotSet => &AUTHENTICATION_VALUE_NOT_SET,
			ErrorKind::AuthorizationServiceUnavailable => &AUTHORIZATION_SERVICE_UNAVAILABLE,
			ErrorKind::AccessObjectUnresolved => &ACCESS_OBJECT_UNRESOLVED,
		}
	}

	/// Returns the stable error code (e.g., `AUT_002`).
	pub const fn code(self) -> &'static str {
		self.entry().code
	}

	/// Builds a fresh descriptor without a detail.
	pub fn descriptor(self) -> ErrorDescriptor {
		ErrorDescriptor::from(self.entry())
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.code())
	}
}

/// Immutable catalog row.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogEntry {
	/// Stable error code.
	pub code: &'static str,
	/// Short human-readable name.
	pub name: &'static str,
	/// Longer explanation of the failure.
	pub message: &'static str,
	/// Remediation hint for the caller.
	pub hint: &'static str,
}

const AUTHENTICATION_NOT_SET: CatalogEntry = CatalogEntry {
	code: "AUT_000",
	name: "Authentication is not set",
	message: "Authentication values are not set.",
	hint: "View documentation on how to set authentication values on the header.",
};
const AUTHENTICATION_DATA_NOT_PROPER_LENGTH: CatalogEntry = CatalogEntry {
	code: "AUT_001",
	name: "Authentication data not proper length.",
	message: "Authentication data does not contain proper length.",
	hint: "View documentation on how to set authentication values on the header.",
};
const AUTHENTICATION_TYPE_NOT_ACCORD: CatalogEntry = CatalogEntry {
	code: "AUT_002",
	name: "Authentication type is not correct.",
	message: "Authentication type is not according to constants.",
	hint: "Authentication type should be 'Bearer', view documentation for more.",
};
const AUTHENTICATION_VALUE_NOT_SET: CatalogEntry = CatalogEntry {
	code: "AUT_003",
	name: "Authentication value is not set",
	message: "Authentication values are not set.",
	hint: "Authentication key exists, but value may not.",
};
const AUTHORIZATION_SERVICE_UNAVAILABLE: CatalogEntry = CatalogEntry {
	code: "AUT_004",
	name: "Authorization service is unavailable.",
	message: "The authorization service could not confirm access.",
	hint: "Retry later; the request was not forwarded.",
};
const ACCESS_OBJECT_UNRESOLVED: CatalogEntry = CatalogEntry {
	code: "AUT_005",
	name: "Access object could not be resolved.",
	message: "The resource identifier could not be derived from the request.",
	hint: "Check the configured access-object strategy.",
};

/// Structured error body sent back to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
	/// Stable error code.
	pub error_code: String,
	/// Short human-readable name.
	pub error_name: String,
	/// Longer explanation of the failure.
	pub error_message: String,
	/// Remediation hint for the caller.
	pub hint: String,
	/// Per-occurrence context.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}
impl ErrorDescriptor {
	/// Sets the per-occurrence detail.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());

		self
	}

	/// Serializes the descriptor as a JSON value.
	pub fn to_json(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}
impl From<&CatalogEntry> for ErrorDescriptor {
	fn from(entry: &CatalogEntry) -> Self {
		Self {
			error_code: entry.code.into(),
			error_name: entry.name.into(),
			error_message: entry.message.into(),
			hint: entry.hint.into(),
			detail: None,
		}
	}
}
