//! Overridable strategies that derive the bearer token and the resource identifier.
//!
//! Both strategies are plain traits so callers can swap the policy without touching the
//! guard. Closures with the matching signature implement the traits directly, which keeps
//! one-off overrides short:
//!
//! ```
//! use remote_authz::{
//! 	config::{ConfigOverride, GuardConfig},
//! 	error::BoxError,
//! 	request::InboundRequest,
//! };
//!
//! let overrides = ConfigOverride::default().get_access_object(
//! 	|request: &dyn InboundRequest| -> Result<Option<String>, BoxError> {
//! 		Ok(request.params().get("documentId").cloned())
//! 	},
//! );
//!
//! GuardConfig::new(overrides).expect("Closure strategy should pass the sample probe.");
//! ```
//!
//! The strategy signature is checked by the compiler. A fully typed closure that takes the
//! request is accepted, while the same closure without the request parameter cannot be
//! configured:
//!
//! ```
//! use remote_authz::{config::ConfigOverride, error::BoxError, request::InboundRequest};
//!
//! let overrides = ConfigOverride::default().get_access_object(
//! 	|_: &dyn InboundRequest| -> Result<Option<String>, BoxError> {
//! 		Ok(Some("fixed".to_owned()))
//! 	},
//! );
//! ```
//!
//! ```compile_fail
//! use remote_authz::{config::ConfigOverride, error::BoxError};
//!
//! let overrides = ConfigOverride::default().get_access_object(
//! 	|| -> Result<Option<String>, BoxError> {
//! 		Ok(Some("fixed".to_owned()))
//! 	},
//! );
//! ```

pub mod access_object;
pub mod token;

pub use access_object::*;
pub use token::*;
