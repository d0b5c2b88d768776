//! Request-shaping primitives: HTTP verbs, body rendering, and URL assembly.

// std
use std::borrow::Cow;
// self
use crate::{_prelude::*, config::Endpoints, error::CodecError, sign::ParamSet};

/// API version segment prefixed to relative request paths.
pub const API_VERSION_PREFIX: &str = "/v2/";

/// HTTP verbs accepted by the Backlot API.
///
/// Anything outside this set is rejected with [`Error::UnsupportedMethod`] before a request is
/// built, so downstream signing and transport code only ever sees a valid verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// Cacheable read, routed through the CDN base URL.
	Get,
	/// Resource creation.
	Post,
	/// Resource replacement.
	Put,
	/// Partial resource update.
	Patch,
	/// Resource removal.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}

	/// Checks whether the verb belongs to the cacheable read class.
	pub const fn is_read(self) -> bool {
		matches!(self, Method::Get)
	}
}
impl FromStr for Method {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.to_uppercase().as_str() {
			"GET" => Ok(Method::Get),
			"POST" => Ok(Method::Post),
			"PUT" => Ok(Method::Put),
			"PATCH" => Ok(Method::Patch),
			"DELETE" => Ok(Method::Delete),
			_ => Err(Error::UnsupportedMethod { method: raw.into() }),
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Pre-rendered request body text handed verbatim to the transport.
///
/// Mappings and sequences are shaped into JSON at construction; raw text passes through
/// unmodified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestBody(String);
impl RequestBody {
	/// Encodes a serializable structure as a JSON body.
	pub fn json<T>(value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		Ok(Self(serde_json::to_string(value).map_err(|source| CodecError::Encode { source })?))
	}

	/// Wraps raw text passed through to the transport untouched.
	pub fn text(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the rendered body text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl From<&str> for RequestBody {
	fn from(value: &str) -> Self {
		Self::text(value)
	}
}
impl From<String> for RequestBody {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Prefixes a relative path with the API version segment.
///
/// A path already starting with `/v2/` is returned unchanged.
pub fn versioned_path(path: &str) -> Cow<'_, str> {
	if path.starts_with(API_VERSION_PREFIX) {
		Cow::Borrowed(path)
	} else {
		Cow::Owned(format!("{API_VERSION_PREFIX}{path}"))
	}
}

/// Assembles the final request URL.
///
/// Selects the read base for GET and the write base for everything else, then concatenates
/// `base + path + "?" + canonical query string`. Pure string assembly; no network I/O.
pub fn build_url(endpoints: &Endpoints, method: Method, path: &str, params: &ParamSet) -> String {
	format!("{}{}?{}", endpoints.base_for(method), path, params.to_query_string())
}
