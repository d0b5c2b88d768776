//! Endpoint configuration and signing defaults.

// self
use crate::{_prelude::*, request::Method};

/// Default base URL for POST/PUT/PATCH/DELETE traffic.
pub const DEFAULT_BASE_URL: &str = "https://api.ooyala.com";
/// Default base URL for cacheable GET traffic, served from the CDN.
pub const DEFAULT_CACHE_BASE_URL: &str = "https://cdn.api.ooyala.com";
/// Default number of seconds a signed request stays valid.
pub const DEFAULT_EXPIRATION_WINDOW: Duration = Duration::seconds(15);
/// Interval the `expires` timestamp is rounded up to.
///
/// Fixed by the server-side verifier; not configurable.
pub const ROUND_UP_TIME: Duration = Duration::seconds(300);

/// Endpoint set and expiry policy consumed by the client.
///
/// Base URLs are stored as plain strings because URL assembly is literal concatenation of
/// `base + path + "?" + query`; the defaults therefore carry no trailing slash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Base URL receiving all non-GET traffic.
	pub base_url: String,
	/// Base URL receiving GET traffic.
	pub cache_base_url: String,
	/// Validity window added to the current time when `expires` is injected.
	pub expiration_window: Duration,
}
impl Endpoints {
	/// Selects the base URL for the given verb; GET reads through the CDN endpoint.
	pub fn base_for(&self, method: Method) -> &str {
		if method.is_read() { &self.cache_base_url } else { &self.base_url }
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			cache_base_url: DEFAULT_CACHE_BASE_URL.into(),
			expiration_window: DEFAULT_EXPIRATION_WINDOW,
		}
	}
}
