//! Signed client for the Ooyala Backlot v2 API—canonical request signing, expiring URLs, and a
//! pluggable blocking transport in one crate.
//!
//! Every request is authenticated by a deterministic SHA-256 signature computed over the secret
//! key, the HTTP verb, the versioned resource path, the lexicographically sorted query
//! parameters, and the raw body. The [`client::Client`] owns that canonicalization pipeline and
//! hands the finished URL to a narrow [`http::HttpTransport`] collaborator; the default transport
//! is reqwest's blocking client behind the default-on `reqwest` feature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod sign;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as BlockingClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
