//! Client-level error types shared across signing, transport, and decoding.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Requested HTTP verb is outside the supported GET/POST/PUT/PATCH/DELETE set.
	///
	/// Raised synchronously before any network activity.
	#[error("HTTP method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Verb string exactly as the caller supplied it.
		method: String,
	},
	/// Transport collaborator failed while executing the request.
	///
	/// Wraps the underlying failure's description without categorizing by status code; that
	/// distinction, when needed, belongs to the caller.
	#[error("Request failed: {description}")]
	Request {
		/// Description of the underlying transport failure.
		description: String,
		/// Transport-specific failure, when one is available.
		#[source]
		source: Option<BoxError>,
	},
	/// Request or response body could not be converted to or from JSON.
	#[error(transparent)]
	Codec(#[from] CodecError),
}
impl Error {
	/// Wraps a transport failure, preserving its description for the caller.
	pub fn request(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Request { description: src.to_string(), source: Some(Box::new(src)) }
	}
}

/// JSON boundary failures raised while shaping bodies or decoding responses.
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// Request body could not be encoded as JSON text.
	#[error("Request body could not be encoded as JSON.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Response body is not valid JSON.
	#[error("Response body is not valid JSON.")]
	Decode {
		/// Structured parsing failure annotated with the failing path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
