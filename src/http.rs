//! Transport primitives executed on behalf of the client.
//!
//! The module exposes [`HttpTransport`] alongside [`TransportRequest`] and
//! [`TransportResponse`] so downstream crates can plug in custom HTTP stacks. The client
//! depends only on this narrow contract: one blocking call in, one raw response (or a
//! transport failure) out.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, request::Method};

/// Abstraction over blocking HTTP stacks capable of executing a signed request.
///
/// Implementations decide their own status-code policy; the client treats any returned error as
/// a request failure without further classification, wrapping its description into
/// [`Error::Request`](crate::error::Error::Request). Implementations must be
/// `Send + Sync + 'static` so a client can be shared across threads, even though each individual
/// call is synchronous and one-shot.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type Error: 'static + Send + Sync + StdError;

	/// Executes one blocking request and returns the raw response.
	fn execute(&self, request: TransportRequest<'_>) -> Result<TransportResponse, Self::Error>;
}

/// Borrowed view of one outbound request.
#[derive(Clone, Copy, Debug)]
pub struct TransportRequest<'a> {
	/// Validated HTTP verb.
	pub method: Method,
	/// Fully signed URL, query string included.
	pub url: &'a str,
	/// Raw body text, when the verb carries one.
	pub body: Option<&'a str>,
}

/// Raw response handed back to the client for decoding.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body text; an empty body decodes to an empty result.
	pub body: String,
}

/// Thin wrapper around reqwest's blocking client so shared HTTP behavior lives in one place.
///
/// Non-success statuses are turned into transport errors via `error_for_status`, matching the
/// one-shot client model: the caller sees a single request-failure kind and applies its own
/// status policy if it needs one.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpTransport(pub BlockingClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpTransport {
	/// Wraps an existing blocking [`BlockingClient`].
	pub fn with_client(client: BlockingClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<BlockingClient> for ReqwestHttpTransport {
	fn as_ref(&self) -> &BlockingClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpTransport {
	type Target = BlockingClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpTransport {
	type Error = ReqwestError;

	fn execute(&self, request: TransportRequest<'_>) -> Result<TransportResponse, ReqwestError> {
		let mut builder = self.0.request(request.method.into(), request.url);

		if let Some(body) = request.body {
			builder = builder.body(body.to_owned());
		}

		let response = builder.send()?.error_for_status()?;
		let status = response.status().as_u16();
		let body = response.text()?;

		Ok(TransportResponse { status, body })
	}
}
