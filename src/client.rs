//! Blocking Backlot client that signs and dispatches requests.

// crates.io
use serde_json::Value;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpTransport;
use crate::{
	_prelude::*,
	auth::Credentials,
	config::Endpoints,
	error::CodecError,
	http::{HttpTransport, TransportRequest},
	obs::RequestSpan,
	request::{self, Method, RequestBody},
	sign::{self, ParamSet},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default blocking reqwest transport.
pub type ReqwestClient = Client<ReqwestHttpTransport>;

/// Signs and dispatches Backlot API requests over a pluggable transport.
///
/// The client owns the credential pair and endpoint configuration so the verb helpers can focus
/// on shaping arguments. Each call is synchronous and one-shot: normalize the parameters, sign,
/// build the URL, execute, decode. Configuration is mutable between requests via the setters,
/// but mutating it concurrently with an in-flight request is unsupported.
#[derive(Clone)]
pub struct Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport executing each outbound call.
	pub transport: Arc<T>,
	/// Credential pair used for signing and the injected `api_key`.
	pub credentials: Credentials,
	/// Endpoint and expiry configuration.
	pub endpoints: Endpoints,
}
impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(credentials: Credentials, transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), credentials, endpoints: Endpoints::default() }
	}

	/// Overrides the write base URL at construction time.
	pub fn with_base_url(mut self, value: impl Into<String>) -> Self {
		self.endpoints.base_url = value.into();

		self
	}

	/// Overrides the read (CDN) base URL at construction time.
	pub fn with_cache_base_url(mut self, value: impl Into<String>) -> Self {
		self.endpoints.cache_base_url = value.into();

		self
	}

	/// Overrides the expiration window at construction time.
	pub fn with_expiration_window(mut self, value: Duration) -> Self {
		self.endpoints.expiration_window = value;

		self
	}

	/// Replaces the write base URL.
	pub fn set_base_url(&mut self, value: impl Into<String>) {
		self.endpoints.base_url = value.into();
	}

	/// Replaces the read (CDN) base URL.
	pub fn set_cache_base_url(&mut self, value: impl Into<String>) {
		self.endpoints.cache_base_url = value.into();
	}

	/// Replaces the expiration window.
	pub fn set_expiration_window(&mut self, value: Duration) {
		self.endpoints.expiration_window = value;
	}

	/// Makes a GET request against the read (CDN) base URL.
	pub fn get(&self, path: &str, params: ParamSet) -> Result<Value> {
		self.dispatch(Method::Get, path, params, None)
	}

	/// Makes a POST request with an optional body.
	pub fn post(&self, path: &str, body: Option<RequestBody>, params: ParamSet) -> Result<Value> {
		self.dispatch(Method::Post, path, params, body.as_ref().map(RequestBody::as_str))
	}

	/// Makes a PUT request with an optional body.
	pub fn put(&self, path: &str, body: Option<RequestBody>, params: ParamSet) -> Result<Value> {
		self.dispatch(Method::Put, path, params, body.as_ref().map(RequestBody::as_str))
	}

	/// Makes a PATCH request with an optional body.
	pub fn patch(&self, path: &str, body: Option<RequestBody>, params: ParamSet) -> Result<Value> {
		self.dispatch(Method::Patch, path, params, body.as_ref().map(RequestBody::as_str))
	}

	/// Makes a DELETE request.
	pub fn delete(&self, path: &str, params: ParamSet) -> Result<Value> {
		self.dispatch(Method::Delete, path, params, None)
	}

	/// Validates the verb string, then signs and dispatches the request.
	///
	/// This is the string-typed entry point matching the verb helpers; anything outside
	/// GET/POST/PUT/PATCH/DELETE fails with
	/// [`Error::UnsupportedMethod`](crate::error::Error::UnsupportedMethod) before any network
	/// activity.
	pub fn request(
		&self,
		method: &str,
		path: &str,
		params: ParamSet,
		body: Option<RequestBody>,
	) -> Result<Value> {
		let method = method.parse::<Method>()?;

		self.dispatch(method, path, params, body.as_ref().map(RequestBody::as_str))
	}

	/// Computes the canonical signature with this client's secret key.
	///
	/// Exposed for callers that assemble request URLs themselves.
	pub fn generate_signature(
		&self,
		method: &str,
		path: &str,
		params: &ParamSet,
		body: &str,
	) -> String {
		sign::generate_signature(&self.credentials.secret_key, method, path, params, body)
	}

	/// Builds a request URL against this client's endpoint configuration.
	pub fn build_url(&self, method: Method, path: &str, params: &ParamSet) -> String {
		request::build_url(&self.endpoints, method, path, params)
	}

	fn dispatch(
		&self,
		method: Method,
		path: &str,
		params: ParamSet,
		body: Option<&str>,
	) -> Result<Value> {
		let _guard = RequestSpan::new(method, path).entered();
		let path = request::versioned_path(path);
		let mut signed = self.sanitized_params(&params);

		if !signed.contains("signature") {
			// The signature covers raw caller values; escaping is for the URL only.
			let signing = signed.merged_with(&params);
			let signature = sign::generate_signature(
				&self.credentials.secret_key,
				method.as_str(),
				&path,
				&signing,
				body.unwrap_or(""),
			);

			signed.insert("signature", signature);
		}

		let url = request::build_url(&self.endpoints, method, &path, &signed);
		let response = self
			.transport
			.execute(TransportRequest { method, url: &url, body })
			.map_err(Error::request)?;

		if response.body.is_empty() {
			return Ok(Value::Array(Vec::new()));
		}

		let mut deserializer = serde_json::Deserializer::from_str(&response.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Codec(CodecError::Decode { source }))
	}

	/// Escapes every caller value and injects `expires` + `api_key` when absent.
	///
	/// Injected values bypass escaping; the expiry is the current time plus the window, rounded
	/// up to the next 300-second boundary.
	fn sanitized_params(&self, params: &ParamSet) -> ParamSet {
		let mut sanitized = params.encoded();

		sanitized.insert_if_absent("expires", || {
			let raw = OffsetDateTime::now_utc().unix_timestamp()
				+ self.endpoints.expiration_window.whole_seconds();

			sign::round_up_expiry(raw).to_string()
		});
		sanitized.insert_if_absent("api_key", || self.credentials.api_key.clone());

		sanitized
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpTransport> {
	/// Creates a client with default endpoints and the crate's blocking reqwest transport.
	///
	/// Use the `with_` builders to override endpoints or the expiration window.
	pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
		Self::with_transport(Credentials::new(api_key, secret_key), ReqwestHttpTransport::default())
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("credentials", &self.credentials)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// self
	use super::*;
	use crate::http::TransportResponse;

	const API_KEY: &str = "7ab06";
	const SECRET_KEY: &str = "329b5b204d0f11e0a2d060334bfffe90ab18xqh5";

	#[derive(Debug, ThisError)]
	#[error("connection refused")]
	struct TransportDown;

	#[derive(Clone, Debug)]
	struct RecordedCall {
		method: Method,
		url: String,
		body: Option<String>,
	}

	#[derive(Debug, Default)]
	struct RecordingTransport {
		calls: Mutex<Vec<RecordedCall>>,
		response_body: String,
		fail: bool,
	}
	impl RecordingTransport {
		fn with_response(body: &str) -> Self {
			Self { response_body: body.into(), ..Self::default() }
		}

		fn failing() -> Self {
			Self { fail: true, ..Self::default() }
		}

		fn last_call(&self) -> RecordedCall {
			self.calls
				.lock()
				.unwrap()
				.last()
				.cloned()
				.expect("Transport should have recorded a call.")
		}

		fn call_count(&self) -> usize {
			self.calls.lock().unwrap().len()
		}
	}
	impl HttpTransport for RecordingTransport {
		type Error = TransportDown;

		fn execute(
			&self,
			request: TransportRequest<'_>,
		) -> Result<TransportResponse, TransportDown> {
			self.calls.lock().unwrap().push(RecordedCall {
				method: request.method,
				url: request.url.into(),
				body: request.body.map(str::to_owned),
			});

			if self.fail {
				return Err(TransportDown);
			}

			Ok(TransportResponse { status: 200, body: self.response_body.clone() })
		}
	}

	fn test_client(transport: RecordingTransport) -> (Client<RecordingTransport>, Arc<RecordingTransport>) {
		let transport = Arc::new(transport);
		let client =
			Client::with_transport(Credentials::new(API_KEY, SECRET_KEY), transport.clone());

		(client, transport)
	}

	fn query_value(url: &str, key: &str) -> Option<String> {
		let prefix = format!("{key}=");

		url.split('?')
			.nth(1)?
			.split('&')
			.find(|pair| pair.starts_with(&prefix))
			.map(|pair| pair[prefix.len()..].to_owned())
	}

	#[test]
	fn get_completes_versioned_route_on_the_read_base() {
		let (client, transport) = test_client(RecordingTransport::with_response("{\"test\":true}"));

		client.get("players/HbxJKM", ParamSet::new()).unwrap();

		let call = transport.last_call();

		assert_eq!(call.method, Method::Get);
		assert!(call.url.starts_with("https://cdn.api.ooyala.com/v2/players/HbxJKM?"));
	}

	#[test]
	fn already_prefixed_path_is_left_unchanged() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));

		client.get("/v2/players/HbxJKM", ParamSet::new()).unwrap();

		assert!(transport.last_call().url.starts_with("https://cdn.api.ooyala.com/v2/players/HbxJKM?"));
	}

	#[test]
	fn dispatch_injects_required_params() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));

		client.get("players/HbxJKM", ParamSet::new()).unwrap();

		let url = transport.last_call().url;

		assert_eq!(query_value(&url, "api_key").as_deref(), Some(API_KEY));
		assert!(query_value(&url, "expires").is_some());
		assert!(query_value(&url, "signature").is_some());
	}

	#[test]
	fn injected_expires_lands_on_a_round_boundary() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let before = OffsetDateTime::now_utc().unix_timestamp();

		client.get("players/HbxJKM", ParamSet::new()).unwrap();

		let url = transport.last_call().url;
		let expires: i64 = query_value(&url, "expires").unwrap().parse().unwrap();

		assert_eq!(expires % 300, 0);
		assert!(expires >= before + 15);
	}

	#[test]
	fn expiration_window_override_extends_expiry() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let client = client.with_expiration_window(Duration::seconds(600));
		let before = OffsetDateTime::now_utc().unix_timestamp();

		client.get("players/HbxJKM", ParamSet::new()).unwrap();

		let url = transport.last_call().url;
		let expires: i64 = query_value(&url, "expires").unwrap().parse().unwrap();

		assert_eq!(expires % 300, 0);
		assert!(expires >= before + 600);
	}

	#[test]
	fn caller_params_escape_exactly_once() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let params: ParamSet = [("test", "'tr ue'"), ("other", "1")].into_iter().collect();

		client.get("players/HbxJKM", params).unwrap();

		let url = transport.last_call().url;

		assert_eq!(query_value(&url, "test").as_deref(), Some("%27tr+ue%27"));
		assert_eq!(query_value(&url, "other").as_deref(), Some("1"));
	}

	#[test]
	fn explicit_params_pin_the_signature() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let params: ParamSet =
			[("api_key", API_KEY), ("expires", "1299991855")].into_iter().collect();

		client.get("players/HbxJKM", params).unwrap();

		let url = transport.last_call().url;

		assert_eq!(
			query_value(&url, "signature").as_deref(),
			Some("p9DG%2F%2BummS0YcTNOYHtykdjw5N2n5s81OigJfdgHPTA"),
		);
	}

	#[test]
	fn signature_covers_raw_caller_values() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let params: ParamSet = [("test", "'tr ue'")].into_iter().collect();

		client.get("players/HbxJKM", params).unwrap();

		let url = transport.last_call().url;
		let expires = query_value(&url, "expires").unwrap();
		let expected_params: ParamSet =
			[("test", "'tr ue'"), ("api_key", API_KEY), ("expires", expires.as_str())]
				.into_iter()
				.collect();
		let expected =
			client.generate_signature("GET", "/v2/players/HbxJKM", &expected_params, "");

		assert_eq!(query_value(&url, "signature"), Some(expected));
	}

	#[test]
	fn caller_supplied_signature_is_not_overwritten() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let params: ParamSet = [("signature", "abc")].into_iter().collect();

		client.get("players/HbxJKM", params).unwrap();

		let url = transport.last_call().url;

		assert_eq!(query_value(&url, "signature").as_deref(), Some("abc"));
		assert_eq!(url.matches("signature=").count(), 1);
	}

	#[test]
	fn unsupported_method_fails_before_any_transport_call() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));
		let err = client.request("TRACE", "players/HbxJKM", ParamSet::new(), None).unwrap_err();

		assert!(matches!(err, Error::UnsupportedMethod { method } if method == "TRACE"));
		assert_eq!(transport.call_count(), 0);
	}

	#[test]
	fn request_accepts_lowercase_verbs() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));

		client.request("get", "players/HbxJKM", ParamSet::new(), None).unwrap();

		assert_eq!(transport.last_call().method, Method::Get);
	}

	#[test]
	fn post_routes_to_the_write_base_and_passes_the_body_through() {
		let (client, transport) = test_client(RecordingTransport::with_response("{}"));

		client
			.post("players/HbxJKM", Some(RequestBody::from("payload")), ParamSet::new())
			.unwrap();

		let call = transport.last_call();

		assert_eq!(call.method, Method::Post);
		assert!(call.url.starts_with("https://api.ooyala.com/v2/players/HbxJKM?"));
		assert_eq!(call.body.as_deref(), Some("payload"));
	}

	#[test]
	fn base_url_setters_only_affect_their_method_class() {
		let (mut client, transport) = test_client(RecordingTransport::with_response("{}"));

		client.set_base_url("http://example.com");
		client.post("players/HbxJKM", None, ParamSet::new()).unwrap();
		assert!(transport.last_call().url.starts_with("http://example.com/v2/"));

		client.get("players/HbxJKM", ParamSet::new()).unwrap();
		assert!(transport.last_call().url.starts_with("https://cdn.api.ooyala.com/v2/"));

		client.set_cache_base_url("http://example.com");
		client.get("players/HbxJKM", ParamSet::new()).unwrap();
		assert!(transport.last_call().url.starts_with("http://example.com/v2/"));
	}

	#[test]
	fn transport_failure_maps_to_a_request_error() {
		let (client, _transport) = test_client(RecordingTransport::failing());
		let err = client.get("players/HbxJKM", ParamSet::new()).unwrap_err();

		assert!(
			matches!(err, Error::Request { ref description, .. } if description.contains("connection refused")),
		);
	}

	#[test]
	fn empty_response_body_yields_an_empty_result() {
		let (client, _transport) = test_client(RecordingTransport::with_response(""));
		let value = client.delete("players/HbxJKM", ParamSet::new()).unwrap();

		assert_eq!(value, Value::Array(Vec::new()));
	}

	#[test]
	fn json_response_is_decoded() {
		let (client, _transport) = test_client(RecordingTransport::with_response("{\"test\":true}"));
		let value = client.get("players/HbxJKM", ParamSet::new()).unwrap();

		assert_eq!(value["test"], Value::Bool(true));
	}

	#[test]
	fn malformed_json_maps_to_a_codec_error() {
		let (client, _transport) = test_client(RecordingTransport::with_response("not json"));
		let err = client.get("players/HbxJKM", ParamSet::new()).unwrap_err();

		assert!(matches!(err, Error::Codec(_)));
	}
}
