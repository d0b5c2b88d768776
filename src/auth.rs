//! Credential material used to sign Backlot requests.

// self
use crate::_prelude::*;

/// Redacted secret key wrapper keeping signing material out of logs.
///
/// The secret is used exclusively as the signature prefix and is never transmitted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey(String);
impl SecretKey {
	/// Wraps a new secret key string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key material. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SecretKey {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretKey").field(&"<redacted>").finish()
	}
}
impl Display for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// API credential pair supplied at client construction and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Public API key, transmitted as the `api_key` query parameter.
	pub api_key: String,
	/// Secret signing key; never leaves the process.
	pub secret_key: SecretKey,
}
impl Credentials {
	/// Builds a credential pair from the Backlot developers tab values.
	pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
		Self { api_key: api_key.into(), secret_key: SecretKey::new(secret_key) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretKey::new("329b5b204d0f11e0a2d060334bfffe90ab18xqh5");

		assert_eq!(format!("{secret:?}"), "SecretKey(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn credentials_debug_hides_secret() {
		let credentials = Credentials::new("7ab06", "329b5b204d0f11e0a2d060334bfffe90ab18xqh5");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("7ab06"));
		assert!(!rendered.contains("329b5b204d0f11e0a2d060334bfffe90ab18xqh5"));
	}
}
